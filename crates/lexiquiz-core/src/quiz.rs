//! The quiz/practice engine.
//!
//! A [`QuizSession`] drives one practice attempt:
//!
//! ```text
//! Setup -> Generating -> Answering(0) -> Graded(0) -> Answering(1) -> ... -> Completed
//!              |
//!              +-> Error   (Try Again re-enters Generating)
//! ```
//!
//! Each question is graded at most once, the score only counts stored
//! verdicts, and at most one generation request is outstanding per session.
//! Generation can be driven in one step with [`QuizSession::start`], or split
//! into [`QuizSession::begin_generation`] and
//! [`QuizSession::complete_generation`] when the caller issues the request
//! itself.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ActionRejected, GenerationError};
use crate::generator::check_question_family;
use crate::grading::{grade, Answer, Verdict};
use crate::model::{Difficulty, PracticeMode, Question, QuestionCount, VocabDirection};
use crate::traits::ContentGenerator;

pub const DEFAULT_GRAMMAR_TOPIC: &str = "Mixed Tenses";
pub const DEFAULT_VOCABULARY_TOPIC: &str = "General Vocabulary";

/// Settings chosen during setup. Frozen once generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Grammar topic; only sent in grammar mode.
    pub topic: String,
    /// Translation direction; only sent in vocabulary mode.
    pub direction: VocabDirection,
    pub difficulty: Difficulty,
    pub question_count: QuestionCount,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Setup,
    Generating,
    Answering { index: usize },
    Graded { index: usize },
    Completed,
    /// Generation failed; holds the error message verbatim.
    Error { message: String },
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Setup => "in setup",
            QuizState::Generating => "generating",
            QuizState::Answering { .. } => "answering",
            QuizState::Graded { .. } => "showing a graded answer",
            QuizState::Completed => "completed",
            QuizState::Error { .. } => "in an error state",
        }
    }
}

/// The single outbound call a generation transition makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Grammar {
        topic: String,
        difficulty: Difficulty,
        count: QuestionCount,
    },
    Vocabulary {
        direction: VocabDirection,
        difficulty: Difficulty,
        count: QuestionCount,
    },
}

impl GenerationRequest {
    pub async fn execute(
        &self,
        client: &dyn ContentGenerator,
    ) -> Result<Vec<Question>, GenerationError> {
        match self {
            GenerationRequest::Grammar {
                topic,
                difficulty,
                count,
            } => client.generate_grammar_quiz(topic, *difficulty, *count).await,
            GenerationRequest::Vocabulary {
                direction,
                difficulty,
                count,
            } => {
                client
                    .generate_vocabulary_quiz(*direction, *difficulty, *count)
                    .await
            }
        }
    }
}

/// Input for the current question. Cleared on every advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerAttempt {
    pub answer: Option<Answer>,
    pub verdict: Option<Verdict>,
}

impl AnswerAttempt {
    pub fn is_graded(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.verdict.as_ref().is_some_and(|v| v.correct)
    }
}

/// Final result of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    /// `score / total` as a rounded percentage.
    pub percentage: u32,
}

/// One practice attempt, from setup to completion.
#[derive(Debug, Clone)]
pub struct QuizSession {
    mode: PracticeMode,
    config: QuizConfig,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    verdicts: Vec<Verdict>,
    attempt: AnswerAttempt,
    state: QuizState,
}

impl QuizSession {
    /// New grammar session. Without a topic the session practises mixed tenses.
    pub fn grammar(initial_topic: Option<&str>) -> Self {
        let topic = initial_topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_GRAMMAR_TOPIC);
        Self::new(PracticeMode::Grammar, topic, VocabDirection::default())
    }

    pub fn vocabulary(direction: VocabDirection) -> Self {
        Self::new(PracticeMode::Vocabulary, DEFAULT_VOCABULARY_TOPIC, direction)
    }

    fn new(mode: PracticeMode, topic: &str, direction: VocabDirection) -> Self {
        Self {
            mode,
            config: QuizConfig {
                topic: topic.to_string(),
                direction,
                difficulty: Difficulty::default(),
                question_count: QuestionCount::default(),
            },
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            verdicts: Vec::new(),
            attempt: AnswerAttempt::default(),
            state: QuizState::Setup,
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Stored verdicts, one per graded question, in question order.
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn attempt(&self) -> &AnswerAttempt {
        &self.attempt
    }

    pub fn is_completed(&self) -> bool {
        self.state == QuizState::Completed
    }

    /// The question being answered or reviewed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::Answering { index } | QuizState::Graded { index } => {
                self.questions.get(index)
            }
            _ => None,
        }
    }

    fn reject(&self, action: &'static str) -> ActionRejected {
        ActionRejected::InvalidState {
            action,
            state: self.state.name(),
        }
    }

    fn ensure_setup(&self, action: &'static str) -> Result<(), ActionRejected> {
        if self.state == QuizState::Setup {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    // -- setup ---------------------------------------------------------------

    pub fn set_topic(&mut self, topic: impl Into<String>) -> Result<(), ActionRejected> {
        self.ensure_setup("change the topic")?;
        if self.mode != PracticeMode::Grammar {
            return Err(ActionRejected::NotApplicable("topic"));
        }
        self.config.topic = topic.into();
        Ok(())
    }

    pub fn set_direction(&mut self, direction: VocabDirection) -> Result<(), ActionRejected> {
        self.ensure_setup("change the direction")?;
        if self.mode != PracticeMode::Vocabulary {
            return Err(ActionRejected::NotApplicable("direction"));
        }
        self.config.direction = direction;
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), ActionRejected> {
        self.ensure_setup("change the difficulty")?;
        self.config.difficulty = difficulty;
        Ok(())
    }

    pub fn set_question_count(&mut self, count: QuestionCount) -> Result<(), ActionRejected> {
        self.ensure_setup("change the question count")?;
        self.config.question_count = count;
        Ok(())
    }

    // -- generation ----------------------------------------------------------

    /// Enter `Generating` and describe the request to send.
    ///
    /// Allowed from setup, after an error (Try Again) and after completion
    /// (Retry). Every previous question, verdict and score is dropped.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, ActionRejected> {
        match self.state {
            QuizState::Setup | QuizState::Error { .. } | QuizState::Completed => {}
            QuizState::Generating => return Err(ActionRejected::AlreadyInFlight),
            _ => return Err(self.reject("start a quiz")),
        }

        self.questions.clear();
        self.verdicts.clear();
        self.current_index = 0;
        self.score = 0;
        self.attempt = AnswerAttempt::default();
        self.state = QuizState::Generating;

        let QuizConfig {
            topic,
            direction,
            difficulty,
            question_count,
        } = self.config.clone();
        info!(mode = %self.mode, %difficulty, count = %question_count, "generating quiz");

        Ok(match self.mode {
            PracticeMode::Grammar => GenerationRequest::Grammar {
                topic,
                difficulty,
                count: question_count,
            },
            PracticeMode::Vocabulary => GenerationRequest::Vocabulary {
                direction,
                difficulty,
                count: question_count,
            },
        })
    }

    /// Store the outcome of the request returned by `begin_generation`.
    pub fn complete_generation(
        &mut self,
        result: Result<Vec<Question>, GenerationError>,
    ) -> Result<(), ActionRejected> {
        if self.state != QuizState::Generating {
            return Err(self.reject("accept generated questions"));
        }

        let result =
            result.and_then(|questions| check_question_family(self.mode, &questions).map(|_| questions));

        match result {
            Ok(questions) => {
                info!(questions = questions.len(), "quiz ready");
                self.questions = questions;
                self.state = QuizState::Answering { index: 0 };
            }
            Err(e) => {
                warn!(error = %e, "quiz generation failed");
                self.state = QuizState::Error {
                    message: e.to_string(),
                };
            }
        }
        Ok(())
    }

    /// Generate questions with exactly one call to `client`.
    ///
    /// A failed call leaves the session in [`QuizState::Error`]; only refused
    /// actions are returned as errors.
    pub async fn start(&mut self, client: &dyn ContentGenerator) -> Result<(), ActionRejected> {
        let request = self.begin_generation()?;
        let result = request.execute(client).await;
        self.complete_generation(result)
    }

    /// Start over with the same configuration after completion or an error.
    pub async fn retry(&mut self, client: &dyn ContentGenerator) -> Result<(), ActionRejected> {
        match self.state {
            QuizState::Completed | QuizState::Error { .. } => self.start(client).await,
            _ => Err(self.reject("retry")),
        }
    }

    /// Leave a finished or failed attempt and edit the configuration again.
    pub fn back_to_setup(&mut self) -> Result<(), ActionRejected> {
        match self.state {
            QuizState::Completed | QuizState::Error { .. } => {
                self.questions.clear();
                self.verdicts.clear();
                self.current_index = 0;
                self.score = 0;
                self.attempt = AnswerAttempt::default();
                self.state = QuizState::Setup;
                Ok(())
            }
            _ => Err(self.reject("go back to setup")),
        }
    }

    // -- answering -----------------------------------------------------------

    /// Grade `answer` for the current question.
    ///
    /// Each question accepts one grading action; later ones are refused and
    /// the stored verdict never changes.
    pub fn answer(&mut self, answer: Answer) -> Result<&Verdict, ActionRejected> {
        let index = match self.state {
            QuizState::Answering { index } => index,
            QuizState::Graded { index } => return Err(ActionRejected::AlreadyAnswered(index)),
            _ => return Err(self.reject("answer")),
        };

        let verdict = grade(&self.questions[index], &answer)?;
        debug!(index, correct = verdict.correct, "question graded");
        if verdict.correct {
            self.score += 1;
        }
        self.verdicts.push(verdict.clone());
        self.attempt = AnswerAttempt {
            answer: Some(answer),
            verdict: Some(verdict),
        };
        self.state = QuizState::Graded { index };
        Ok(&self.verdicts[index])
    }

    /// Move past a graded question. After the last one the quiz completes.
    pub fn advance(&mut self) -> Result<(), ActionRejected> {
        let QuizState::Graded { index } = self.state else {
            return Err(self.reject("advance"));
        };

        if index + 1 < self.questions.len() {
            self.current_index = index + 1;
            self.attempt = AnswerAttempt::default();
            self.state = QuizState::Answering {
                index: self.current_index,
            };
        } else {
            self.state = QuizState::Completed;
            info!(score = self.score, total = self.questions.len(), "quiz completed");
        }
        Ok(())
    }

    /// Final score; `None` until the quiz is completed.
    pub fn summary(&self) -> Option<QuizSummary> {
        if !self.is_completed() {
            return None;
        }
        let total = self.questions.len();
        let percentage = (self.score as f64 / total as f64 * 100.0).round() as u32;
        Some(QuizSummary {
            score: self.score,
            total,
            percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::VerdictDetail;
    use crate::model::QuestionKind;
    use crate::testing::{multiple_choice, text_input, verb_forms, FakeGenerator};

    fn grammar_fake(n: u32) -> FakeGenerator {
        FakeGenerator::with_quizzes([Ok((1..=n).map(|id| multiple_choice(id, 1)).collect())])
    }

    #[tokio::test]
    async fn perfect_grammar_quiz() {
        let gen = grammar_fake(5);
        let mut quiz = QuizSession::grammar(Some("Present Perfect"));
        quiz.start(&gen).await.unwrap();
        assert_eq!(quiz.state(), &QuizState::Answering { index: 0 });

        for i in 0..5 {
            assert_eq!(quiz.current_index(), i);
            assert!(quiz.answer(Answer::Choice(1)).unwrap().correct);
            quiz.advance().unwrap();
        }

        assert!(quiz.is_completed());
        assert_eq!(
            quiz.summary(),
            Some(QuizSummary {
                score: 5,
                total: 5,
                percentage: 100
            })
        );
        assert_eq!(gen.calls(), 1);
        assert_eq!(
            gen.last_quiz_args.lock().unwrap().as_deref(),
            Some("Present Perfect/intermediate/5")
        );
    }

    #[tokio::test]
    async fn first_selection_locks_the_question() {
        let gen = grammar_fake(2);
        let mut quiz = QuizSession::grammar(None);
        quiz.start(&gen).await.unwrap();

        assert!(!quiz.answer(Answer::Choice(0)).unwrap().correct);
        assert_eq!(
            quiz.answer(Answer::Choice(1)).unwrap_err(),
            ActionRejected::AlreadyAnswered(0)
        );
        assert_eq!(quiz.score(), 0);
        assert!(!quiz.verdicts()[0].correct);
        assert_eq!(
            quiz.attempt().answer,
            Some(Answer::Choice(0)),
            "stored attempt keeps the first selection"
        );
    }

    #[tokio::test]
    async fn verb_forms_partial_match_scores_nothing() {
        let gen = FakeGenerator::with_quizzes([Ok(vec![verb_forms(1, ["go", "went", "gone"])])]);
        let mut quiz = QuizSession::vocabulary(VocabDirection::PlEn);
        quiz.start(&gen).await.unwrap();

        let verdict = quiz
            .answer(Answer::VerbForms([
                "Go".into(),
                " Went".into(),
                "Gon".into(),
            ]))
            .unwrap()
            .clone();
        assert!(!verdict.correct);
        assert_eq!(
            verdict.detail,
            VerdictDetail::VerbForms {
                matches: [true, true, false]
            }
        );
        assert_eq!(quiz.score(), 0);
    }

    #[tokio::test]
    async fn text_input_synonym_counts() {
        let gen = FakeGenerator::with_quizzes([Ok(vec![
            text_input(1, "hello", &["hi"]),
            text_input(2, "Paris", &[]),
        ])]);
        let mut quiz = QuizSession::vocabulary(VocabDirection::EnPl);
        quiz.start(&gen).await.unwrap();

        assert!(quiz.answer(Answer::Text("HI".into())).unwrap().correct);
        quiz.advance().unwrap();
        assert!(quiz.attempt().answer.is_none(), "attempt cleared on advance");
        assert!(quiz.answer(Answer::Text(" Paris ".into())).unwrap().correct);
        quiz.advance().unwrap();
        assert_eq!(quiz.summary().unwrap().score, 2);
    }

    #[tokio::test]
    async fn failed_generation_enters_error_and_try_again_repeats_request() {
        let gen = FakeGenerator::with_quizzes([
            Err(GenerationError::Provider("network error: connection refused".into())),
            Ok(vec![multiple_choice(1, 0)]),
        ]);
        let mut quiz = QuizSession::grammar(Some("Conditionals"));
        quiz.set_difficulty(Difficulty::Advanced).unwrap();
        let config_before = quiz.config().clone();

        quiz.start(&gen).await.unwrap();
        assert_eq!(
            quiz.state(),
            &QuizState::Error {
                message: "generation request failed: network error: connection refused".into()
            }
        );
        assert!(quiz.questions().is_empty());
        let first_args = gen.last_quiz_args.lock().unwrap().clone();

        quiz.retry(&gen).await.unwrap();
        assert_eq!(quiz.state(), &QuizState::Answering { index: 0 });
        assert_eq!(quiz.config(), &config_before);
        assert_eq!(*gen.last_quiz_args.lock().unwrap(), first_args);
        assert_eq!(gen.calls(), 2);
    }

    #[test]
    fn no_second_request_while_generating() {
        let mut quiz = QuizSession::grammar(None);
        let request = quiz.begin_generation().unwrap();
        assert!(matches!(request, GenerationRequest::Grammar { .. }));
        assert_eq!(
            quiz.begin_generation().unwrap_err(),
            ActionRejected::AlreadyInFlight
        );
        assert!(quiz.set_topic("Passive Voice").is_err());

        quiz.complete_generation(Ok(vec![multiple_choice(1, 0)]))
            .unwrap();
        assert!(quiz
            .complete_generation(Ok(vec![multiple_choice(2, 0)]))
            .is_err());
        assert_eq!(quiz.questions().len(), 1);
    }

    #[tokio::test]
    async fn completion_happens_exactly_once() {
        let gen = grammar_fake(1);
        let mut quiz = QuizSession::grammar(None);
        quiz.start(&gen).await.unwrap();

        assert!(quiz.advance().is_err(), "cannot advance before grading");
        quiz.answer(Answer::Choice(0)).unwrap();
        quiz.advance().unwrap();
        assert!(quiz.is_completed());
        assert!(quiz.advance().is_err());
        assert!(quiz.answer(Answer::Choice(1)).is_err());
        assert_eq!(quiz.summary().unwrap().percentage, 0);
    }

    #[tokio::test]
    async fn retry_from_completed_is_a_fresh_session() {
        let gen = FakeGenerator::with_quizzes([
            Ok(vec![multiple_choice(1, 2), multiple_choice(2, 2)]),
            Ok(vec![multiple_choice(3, 0), multiple_choice(4, 0)]),
        ]);
        let mut quiz = QuizSession::grammar(Some("Articles"));
        quiz.set_question_count(QuestionCount::Ten).unwrap();
        quiz.start(&gen).await.unwrap();
        for _ in 0..2 {
            quiz.answer(Answer::Choice(2)).unwrap();
            quiz.advance().unwrap();
        }
        assert_eq!(quiz.summary().unwrap().score, 2);

        quiz.retry(&gen).await.unwrap();
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.score(), 0);
        assert!(quiz.verdicts().is_empty());
        assert_eq!(quiz.questions()[0].id, 3);
        assert_eq!(quiz.config().question_count, QuestionCount::Ten);
        assert_eq!(quiz.config().topic, "Articles");
    }

    #[tokio::test]
    async fn score_matches_stored_verdicts() {
        let gen = FakeGenerator::with_quizzes([Ok(vec![
            multiple_choice(1, 0),
            multiple_choice(2, 1),
            multiple_choice(3, 2),
        ])]);
        let mut quiz = QuizSession::grammar(None);
        quiz.start(&gen).await.unwrap();
        for choice in [0, 0, 2] {
            quiz.answer(Answer::Choice(choice)).unwrap();
            quiz.advance().unwrap();
        }
        let summary = quiz.summary().unwrap();
        let correct = quiz.verdicts().iter().filter(|v| v.correct).count();
        assert_eq!(summary.score, correct);
        assert!(summary.score <= summary.total);
        assert_eq!(summary.percentage, 67);
    }

    #[tokio::test]
    async fn refused_answers_leave_question_open() {
        let gen = grammar_fake(1);
        let mut quiz = QuizSession::grammar(None);
        quiz.start(&gen).await.unwrap();

        assert!(matches!(
            quiz.answer(Answer::Choice(9)),
            Err(ActionRejected::OptionOutOfRange { index: 9, len: 4 })
        ));
        assert!(quiz.answer(Answer::Text("b".into())).is_err());
        assert_eq!(quiz.state(), &QuizState::Answering { index: 0 });
        assert!(quiz.answer(Answer::Choice(1)).unwrap().correct);
    }

    #[tokio::test]
    async fn wrong_question_family_becomes_error_state() {
        let gen = FakeGenerator::with_quizzes([Ok(vec![text_input(1, "cat", &[])])]);
        let mut quiz = QuizSession::grammar(None);
        quiz.start(&gen).await.unwrap();
        assert!(matches!(quiz.state(), QuizState::Error { .. }));
    }

    #[test]
    fn malformed_question_becomes_error_state() {
        let mut quiz = QuizSession::grammar(None);
        quiz.begin_generation().unwrap();
        let broken = Question {
            id: 1,
            text: "Pick one".into(),
            explanation: String::new(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".into()],
                correct_answer_index: 5,
            },
        };
        quiz.complete_generation(Ok(vec![broken])).unwrap();

        match quiz.state() {
            QuizState::Error { message } => assert!(message.contains("at least 2 options")),
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(quiz.questions().is_empty());
        assert!(quiz.answer(Answer::Choice(0)).is_err());
    }

    #[test]
    fn setup_edits_respect_mode() {
        let mut grammar = QuizSession::grammar(Some("  "));
        assert_eq!(grammar.config().topic, DEFAULT_GRAMMAR_TOPIC);
        assert_eq!(
            grammar.set_direction(VocabDirection::EnPl).unwrap_err(),
            ActionRejected::NotApplicable("direction")
        );

        let mut vocab = QuizSession::vocabulary(VocabDirection::PlEn);
        assert_eq!(vocab.config().topic, DEFAULT_VOCABULARY_TOPIC);
        assert!(vocab.set_topic("Food").is_err());
        vocab.set_direction(VocabDirection::EnPl).unwrap();
        assert_eq!(vocab.config().direction, VocabDirection::EnPl);
    }

    #[tokio::test]
    async fn back_to_setup_allows_reconfiguration() {
        let gen = FakeGenerator::with_quizzes([Err(GenerationError::EmptyResponse)]);
        let mut quiz = QuizSession::grammar(None);
        assert!(quiz.back_to_setup().is_err());
        quiz.start(&gen).await.unwrap();
        quiz.back_to_setup().unwrap();
        quiz.set_topic("Modal Verbs").unwrap();
        assert_eq!(quiz.state(), &QuizState::Setup);
    }
}
