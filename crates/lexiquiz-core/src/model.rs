//! Core data model types for lexiquiz.
//!
//! Quiz configuration, the question sum type and its flat JSON wire form,
//! writing feedback, and tutor chat messages.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proficiency level a quiz or writing task is pitched at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Number of questions in a quiz. Only 5, 10 and 15 are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuestionCount {
    #[default]
    Five,
    Ten,
    Fifteen,
}

impl QuestionCount {
    pub fn get(self) -> u32 {
        match self {
            QuestionCount::Five => 5,
            QuestionCount::Ten => 10,
            QuestionCount::Fifteen => 15,
        }
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            5 => Ok(QuestionCount::Five),
            10 => Ok(QuestionCount::Ten),
            15 => Ok(QuestionCount::Fifteen),
            other => Err(format!("question count must be 5, 10 or 15, got {other}")),
        }
    }
}

impl From<QuestionCount> for u32 {
    fn from(count: QuestionCount) -> Self {
        count.get()
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for QuestionCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid question count: '{s}'"))?;
        QuestionCount::try_from(n)
    }
}

/// Which kind of practice a quiz session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    Grammar,
    Vocabulary,
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PracticeMode::Grammar => write!(f, "grammar"),
            PracticeMode::Vocabulary => write!(f, "vocabulary"),
        }
    }
}

impl FromStr for PracticeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grammar" => Ok(PracticeMode::Grammar),
            "vocabulary" | "vocab" => Ok(PracticeMode::Vocabulary),
            other => Err(format!("unknown practice mode: {other}")),
        }
    }
}

/// Translation direction of a vocabulary quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VocabDirection {
    #[default]
    #[serde(rename = "PL_EN")]
    PlEn,
    #[serde(rename = "EN_PL")]
    EnPl,
}

impl VocabDirection {
    pub fn source_language(self) -> &'static str {
        match self {
            VocabDirection::PlEn => "Polish",
            VocabDirection::EnPl => "English",
        }
    }

    pub fn target_language(self) -> &'static str {
        match self {
            VocabDirection::PlEn => "English",
            VocabDirection::EnPl => "Polish",
        }
    }
}

impl fmt::Display for VocabDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_language(), self.target_language())
    }
}

impl FromStr for VocabDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "pl-en" => Ok(VocabDirection::PlEn),
            "en-pl" => Ok(VocabDirection::EnPl),
            other => Err(format!("unknown vocabulary direction: {other}")),
        }
    }
}

/// A single quiz question. Immutable once received from the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireQuestion", into = "WireQuestion")]
pub struct Question {
    pub id: u32,
    /// The prompt shown to the learner.
    pub text: String,
    pub explanation: String,
    pub kind: QuestionKind,
}

/// The variant-specific answer key of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_answer_index: usize,
    },
    TextInput {
        correct_answer: String,
        acceptable_answers: Vec<String>,
    },
    /// Base form, simple past, past participle.
    VerbForms { forms: [String; 3] },
}

impl QuestionKind {
    /// The wire `type` tag of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::TextInput { .. } => "text-input",
            QuestionKind::VerbForms { .. } => "verb-forms",
        }
    }
}

impl Question {
    /// The answer to reveal once the question is graded.
    pub fn canonical_answer(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer_index,
            } => options
                .get(*correct_answer_index)
                .cloned()
                .unwrap_or_default(),
            QuestionKind::TextInput { correct_answer, .. } => correct_answer.clone(),
            QuestionKind::VerbForms { forms } => forms.join(" / "),
        }
    }

    /// Check the answer key: a choice question needs at least 2 options and
    /// a correct index inside them.
    pub fn validate(&self) -> Result<(), String> {
        if let QuestionKind::MultipleChoice {
            options,
            correct_answer_index,
        } = &self.kind
        {
            if options.len() < 2 {
                return Err(format!(
                    "question {}: needs at least 2 options, got {}",
                    self.id,
                    options.len()
                ));
            }
            if *correct_answer_index >= options.len() {
                return Err(format!(
                    "question {}: correctAnswerIndex {correct_answer_index} out of range for {} options",
                    self.id,
                    options.len()
                ));
            }
        }
        Ok(())
    }
}

/// Flat JSON shape shared by grammar and vocabulary quiz responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    id: u32,
    #[serde(rename = "type")]
    kind: WireKind,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acceptable_answers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verb_forms: Option<Vec<String>>,
    explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum WireKind {
    MultipleChoice,
    TextInput,
    VerbForms,
}

impl TryFrom<WireQuestion> for Question {
    type Error = String;

    fn try_from(w: WireQuestion) -> Result<Self, Self::Error> {
        let kind = match w.kind {
            WireKind::MultipleChoice => {
                let options = w
                    .options
                    .ok_or_else(|| format!("question {}: missing options", w.id))?;
                let index = w
                    .correct_answer_index
                    .ok_or_else(|| format!("question {}: missing correctAnswerIndex", w.id))?;
                let correct_answer_index = usize::try_from(index).map_err(|_| {
                    format!(
                        "question {}: correctAnswerIndex {index} out of range for {} options",
                        w.id,
                        options.len()
                    )
                })?;
                QuestionKind::MultipleChoice {
                    options,
                    correct_answer_index,
                }
            }
            WireKind::TextInput => QuestionKind::TextInput {
                correct_answer: w
                    .correct_answer
                    .ok_or_else(|| format!("question {}: missing correctAnswer", w.id))?,
                acceptable_answers: w.acceptable_answers.unwrap_or_default(),
            },
            WireKind::VerbForms => {
                let forms = w
                    .verb_forms
                    .ok_or_else(|| format!("question {}: missing verbForms", w.id))?;
                let forms: [String; 3] = forms.try_into().map_err(|v: Vec<String>| {
                    format!("question {}: expected 3 verb forms, got {}", w.id, v.len())
                })?;
                QuestionKind::VerbForms { forms }
            }
        };

        let question = Question {
            id: w.id,
            text: w.text,
            explanation: w.explanation,
            kind,
        };
        question.validate()?;
        Ok(question)
    }
}

impl From<Question> for WireQuestion {
    fn from(q: Question) -> Self {
        let mut w = WireQuestion {
            id: q.id,
            kind: WireKind::MultipleChoice,
            text: q.text,
            options: None,
            correct_answer_index: None,
            correct_answer: None,
            acceptable_answers: None,
            verb_forms: None,
            explanation: q.explanation,
        };
        match q.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer_index,
            } => {
                w.options = Some(options);
                w.correct_answer_index = Some(correct_answer_index as i64);
            }
            QuestionKind::TextInput {
                correct_answer,
                acceptable_answers,
            } => {
                w.kind = WireKind::TextInput;
                w.correct_answer = Some(correct_answer);
                w.acceptable_answers = Some(acceptable_answers);
            }
            QuestionKind::VerbForms { forms } => {
                w.kind = WireKind::VerbForms;
                w.correct_answer = Some(forms[0].clone());
                w.verb_forms = Some(forms.to_vec());
            }
        }
        w
    }
}

/// Top-level quiz response from the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// Target length bucket for a writing task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl WritingLength {
    /// Label sent to the evaluator, including the word range.
    pub fn label(self) -> &'static str {
        match self {
            WritingLength::Short => "Short (50-100 words)",
            WritingLength::Medium => "Medium (100-200 words)",
            WritingLength::Long => "Long (200+ words)",
        }
    }
}

impl fmt::Display for WritingLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WritingLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(WritingLength::Short),
            "medium" => Ok(WritingLength::Medium),
            "long" => Ok(WritingLength::Long),
            other => Err(format!("unknown writing length: {other}")),
        }
    }
}

/// Graded feedback on a piece of writing, trusted verbatim from the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingFeedback {
    pub overall_score: u32,
    pub grammar_score: u32,
    pub vocabulary_score: u32,
    pub relevance_score: u32,
    pub general_feedback: String,
    pub corrections: Vec<Correction>,
}

impl WritingFeedback {
    /// Check that every score lies in 0..=100.
    pub fn validate(&self) -> Result<(), String> {
        let scores = [
            ("overallScore", self.overall_score),
            ("grammarScore", self.grammar_score),
            ("vocabularyScore", self.vocabulary_score),
            ("relevanceScore", self.relevance_score),
        ];
        for (name, score) in scores {
            if score > 100 {
                return Err(format!("{name} {score} is outside 0-100"));
            }
        }
        Ok(())
    }
}

/// One suggested fix in a piece of writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub correction: String,
    pub explanation: String,
}

/// Author of a tutor chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in a tutor conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Beginner.to_string(), "beginner");
        assert_eq!(
            "Advanced".parse::<Difficulty>().unwrap(),
            Difficulty::Advanced
        );
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Intermediate);
    }

    #[test]
    fn question_count_only_accepts_offered_sizes() {
        assert_eq!("10".parse::<QuestionCount>().unwrap(), QuestionCount::Ten);
        assert!("7".parse::<QuestionCount>().is_err());
        assert!("ten".parse::<QuestionCount>().is_err());
        assert_eq!(QuestionCount::Fifteen.get(), 15);
    }

    #[test]
    fn direction_parses_both_spellings() {
        assert_eq!(
            "pl-en".parse::<VocabDirection>().unwrap(),
            VocabDirection::PlEn
        );
        assert_eq!(
            "EN_PL".parse::<VocabDirection>().unwrap(),
            VocabDirection::EnPl
        );
        assert_eq!(
            serde_json::to_string(&VocabDirection::PlEn).unwrap(),
            "\"PL_EN\""
        );
    }

    #[test]
    fn multiple_choice_from_wire() {
        let q: Question = serde_json::from_value(serde_json::json!({
            "id": 1,
            "type": "multiple-choice",
            "text": "She ___ to school every day.",
            "options": ["go", "goes", "going", "gone"],
            "correctAnswerIndex": 1,
            "explanation": "Third person singular takes -s."
        }))
        .unwrap();
        assert_eq!(q.kind.tag(), "multiple-choice");
        assert_eq!(q.canonical_answer(), "goes");
    }

    #[test]
    fn text_input_without_synonyms() {
        let q: Question = serde_json::from_value(serde_json::json!({
            "id": 2,
            "type": "text-input",
            "text": "dom",
            "correctAnswer": "house",
            "explanation": "My house is small."
        }))
        .unwrap();
        match q.kind {
            QuestionKind::TextInput {
                correct_answer,
                acceptable_answers,
            } => {
                assert_eq!(correct_answer, "house");
                assert!(acceptable_answers.is_empty());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn verb_forms_require_exactly_three() {
        let bad = serde_json::from_value::<Question>(serde_json::json!({
            "id": 3,
            "type": "verb-forms",
            "text": "iść",
            "correctAnswer": "go",
            "verbForms": ["go", "went"],
            "explanation": "I went home."
        }));
        assert!(bad.unwrap_err().to_string().contains("expected 3 verb forms"));

        let good: Question = serde_json::from_value(serde_json::json!({
            "id": 3,
            "type": "verb-forms",
            "text": "iść",
            "correctAnswer": "go",
            "verbForms": ["go", "went", "gone"],
            "explanation": "I went home."
        }))
        .unwrap();
        assert_eq!(good.canonical_answer(), "go / went / gone");
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = serde_json::from_value::<Question>(serde_json::json!({
            "id": 4,
            "type": "multiple-choice",
            "text": "?",
            "options": ["a", "b"],
            "correctAnswerIndex": 2,
            "explanation": ""
        }))
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let err = serde_json::from_value::<Question>(serde_json::json!({
            "id": 4,
            "type": "multiple-choice",
            "text": "?",
            "options": ["a", "b"],
            "correctAnswerIndex": -1,
            "explanation": ""
        }))
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn rejects_single_option_and_unknown_tag() {
        assert!(serde_json::from_value::<Question>(serde_json::json!({
            "id": 5,
            "type": "multiple-choice",
            "text": "?",
            "options": ["only"],
            "correctAnswerIndex": 0,
            "explanation": ""
        }))
        .is_err());
        assert!(serde_json::from_value::<Question>(serde_json::json!({
            "id": 5,
            "type": "essay",
            "text": "?",
            "explanation": ""
        }))
        .is_err());
    }

    #[test]
    fn validate_checks_hand_built_questions() {
        let mut q = Question {
            id: 6,
            text: "?".into(),
            explanation: String::new(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".into()],
                correct_answer_index: 5,
            },
        };
        assert!(q.validate().unwrap_err().contains("at least 2 options"));
        assert_eq!(q.canonical_answer(), "");

        q.kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into()],
            correct_answer_index: 5,
        };
        assert!(q.validate().unwrap_err().contains("out of range"));

        q.kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into()],
            correct_answer_index: 1,
        };
        assert!(q.validate().is_ok());
    }

    #[test]
    fn feedback_scores_are_bounded() {
        let mut feedback = WritingFeedback {
            overall_score: 80,
            grammar_score: 75,
            vocabulary_score: 90,
            relevance_score: 85,
            general_feedback: "Good work.".into(),
            corrections: vec![],
        };
        assert!(feedback.validate().is_ok());
        feedback.grammar_score = 120;
        assert!(feedback.validate().unwrap_err().contains("grammarScore"));
    }

    #[test]
    fn writing_length_labels() {
        assert_eq!(WritingLength::default().label(), "Medium (100-200 words)");
        assert_eq!(
            "short".parse::<WritingLength>().unwrap(),
            WritingLength::Short
        );
    }
}
