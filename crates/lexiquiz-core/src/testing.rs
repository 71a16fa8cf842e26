//! Scripted `ContentGenerator` shared by the session tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::model::{
    ChatMessage, Difficulty, Question, QuestionCount, QuestionKind, VocabDirection,
    WritingFeedback, WritingLength,
};
use crate::traits::ContentGenerator;

/// Every call pops the next scripted reply of its kind.
#[derive(Default)]
pub struct FakeGenerator {
    pub quizzes: Mutex<VecDeque<Result<Vec<Question>, GenerationError>>>,
    pub topics: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub feedback: Mutex<VecDeque<Result<WritingFeedback, GenerationError>>>,
    pub replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub calls: AtomicU32,
    pub last_quiz_args: Mutex<Option<String>>,
}

impl FakeGenerator {
    pub fn with_quizzes(
        replies: impl IntoIterator<Item = Result<Vec<Question>, GenerationError>>,
    ) -> Self {
        let gen = Self::default();
        gen.quizzes.lock().unwrap().extend(replies);
        gen
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, GenerationError>>>) -> Result<T, GenerationError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Provider("no scripted reply".into())))
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate_grammar_quiz(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_quiz_args.lock().unwrap() = Some(format!("{topic}/{difficulty}/{count}"));
        Self::pop(&self.quizzes)
    }

    async fn generate_vocabulary_quiz(
        &self,
        direction: VocabDirection,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_quiz_args.lock().unwrap() = Some(format!("{direction:?}/{difficulty}/{count}"));
        Self::pop(&self.quizzes)
    }

    async fn evaluate_writing(
        &self,
        _topic: &str,
        _text: &str,
        _length: WritingLength,
    ) -> Result<WritingFeedback, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Self::pop(&self.feedback)
    }

    async fn fetch_explanation(&self, topic_name: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(format!("About {topic_name}"))
    }

    async fn generate_writing_topic(
        &self,
        _difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Self::pop(&self.topics)
    }

    async fn chat_with_tutor(
        &self,
        _history: &[ChatMessage],
        _message: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Self::pop(&self.replies)
    }
}

pub fn multiple_choice(id: u32, correct: usize) -> Question {
    Question {
        id,
        text: format!("Question {id}"),
        explanation: format!("Explanation {id}"),
        kind: QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: correct,
        },
    }
}

pub fn text_input(id: u32, correct: &str, acceptable: &[&str]) -> Question {
    Question {
        id,
        text: format!("Word {id}"),
        explanation: String::new(),
        kind: QuestionKind::TextInput {
            correct_answer: correct.into(),
            acceptable_answers: acceptable.iter().map(|s| s.to_string()).collect(),
        },
    }
}

pub fn verb_forms(id: u32, forms: [&str; 3]) -> Question {
    Question {
        id,
        text: format!("Verb {id}"),
        explanation: String::new(),
        kind: QuestionKind::VerbForms {
            forms: forms.map(String::from),
        },
    }
}

pub fn feedback(overall: u32) -> WritingFeedback {
    WritingFeedback {
        overall_score: overall,
        grammar_score: overall,
        vocabulary_score: overall,
        relevance_score: overall,
        general_feedback: "Nice effort.".into(),
        corrections: vec![],
    }
}
