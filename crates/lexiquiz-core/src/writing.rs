//! Writing practice: get a topic, compose a draft, receive graded feedback.
//!
//! ```text
//! Setup -> GeneratingTopic -> Compose -> Evaluating -> Feedback
//! ```
//!
//! A failed call returns to the stage it started from and records
//! `last_error`; the draft survives a failed evaluation.

use tracing::{info, warn};

use crate::error::{ActionRejected, GenerationError};
use crate::model::{Difficulty, WritingFeedback, WritingLength};
use crate::traits::ContentGenerator;

/// Drafts shorter than this cannot be submitted.
pub const MIN_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingState {
    Setup,
    GeneratingTopic,
    Compose,
    Evaluating,
    Feedback,
}

impl WritingState {
    pub fn name(self) -> &'static str {
        match self {
            WritingState::Setup => "in setup",
            WritingState::GeneratingTopic => "generating a topic",
            WritingState::Compose => "composing",
            WritingState::Evaluating => "evaluating",
            WritingState::Feedback => "showing feedback",
        }
    }
}

/// Arguments of the evaluation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub topic: String,
    pub text: String,
    pub length: WritingLength,
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone)]
pub struct WritingSession {
    difficulty: Difficulty,
    length: WritingLength,
    topic: Option<String>,
    draft: String,
    feedback: Option<WritingFeedback>,
    last_error: Option<String>,
    state: WritingState,
}

impl Default for WritingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WritingSession {
    pub fn new() -> Self {
        Self {
            difficulty: Difficulty::default(),
            length: WritingLength::default(),
            topic: None,
            draft: String::new(),
            feedback: None,
            last_error: None,
            state: WritingState::Setup,
        }
    }

    pub fn state(&self) -> WritingState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn length(&self) -> WritingLength {
        self.length
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn feedback(&self) -> Option<&WritingFeedback> {
        self.feedback.as_ref()
    }

    /// Message of the most recent failed call, cleared when a call starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.draft)
    }

    pub fn can_submit(&self) -> bool {
        self.state == WritingState::Compose && self.word_count() >= MIN_WORDS
    }

    fn reject(&self, action: &'static str) -> ActionRejected {
        ActionRejected::InvalidState {
            action,
            state: self.state.name(),
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), ActionRejected> {
        if self.state != WritingState::Setup {
            return Err(self.reject("change the difficulty"));
        }
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn set_length(&mut self, length: WritingLength) -> Result<(), ActionRejected> {
        if self.state != WritingState::Setup {
            return Err(self.reject("change the length"));
        }
        self.length = length;
        Ok(())
    }

    /// Enter `GeneratingTopic`; returns the difficulty to ask for.
    pub fn begin_topic(&mut self) -> Result<Difficulty, ActionRejected> {
        match self.state {
            WritingState::Setup => {}
            WritingState::GeneratingTopic | WritingState::Evaluating => {
                return Err(ActionRejected::AlreadyInFlight)
            }
            _ => return Err(self.reject("generate a topic")),
        }
        self.last_error = None;
        self.state = WritingState::GeneratingTopic;
        Ok(self.difficulty)
    }

    pub fn complete_topic(
        &mut self,
        result: Result<String, GenerationError>,
    ) -> Result<(), ActionRejected> {
        if self.state != WritingState::GeneratingTopic {
            return Err(self.reject("accept a topic"));
        }
        match result {
            Ok(topic) => {
                info!(%topic, "writing topic ready");
                self.topic = Some(topic);
                self.draft.clear();
                self.state = WritingState::Compose;
            }
            Err(e) => {
                warn!(error = %e, "topic generation failed");
                self.last_error = Some(e.to_string());
                self.state = WritingState::Setup;
            }
        }
        Ok(())
    }

    pub async fn start(&mut self, client: &dyn ContentGenerator) -> Result<(), ActionRejected> {
        let difficulty = self.begin_topic()?;
        let result = client.generate_writing_topic(difficulty).await;
        self.complete_topic(result)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), ActionRejected> {
        if self.state != WritingState::Compose {
            return Err(self.reject("edit the draft"));
        }
        self.draft = text.into();
        Ok(())
    }

    /// Enter `Evaluating`. Refused while the draft is under [`MIN_WORDS`] words.
    pub fn begin_evaluation(&mut self) -> Result<EvaluationRequest, ActionRejected> {
        match self.state {
            WritingState::Compose => {}
            WritingState::GeneratingTopic | WritingState::Evaluating => {
                return Err(ActionRejected::AlreadyInFlight)
            }
            _ => return Err(self.reject("submit")),
        }
        let words = self.word_count();
        if words < MIN_WORDS {
            return Err(ActionRejected::DraftTooShort {
                words,
                min: MIN_WORDS,
            });
        }
        self.last_error = None;
        self.state = WritingState::Evaluating;
        Ok(EvaluationRequest {
            topic: self.topic.clone().unwrap_or_default(),
            text: self.draft.clone(),
            length: self.length,
        })
    }

    pub fn complete_evaluation(
        &mut self,
        result: Result<WritingFeedback, GenerationError>,
    ) -> Result<(), ActionRejected> {
        if self.state != WritingState::Evaluating {
            return Err(self.reject("accept feedback"));
        }
        match result {
            Ok(feedback) => {
                info!(overall = feedback.overall_score, "writing evaluated");
                self.feedback = Some(feedback);
                self.state = WritingState::Feedback;
            }
            Err(e) => {
                warn!(error = %e, "writing evaluation failed");
                self.last_error = Some(e.to_string());
                self.state = WritingState::Compose;
            }
        }
        Ok(())
    }

    pub async fn submit(&mut self, client: &dyn ContentGenerator) -> Result<(), ActionRejected> {
        let request = self.begin_evaluation()?;
        let result = client
            .evaluate_writing(&request.topic, &request.text, request.length)
            .await;
        self.complete_evaluation(result)
    }

    /// Back to setup, keeping difficulty and length.
    pub fn retry(&mut self) -> Result<(), ActionRejected> {
        if matches!(
            self.state,
            WritingState::GeneratingTopic | WritingState::Evaluating
        ) {
            return Err(ActionRejected::AlreadyInFlight);
        }
        self.topic = None;
        self.draft.clear();
        self.feedback = None;
        self.last_error = None;
        self.state = WritingState::Setup;
        Ok(())
    }
}
