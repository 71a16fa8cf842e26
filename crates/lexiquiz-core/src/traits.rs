//! Core trait definitions for LLM backends and the generative-content contract.
//!
//! `LlmProvider` is implemented by the `lexiquiz-providers` crate for each
//! HTTP backend. `ContentGenerator` is the typed boundary the sessions depend
//! on; [`crate::generator::LlmContentGenerator`] implements it over any
//! `LlmProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::model::{
    ChatMessage, Difficulty, Question, QuestionCount, VocabDirection, WritingFeedback,
    WritingLength,
};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that turn a prompt into text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one generation request.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate text from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// The user turn to answer.
    pub prompt: String,
    /// Optional system instruction.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Earlier conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// JSON schema the reply must conform to. `None` asks for plain text.
    #[serde(default)]
    pub response_schema: Option<serde_json::Value>,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from an LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text (JSON text when a schema was requested).
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Generative content contract
// ---------------------------------------------------------------------------

/// Typed operations the quiz, writing and tutor sessions depend on.
///
/// Structured operations must return values conforming to the wire schemas;
/// anything else is reported as [`GenerationError::Schema`].
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Multiple-choice grammar questions about `topic`.
    async fn generate_grammar_quiz(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError>;

    /// Translation drill made of text-input and verb-forms questions.
    ///
    /// The provider decides which targets are English verbs; that
    /// classification is not re-checked here.
    async fn generate_vocabulary_quiz(
        &self,
        direction: VocabDirection,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError>;

    async fn evaluate_writing(
        &self,
        topic: &str,
        text: &str,
        length: WritingLength,
    ) -> Result<WritingFeedback, GenerationError>;

    /// Free-text explanation of a grammar topic.
    async fn fetch_explanation(&self, topic_name: &str) -> Result<String, GenerationError>;

    async fn generate_writing_topic(&self, difficulty: Difficulty)
        -> Result<String, GenerationError>;

    /// Tutor reply to `message`, given the conversation so far.
    async fn chat_with_tutor(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError>;
}
