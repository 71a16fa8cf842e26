//! [`ContentGenerator`] over an [`LlmProvider`].
//!
//! Builds prompts and response schemas, sends one request per operation, and
//! parses the reply into typed values. Anything that does not parse, or that
//! breaks the per-operation rules (question family, non-empty list, score
//! range), is reported as [`GenerationError::Schema`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::GenerationError;
use crate::model::{
    ChatMessage, Difficulty, PracticeMode, Question, QuestionCount, QuestionKind, QuizData,
    VocabDirection, WritingFeedback, WritingLength,
};
use crate::traits::{ContentGenerator, GenerateRequest, LlmProvider};
use crate::{prompts, schema};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Reply used when an explanation comes back empty.
pub const EXPLANATION_FALLBACK: &str = "Could not load explanation.";
/// Topic used when topic generation comes back empty.
pub const WRITING_TOPIC_FALLBACK: &str = "Describe a memorable holiday you have taken.";

/// Content generator backed by a single provider and model.
pub struct LlmContentGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
}

impl LlmContentGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: GenerateRequest) -> Result<String, GenerationError> {
        let response = self.provider.generate(&request).await?;
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            bytes = response.content.len(),
            "generation finished"
        );
        Ok(response.content)
    }

    async fn plain(
        &self,
        prompt: String,
        system_prompt: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<String, GenerationError> {
        let content = self
            .send(GenerateRequest {
                model: self.model.clone(),
                prompt,
                system_prompt: system_prompt.map(str::to_string),
                history: history.to_vec(),
                response_schema: None,
                temperature: self.temperature,
            })
            .await?;
        Ok(content.trim().to_string())
    }

    async fn structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> Result<T, GenerationError> {
        let content = self
            .send(GenerateRequest {
                model: self.model.clone(),
                prompt,
                system_prompt: Some(prompts::JSON_SYSTEM_PROMPT.to_string()),
                history: Vec::new(),
                response_schema: Some(response_schema),
                temperature: self.temperature,
            })
            .await?;
        parse_json(&content)
    }
}

/// Parse a JSON reply, tolerating a surrounding markdown fence.
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, GenerationError> {
    let payload = extract_json_payload(content);
    if payload.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    serde_json::from_str(payload).map_err(|e| {
        warn!(error = %e, "response did not match schema");
        GenerationError::schema(e.to_string())
    })
}

/// Strip a ```json (or bare ```) fence if the model added one.
fn extract_json_payload(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Check that every question is well formed and belongs to the family
/// `mode` expects.
pub fn check_question_family(
    mode: PracticeMode,
    questions: &[Question],
) -> Result<(), GenerationError> {
    if questions.is_empty() {
        return Err(GenerationError::schema("quiz contains no questions"));
    }
    for q in questions {
        q.validate().map_err(GenerationError::schema)?;
        let fits = match mode {
            PracticeMode::Grammar => matches!(q.kind, QuestionKind::MultipleChoice { .. }),
            PracticeMode::Vocabulary => !matches!(q.kind, QuestionKind::MultipleChoice { .. }),
        };
        if !fits {
            return Err(GenerationError::schema(format!(
                "question {} has type '{}', not allowed in a {mode} quiz",
                q.id,
                q.kind.tag()
            )));
        }
    }
    Ok(())
}

/// Trim and drop one pair of surrounding double quotes.
fn clean_topic(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.to_string()
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate_grammar_quiz(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError> {
        let data: QuizData = self
            .structured(
                prompts::grammar_quiz(topic, difficulty, count),
                schema::grammar_quiz(),
            )
            .await?;
        check_question_family(PracticeMode::Grammar, &data.questions)?;
        Ok(data.questions)
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate_vocabulary_quiz(
        &self,
        direction: VocabDirection,
        difficulty: Difficulty,
        count: QuestionCount,
    ) -> Result<Vec<Question>, GenerationError> {
        let data: QuizData = self
            .structured(
                prompts::vocabulary_quiz(direction, difficulty, count),
                schema::vocabulary_quiz(),
            )
            .await?;
        check_question_family(PracticeMode::Vocabulary, &data.questions)?;
        Ok(data.questions)
    }

    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn evaluate_writing(
        &self,
        topic: &str,
        text: &str,
        length: WritingLength,
    ) -> Result<WritingFeedback, GenerationError> {
        let feedback: WritingFeedback = self
            .structured(
                prompts::writing_evaluation(topic, text, length),
                schema::writing_feedback(),
            )
            .await?;
        feedback.validate().map_err(GenerationError::Schema)?;
        Ok(feedback)
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn fetch_explanation(&self, topic_name: &str) -> Result<String, GenerationError> {
        let text = self
            .plain(prompts::explanation(topic_name), None, &[])
            .await?;
        if text.is_empty() {
            return Ok(EXPLANATION_FALLBACK.to_string());
        }
        Ok(text)
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate_writing_topic(
        &self,
        difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        let raw = self
            .plain(prompts::writing_topic(difficulty), None, &[])
            .await?;
        let topic = clean_topic(&raw);
        if topic.is_empty() {
            return Ok(WRITING_TOPIC_FALLBACK.to_string());
        }
        Ok(topic)
    }

    #[instrument(skip(self, history, message), fields(model = %self.model, turns = history.len()))]
    async fn chat_with_tutor(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError> {
        self.plain(
            message.to_string(),
            Some(prompts::TUTOR_SYSTEM_PROMPT),
            history,
        )
        .await
    }
}
