//! Error types shared across lexiquiz crates.
//!
//! `ProviderError` classifies transport failures from an LLM backend so the
//! providers crate and the CLI can report them without string matching.
//! `GenerationError` is what a session sees when a generative call fails, and
//! `ActionRejected` is returned when a session refuses an action in its
//! current state.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A generative call failed or returned something outside its contract.
///
/// Sessions store this as a recoverable error; it never escapes the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The provider call itself failed.
    #[error("generation request failed: {0}")]
    Provider(String),

    /// The provider answered with no text at all.
    #[error("no response from the language model")]
    EmptyResponse,

    /// The response did not conform to the requested schema.
    #[error("response did not match the expected schema: {0}")]
    Schema(String),
}

impl GenerationError {
    pub fn schema(msg: impl Into<String>) -> Self {
        GenerationError::Schema(msg.into())
    }
}

/// An action refused by a session; the session state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    /// The action is not valid in the session's current state.
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    /// A generation request is already outstanding for this session.
    #[error("a request is already in flight")]
    AlreadyInFlight,

    /// The current question has already been graded.
    #[error("question {0} has already been answered")]
    AlreadyAnswered(usize),

    /// The answer kind does not fit the question kind.
    #[error("a {answer} answer cannot be given to a {question} question")]
    AnswerKindMismatch {
        answer: &'static str,
        question: &'static str,
    },

    /// The chosen option is not one of the question's options.
    #[error("option {index} is out of range (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    /// A required input field is blank.
    #[error("answer is empty")]
    EmptyAnswer,

    /// The writing draft is below the minimum word count.
    #[error("draft has {words} words, at least {min} are required")]
    DraftTooShort { words: usize, min: usize },

    /// The configuration field does not apply to this practice mode.
    #[error("{0} cannot be changed in this practice mode")]
    NotApplicable(&'static str),
}

impl From<ProviderError> for GenerationError {
    fn from(e: ProviderError) -> Self {
        GenerationError::Provider(e.to_string())
    }
}

impl From<anyhow::Error> for GenerationError {
    fn from(e: anyhow::Error) -> Self {
        GenerationError::Provider(format!("{e:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_provider_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("x".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert_eq!(
            ProviderError::RateLimited {
                retry_after_ms: 2000
            }
            .retry_after_ms(),
            Some(2000)
        );
    }

    #[test]
    fn provider_error_message_is_carried_verbatim() {
        let err: GenerationError = ProviderError::ApiError {
            status: 503,
            message: "overloaded".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "generation request failed: API error (HTTP 503): overloaded"
        );
    }

    #[test]
    fn anyhow_chain_is_flattened() {
        let err = anyhow::anyhow!("connection reset").context("calling gemini");
        let gen: GenerationError = err.into();
        assert_eq!(
            gen,
            GenerationError::Provider("calling gemini: connection reset".into())
        );
    }
}
