//! Tutor chat session.

use tracing::warn;

use crate::error::{ActionRejected, GenerationError};
use crate::model::{ChatMessage, ChatRole};
use crate::traits::ContentGenerator;

pub const DEFAULT_WELCOME: &str =
    "Hello! I'm your English tutor. Ask me anything about grammar, vocabulary, or usage.";
pub const DEFAULT_CONNECTION_ERROR: &str =
    "Sorry, I couldn't reach the tutor right now. Please try again.";
/// Shown when the model answers with nothing.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't formulate a response.";

/// What to send for one user turn.
#[derive(Debug, Clone)]
pub struct TutorTurn {
    /// Conversation before the new message.
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// A conversation log with at most one reply pending.
#[derive(Debug, Clone)]
pub struct TutorSession {
    welcome: String,
    connection_error: String,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Default for TutorSession {
    fn default() -> Self {
        Self::new(DEFAULT_WELCOME)
    }
}

impl TutorSession {
    pub fn new(welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();
        Self {
            messages: vec![ChatMessage::new(ChatRole::Model, welcome.clone())],
            welcome,
            connection_error: DEFAULT_CONNECTION_ERROR.to_string(),
            pending: false,
        }
    }

    /// Replace the message appended when a reply fails.
    pub fn with_connection_error(mut self, text: impl Into<String>) -> Self {
        self.connection_error = text.into();
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Append the user's message and return what to send.
    pub fn begin_send(&mut self, text: &str) -> Result<TutorTurn, ActionRejected> {
        if self.pending {
            return Err(ActionRejected::AlreadyInFlight);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ActionRejected::EmptyAnswer);
        }
        let history = self.messages.clone();
        self.messages.push(ChatMessage::new(ChatRole::User, text));
        self.pending = true;
        Ok(TutorTurn {
            history,
            message: text.to_string(),
        })
    }

    /// Append the reply, or the connection-error message on failure.
    pub fn complete_send(
        &mut self,
        result: Result<String, GenerationError>,
    ) -> Result<&ChatMessage, ActionRejected> {
        if !self.pending {
            return Err(ActionRejected::InvalidState {
                action: "accept a reply",
                state: "idle",
            });
        }
        self.pending = false;
        let text = match result {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "tutor reply failed");
                self.connection_error.clone()
            }
        };
        self.messages.push(ChatMessage::new(ChatRole::Model, text));
        Ok(&self.messages[self.messages.len() - 1])
    }

    pub async fn send(
        &mut self,
        client: &dyn ContentGenerator,
        text: &str,
    ) -> Result<&ChatMessage, ActionRejected> {
        let turn = self.begin_send(text)?;
        let result = client.chat_with_tutor(&turn.history, &turn.message).await;
        self.complete_send(result)
    }

    /// Drop the conversation and start again from the welcome message.
    pub fn clear(&mut self) -> Result<(), ActionRejected> {
        if self.pending {
            return Err(ActionRejected::AlreadyInFlight);
        }
        self.messages = vec![ChatMessage::new(ChatRole::Model, self.welcome.clone())];
        Ok(())
    }
}
