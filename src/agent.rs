//! The capability contract every participant implementation satisfies.

use crate::protocol::Message;
use crate::schema::{Form, SchemaError};
use derive_more::{Display, Error};
use serde_json::Value;
use tracing::error;

/// A participant in a game.
///
/// The engine calls [`Agent::init`] exactly once per game, delivers mailbox
/// batches through [`Agent::send`] (FIFO per recipient), and suspends on
/// [`Agent::chat`]/[`Agent::form`] until the participant answers. No timeout
/// is imposed at this layer.
#[async_trait::async_trait]
pub trait Agent: Send {
    /// One-time setup before the first round.
    async fn init(&mut self) -> Result<(), AgentError>;

    /// Delivers an ordered batch of inbound messages.
    async fn send(&mut self, messages: Vec<Message>) -> Result<(), AgentError>;

    /// Asks this participant for free text, given who will see it.
    async fn chat(&mut self, instructions: &str, audience: &[String]) -> Result<String, AgentError>;

    /// Asks this participant for a value conforming to `form`.
    ///
    /// # Errors
    ///
    /// Implementations must surface an explicit [`AgentError`] when they
    /// cannot produce a conforming value; a silent default is never an
    /// acceptable answer.
    async fn form(&mut self, instructions: &str, form: &Form) -> Result<Value, AgentError>;
}

/// Failure inside a participant implementation.
#[derive(Debug, Clone, Display, Error)]
#[display("agent error: {} at {}:{}", message, file, line)]
pub struct AgentError {
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl AgentError {
    /// Creates a new agent error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "Agent error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<SchemaError> for AgentError {
    #[track_caller]
    fn from(error: SchemaError) -> Self {
        AgentError::new(error.to_string())
    }
}
