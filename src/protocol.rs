//! Messages and the chat/form request contract.

use crate::schema::Form;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message as delivered to a participant's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sending participant, or `None` for the system voice.
    pub author: Option<String>,
    /// Message body.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            author: None,
            content: content.into(),
        }
    }

    /// Creates a message attributed to a participant.
    pub fn from_player(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            content: content.into(),
        }
    }
}

/// A message awaiting routing: body plus the names entitled to see it.
///
/// Audience membership is evaluated once, at send time. The audience list
/// has set semantics; callers build it without duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Sending participant, or `None` for the system voice.
    pub author: Option<String>,
    /// Message body.
    pub content: String,
    /// The only participants who will receive this message.
    pub audiences: Vec<String>,
}

impl OutboundMessage {
    /// Creates a system broadcast to `audiences`.
    pub fn system(content: impl Into<String>, audiences: Vec<String>) -> Self {
        Self {
            author: None,
            content: content.into(),
            audiences,
        }
    }

    /// Creates a participant-attributed broadcast to `audiences`.
    pub fn from_player(
        author: impl Into<String>,
        content: impl Into<String>,
        audiences: Vec<String>,
    ) -> Self {
        Self {
            author: Some(author.into()),
            content: content.into(),
            audiences,
        }
    }

    /// Strips the audience, leaving the deliverable message.
    pub fn message(&self) -> Message {
        Message {
            author: self.author.clone(),
            content: self.content.clone(),
        }
    }
}

/// A request issued by a game rule to exactly one responding participant.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Free-text request. The audience are silent observers of the
    /// instructions, not of the answer.
    Chat {
        /// The participant who answers.
        respondent: String,
        /// What the respondent is being asked to do.
        instructions: String,
        /// Who will see the eventual utterance.
        audience: Vec<String>,
    },
    /// Schema-constrained request.
    Form {
        /// The participant who answers.
        respondent: String,
        /// What the respondent is being asked to do.
        instructions: String,
        /// Expected shape of the answer.
        form: Form,
    },
}

/// The answer to a [`Request`], variant-matched to the request kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Free text produced by a chat request.
    Chat(String),
    /// A schema-conforming value produced by a form request.
    Form(Value),
}
