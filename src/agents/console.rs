//! Human participant on a terminal.

use crate::agent::{Agent, AgentError};
use crate::protocol::Message;
use crate::schema::{Form, Type};
use serde_json::Value;
use tracing::debug;

/// A human player reading and typing on the process terminal.
///
/// Form answers are coerced and validated locally, re-prompting until the
/// typed input conforms, so the engine only ever sees a valid value.
pub struct ConsoleAgent {
    name: String,
}

impl ConsoleAgent {
    /// Creates a console agent for the named player.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    async fn prompt(&self, text: String) -> Result<String, AgentError> {
        tokio::task::spawn_blocking(move || {
            use std::io::Write;
            let mut stdout = std::io::stdout();
            write!(stdout, "{text}")
                .and_then(|_| stdout.flush())
                .map_err(|e| AgentError::new(format!("console write failed: {e}")))?;
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .map_err(|e| AgentError::new(format!("console read failed: {e}")))?;
            Ok(line)
        })
        .await
        .map_err(|e| AgentError::new(format!("console task failed: {e}")))?
    }

    fn print(&self, text: &str) {
        println!("{text}");
    }
}

/// One line of guidance for typing a value of `ty`.
fn input_hint(ty: &Type) -> String {
    match ty {
        Type::Unit | Type::Null => "Press enter.".to_string(),
        Type::String => "Type your answer.".to_string(),
        Type::Number => "Type a number.".to_string(),
        Type::Boolean => "Type yes or no.".to_string(),
        Type::Union(alternatives) => {
            let options: Vec<String> = alternatives
                .iter()
                .map(|a| format!("  {} - {}", a.name, a.description))
                .collect();
            format!(
                "Options (type a bare name, or JSON for options that need a value):\n{}",
                options.join("\n")
            )
        }
        Type::Product(_) | Type::List(_) => "Type the answer as JSON.".to_string(),
    }
}

#[async_trait::async_trait]
impl Agent for ConsoleAgent {
    async fn init(&mut self) -> Result<(), AgentError> {
        debug!(player = %self.name, "Console agent ready");
        Ok(())
    }

    async fn send(&mut self, messages: Vec<Message>) -> Result<(), AgentError> {
        for message in messages {
            // Own utterances come back through the router; don't echo them.
            if message.author.as_deref() == Some(&self.name) {
                continue;
            }
            let author = message.author.as_deref().unwrap_or("<system>");
            self.print(&format!("[{}] From {}: {}", self.name, author, message.content));
        }
        Ok(())
    }

    async fn chat(&mut self, instructions: &str, audience: &[String]) -> Result<String, AgentError> {
        self.print(&format!("[{}] Instructions: {}", self.name, instructions));
        self.print(&format!("[{}] Audience: {}", self.name, audience.join(", ")));
        let line = self.prompt(format!("[{}]: ", self.name)).await?;
        Ok(line.trim_end().to_string())
    }

    async fn form(&mut self, instructions: &str, form: &Form) -> Result<Value, AgentError> {
        self.print(&format!("[{}] Instructions: {}", self.name, instructions));
        self.print(&format!("[{}] {}", self.name, form.description));
        self.print(&input_hint(&form.schema));

        loop {
            let line = self.prompt(format!("[{}]: ", self.name)).await?;
            match form
                .schema
                .coerce_str(&line)
                .and_then(|value| form.schema.validate(&value).map(|_| value))
            {
                Ok(value) => return Ok(value),
                Err(error) => {
                    self.print(&format!("[{}] Invalid answer: {}. Try again.", self.name, error));
                }
            }
        }
    }
}
