//! LLM-backed participant.

use crate::agent::{Agent, AgentError};
use crate::llm_client::{ChatTurn, LlmClient};
use crate::protocol::Message;
use crate::schema::Form;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// A participant whose answers come from an LLM.
///
/// The agent keeps its own running transcript: every delivered message plus
/// its own utterances. A `form` request renders the schema into the prompt
/// and fails loud when the model's output does not conform; the engine
/// never retries on the agent's behalf.
pub struct LlmAgent {
    name: String,
    client: LlmClient,
    transcript: Vec<Message>,
}

impl LlmAgent {
    /// Creates an LLM agent for the named player.
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        Self {
            name: name.into(),
            client,
            transcript: Vec::new(),
        }
    }

    /// Remembers a validated form answer as the agent's own words; without
    /// this the model forgets its votes and potion decisions.
    fn record_answer(&mut self, form_name: &str, value: &Value) {
        self.transcript.push(Message::from_player(
            self.name.clone(),
            format!("{form_name}: {value}"),
        ));
    }

    /// Maps the transcript into provider turns from this agent's viewpoint.
    fn turns(&self) -> Vec<ChatTurn> {
        self.transcript
            .iter()
            .map(|message| match &message.author {
                None => ChatTurn::system(message.content.clone()),
                Some(author) if author == &self.name => ChatTurn::assistant(message.content.clone()),
                Some(author) => ChatTurn::user(Some(author.clone()), message.content.clone()),
            })
            .collect()
    }
}

/// Pulls a JSON value out of a model reply, tolerating code fences.
fn extract_json(reply: &str) -> Result<Value, AgentError> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body)
        .map_err(|e| AgentError::new(format!("model reply is not valid JSON: {e}")))
}

#[async_trait::async_trait]
impl Agent for LlmAgent {
    async fn init(&mut self) -> Result<(), AgentError> {
        debug!(player = %self.name, "LLM agent ready");
        Ok(())
    }

    async fn send(&mut self, messages: Vec<Message>) -> Result<(), AgentError> {
        // Own utterances come back through the router and are already in
        // the transcript; keeping the echo would double every own turn.
        self.transcript.extend(
            messages
                .into_iter()
                .filter(|message| message.author.as_deref() != Some(&self.name)),
        );
        Ok(())
    }

    #[instrument(skip(self, instructions, audience), fields(player = %self.name))]
    async fn chat(&mut self, instructions: &str, audience: &[String]) -> Result<String, AgentError> {
        let mut turns = self.turns();
        turns.push(ChatTurn::system(format!("Your name is {}.", self.name)));
        turns.push(ChatTurn::system(instructions.to_string()));
        turns.push(ChatTurn::system(format!(
            "Your audience: {}. Answer in plain speech, as yourself.",
            audience.join(", ")
        )));

        let content = self
            .client
            .complete(&turns)
            .await
            .map_err(|e| AgentError::new(e.to_string()))?;

        // Remember our own words; the router only echoes what the rule
        // chooses to broadcast.
        self.transcript.push(Message::from_player(self.name.clone(), content.clone()));
        Ok(content)
    }

    #[instrument(skip(self, instructions, form), fields(player = %self.name, form = %form.name))]
    async fn form(&mut self, instructions: &str, form: &Form) -> Result<Value, AgentError> {
        let schema = form.to_json_schema();
        let mut turns = self.turns();
        turns.push(ChatTurn::system(format!("Your name is {}.", self.name)));
        turns.push(ChatTurn::system(instructions.to_string()));
        turns.push(ChatTurn::system(format!(
            "{}\nAnswer with a single JSON value conforming to this JSON Schema, \
             and nothing else:\n{}",
            form.description, schema
        )));

        let reply = self
            .client
            .complete(&turns)
            .await
            .map_err(|e| AgentError::new(e.to_string()))?;

        let value = extract_json(&reply)?;
        if let Err(error) = form.schema.validate(&value) {
            warn!(player = %self.name, %error, "Model produced a non-conforming value");
            return Err(error.into());
        }

        self.record_answer(&form.name, &value);
        Ok(value)
    }
}
