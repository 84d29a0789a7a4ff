//! Deterministic participant for tests and offline runs.

use crate::agent::{Agent, AgentError};
use crate::protocol::Message;
use crate::schema::Form;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A participant that replays pre-arranged answers.
///
/// Chat requests return a fixed line; form requests pop the next queued
/// answer for that form's name, failing loud when the script runs dry.
/// Everything the agent receives is recorded behind shared handles so a
/// test can assert on deliveries after the game has consumed the agent.
pub struct ScriptedAgent {
    name: String,
    chat_line: String,
    answers: HashMap<String, VecDeque<Value>>,
    received: Arc<Mutex<Vec<Message>>>,
    forms_seen: Arc<Mutex<Vec<Form>>>,
    chats_seen: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl ScriptedAgent {
    /// Creates a scripted agent with no answers queued.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            chat_line: format!("{name} has nothing to add."),
            name,
            answers: HashMap::new(),
            received: Arc::new(Mutex::new(Vec::new())),
            forms_seen: Arc::new(Mutex::new(Vec::new())),
            chats_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the line returned for every chat request.
    pub fn with_chat_line(mut self, line: impl Into<String>) -> Self {
        self.chat_line = line.into();
        self
    }

    /// Queues an answer for the named form. Answers for the same form are
    /// consumed in the order they were queued.
    pub fn with_answer(mut self, form_name: impl Into<String>, answer: Value) -> Self {
        self.answers.entry(form_name.into()).or_default().push_back(answer);
        self
    }

    /// Handle onto every message this agent has been sent.
    pub fn received(&self) -> Arc<Mutex<Vec<Message>>> {
        Arc::clone(&self.received)
    }

    /// Handle onto every form this agent has been asked to fill.
    pub fn forms_seen(&self) -> Arc<Mutex<Vec<Form>>> {
        Arc::clone(&self.forms_seen)
    }

    /// Handle onto every chat request: instructions plus audience.
    pub fn chats_seen(&self) -> Arc<Mutex<Vec<(String, Vec<String>)>>> {
        Arc::clone(&self.chats_seen)
    }
}

#[async_trait::async_trait]
impl Agent for ScriptedAgent {
    async fn init(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    async fn send(&mut self, messages: Vec<Message>) -> Result<(), AgentError> {
        self.received.lock().unwrap().extend(messages);
        Ok(())
    }

    async fn chat(&mut self, instructions: &str, audience: &[String]) -> Result<String, AgentError> {
        self.chats_seen
            .lock()
            .unwrap()
            .push((instructions.to_string(), audience.to_vec()));
        Ok(self.chat_line.clone())
    }

    async fn form(&mut self, _instructions: &str, form: &Form) -> Result<Value, AgentError> {
        self.forms_seen.lock().unwrap().push(form.clone());
        self.answers
            .get_mut(&form.name)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                AgentError::new(format!(
                    "{} has no scripted answer for form {:?}",
                    self.name, form.name
                ))
            })
    }
}
