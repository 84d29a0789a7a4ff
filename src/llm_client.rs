//! LLM API client abstraction for OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Speaker role of one transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// Out-of-band narration and instructions.
    System,
    /// Another participant's words.
    User,
    /// This agent's own words.
    Assistant,
}

/// One turn of conversation handed to a provider.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Who is speaking, from the agent's point of view.
    pub role: TurnRole,
    /// Speaker name, for `User` turns that have one.
    pub name: Option<String>,
    /// The words.
    pub content: String,
}

impl ChatTurn {
    /// A system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            name: None,
            content: content.into(),
        }
    }

    /// A named user turn.
    pub fn user(name: Option<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            name,
            content: content.into(),
        }
    }

    /// An assistant turn (the agent's own prior words).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            name: None,
            content: content.into(),
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self { config }
    }

    /// Generates a completion from an ordered list of conversation turns.
    #[instrument(skip(self, turns), fields(provider = ?self.config.provider, model = %self.config.model, turns = turns.len()))]
    pub async fn complete(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        debug!("Generating completion");
        match self.config.provider {
            LlmProvider::OpenAI => self.complete_openai(turns).await,
            LlmProvider::Anthropic => self.complete_anthropic(turns).await,
        }
    }

    /// Generates a completion using Anthropic Claude.
    ///
    /// Anthropic takes a single system string, so system turns are folded
    /// together and user turns carry their speaker as a name prefix.
    #[instrument(skip(self, turns))]
    async fn complete_anthropic(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let client = reqwest::Client::new();

        let system: String = turns
            .iter()
            .filter(|t| t.role == TurnRole::System)
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages: Vec<serde_json::Value> = turns
            .iter()
            .filter(|t| t.role != TurnRole::System)
            .map(|t| match t.role {
                TurnRole::Assistant => serde_json::json!({
                    "role": "assistant",
                    "content": t.content,
                }),
                TurnRole::User | TurnRole::System => serde_json::json!({
                    "role": "user",
                    "content": match &t.name {
                        Some(name) => format!("{name}: {}", t.content),
                        None => t.content.clone(),
                    },
                }),
            })
            .collect();

        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "messages": messages,
        });

        debug!("Sending request to Anthropic");
        let response = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            LlmError::new(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(LlmError::new(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        let response_json: serde_json::Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, response = %response_text, "Failed to parse Anthropic response");
            LlmError::new(format!("Failed to parse response: {}", e))
        })?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using OpenAI.
    #[instrument(skip(self, turns))]
    async fn complete_openai(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(turns.len());
        for turn in turns {
            let message = match turn.role {
                TurnRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(turn.content.clone())
                        .build()
                        .map_err(|e| {
                            error!(error = ?e, "Failed to build system message");
                            LlmError::new(format!("Failed to build system message: {}", e))
                        })?,
                ),
                TurnRole::User => {
                    let mut builder = ChatCompletionRequestUserMessageArgs::default();
                    builder.content(turn.content.clone());
                    if let Some(name) = &turn.name {
                        builder.name(name.clone());
                    }
                    ChatCompletionRequestMessage::User(builder.build().map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?)
                }
                TurnRole::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(turn.content.clone())
                        .build()
                        .map_err(|e| {
                            error!(error = ?e, "Failed to build assistant message");
                            LlmError::new(format!("Failed to build assistant message: {}", e))
                        })?,
                ),
            };
            messages.push(message);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
