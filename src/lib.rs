//! Parley Games library - agent-driven social deduction games
//!
//! A turn-based, multi-party interaction engine: named participants
//! exchange audience-scoped messages and answer free-form chat or
//! schema-constrained form requests, under the control of a pluggable
//! [`GameRule`]. The Werewolf rule set is the reference game.
//!
//! # Architecture
//!
//! - **Schema**: the closed `Type` algebra describing form answers
//! - **Agent**: the init/send/chat/form contract every participant satisfies
//! - **Engine**: the play loop and the audience-scoped broadcast router
//! - **Games**: rule implementations (currently Werewolf)
//! - **Agents**: console, LLM-backed and scripted participants
//!
//! # Example
//!
//! ```no_run
//! use parley_games::games::werewolf::WerewolfRule;
//! use parley_games::{Roster, ScriptedAgent, play};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut roster = Roster::new();
//! for i in 1..=12 {
//!     let name = format!("player{i}");
//!     roster.register(name.clone(), Box::new(ScriptedAgent::new(name)))?;
//! }
//!
//! let mut rule = WerewolfRule::from_seed(42);
//! play(&mut rule, &roster).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod agents;
mod config;
mod engine;
mod llm_client;
mod protocol;
mod router;
mod schema;

// Public module declarations
pub mod games;

// Crate-level exports - Agent contract
pub use agent::{Agent, AgentError};

// Crate-level exports - Agent implementations
pub use agents::{ConsoleAgent, LlmAgent, ScriptedAgent};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, PlayerConfig, PlayerKind};

// Crate-level exports - Engine
pub use engine::{Callbacks, GameError, GameRule, Roster, play};

// Crate-level exports - LLM client
pub use llm_client::{ChatTurn, LlmClient, LlmConfig, LlmError, LlmProvider, TurnRole};

// Crate-level exports - Protocol
pub use protocol::{Message, OutboundMessage, Request, Response};

// Crate-level exports - Schema algebra
pub use schema::{Form, Fragment, SchemaError, Type};
