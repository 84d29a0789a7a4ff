//! Participant implementations of the [`Agent`](crate::Agent) contract.

mod console;
mod llm;
mod scripted;

pub use console::ConsoleAgent;
pub use llm::LlmAgent;
pub use scripted::ScriptedAgent;
