//! The generic play loop driving a [`GameRule`] to completion.

use crate::agent::{Agent, AgentError};
use crate::protocol::{OutboundMessage, Request, Response};
use crate::router;
use crate::schema::{Form, SchemaError};
use derive_more::{Display, Error, From};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// The named participants of one game.
///
/// Registration order is preserved; it is the participant order a rule sees.
pub struct Roster {
    order: Vec<String>,
    agents: HashMap<String, Mutex<Box<dyn Agent>>>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            agents: HashMap::new(),
        }
    }

    /// Registers a participant under a globally unique name.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DuplicatePlayer`] if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        agent: Box<dyn Agent>,
    ) -> Result<(), GameError> {
        let name = name.into();
        if self.agents.contains_key(&name) {
            return Err(GameError::DuplicatePlayer { name });
        }
        debug!(player = %name, "Registering participant");
        self.order.push(name.clone());
        self.agents.insert(name, Mutex::new(agent));
        Ok(())
    }

    /// Participant names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Mutex<Box<dyn Agent>>> {
        self.agents.get(name)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

/// The participant-facing operations handed to a rule.
///
/// `chat` and `form` resolve the responding participant from the request;
/// `send` routes audience-scoped broadcasts through the mailbox router.
pub struct Callbacks<'a> {
    roster: &'a Roster,
}

impl<'a> Callbacks<'a> {
    /// Creates callbacks over a roster.
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Routes a request to its named respondent and returns the answer.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownRespondent`] when the request names a
    /// participant that is not registered; there is no silent no-op.
    pub async fn request(&self, request: Request) -> Result<Response, GameError> {
        match request {
            Request::Chat {
                respondent,
                instructions,
                audience,
            } => {
                let agent = self.resolve(&respondent)?;
                // The respondent is not their own audience.
                let audience: Vec<String> =
                    audience.into_iter().filter(|n| n != &respondent).collect();
                let content = agent.lock().await.chat(&instructions, &audience).await?;
                Ok(Response::Chat(content))
            }
            Request::Form {
                respondent,
                instructions,
                form,
            } => {
                let agent = self.resolve(&respondent)?;
                let value = agent.lock().await.form(&instructions, &form).await?;
                Ok(Response::Form(value))
            }
        }
    }

    /// Asks `respondent` for free text.
    pub async fn chat(
        &self,
        respondent: &str,
        instructions: &str,
        audience: &[String],
    ) -> Result<String, GameError> {
        let request = Request::Chat {
            respondent: respondent.to_string(),
            instructions: instructions.to_string(),
            audience: audience.to_vec(),
        };
        match self.request(request).await? {
            Response::Chat(content) => Ok(content),
            Response::Form(_) => Err(GameError::Protocol(
                "form response to a chat request".to_string(),
            )),
        }
    }

    /// Asks `respondent` for a value conforming to `form`.
    pub async fn form(
        &self,
        respondent: &str,
        instructions: &str,
        form: &Form,
    ) -> Result<Value, GameError> {
        let request = Request::Form {
            respondent: respondent.to_string(),
            instructions: instructions.to_string(),
            form: form.clone(),
        };
        match self.request(request).await? {
            Response::Form(value) => Ok(value),
            Response::Chat(_) => Err(GameError::Protocol(
                "chat response to a form request".to_string(),
            )),
        }
    }

    /// Delivers a batch of audience-scoped messages, waiting for every
    /// recipient's delivery to complete before returning.
    pub async fn send(&self, messages: &[OutboundMessage]) -> Result<(), GameError> {
        router::deliver(self.roster, messages).await
    }

    fn resolve(&self, name: &str) -> Result<&Mutex<Box<dyn Agent>>, GameError> {
        self.roster.get(name).ok_or_else(|| GameError::UnknownRespondent {
            name: name.to_string(),
        })
    }
}

/// A pluggable game: decides each round what to ask and what comes next.
///
/// The engine never inspects `State`; it is created by [`GameRule::init`],
/// handed by value into each [`GameRule::next`], and replaced wholesale by
/// the returned value. `None` terminates the game.
#[async_trait::async_trait]
pub trait GameRule: Send {
    /// Rule-defined state threaded through the play loop.
    type State: Send;

    /// Creates the initial state and performs any opening broadcasts.
    async fn init(
        &mut self,
        players: &[String],
        cx: &Callbacks<'_>,
    ) -> Result<Self::State, GameError>;

    /// Plays one round, returning the next state or `None` when finished.
    async fn next(
        &mut self,
        state: Self::State,
        cx: &Callbacks<'_>,
    ) -> Result<Option<Self::State>, GameError>;
}

/// Runs `rule` over `roster` until the rule signals completion.
///
/// Initializes every agent exactly once, then loops `next`. The engine
/// performs no retries and imposes no timeout; the first unhandled error
/// aborts the run.
#[instrument(skip(rule, roster), fields(players = roster.len()))]
pub async fn play<R: GameRule>(rule: &mut R, roster: &Roster) -> Result<(), GameError> {
    info!("Initializing participants");
    for name in roster.names() {
        let agent = roster.get(name).ok_or_else(|| GameError::UnknownRespondent {
            name: name.clone(),
        })?;
        agent.lock().await.init().await?;
    }

    let cx = Callbacks::new(roster);
    let mut state = rule.init(roster.names(), &cx).await?;
    let mut rounds = 0u32;

    loop {
        match rule.next(state, &cx).await? {
            Some(next) => {
                rounds += 1;
                debug!(rounds, "Round complete");
                state = next;
            }
            None => break,
        }
    }

    info!(rounds, "Game complete");
    Ok(())
}

/// Engine-level failure.
#[derive(Debug, Display, Error, From)]
pub enum GameError {
    /// The rule's cohort precondition was violated at `init`.
    #[display("the game needs exactly {expected} players, got {actual}")]
    Cohort {
        /// Required cohort size.
        expected: usize,
        /// Size actually supplied.
        actual: usize,
    },
    /// A participant name was registered twice.
    #[display("player {name:?} is already registered")]
    DuplicatePlayer {
        /// The duplicated name.
        name: String,
    },
    /// A request or broadcast named a participant that is not registered.
    #[display("no such participant: {name:?}")]
    UnknownRespondent {
        /// The unresolvable name.
        name: String,
    },
    /// A form answer could not be interpreted by the rule.
    #[display("bad answer to form {form:?}: {reason}")]
    Answer {
        /// Name of the form that was answered.
        form: String,
        /// Why the answer was rejected.
        reason: String,
    },
    /// Request and response variants disagreed.
    #[display("protocol violation: {_0}")]
    Protocol(#[error(not(source))] String),
    /// A participant implementation failed.
    #[display("participant failure: {_0}")]
    #[from]
    Agent(AgentError),
    /// A value failed schema validation.
    #[display("{_0}")]
    #[from]
    Schema(SchemaError),
}
