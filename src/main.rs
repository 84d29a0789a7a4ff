//! Parley Games - Unified CLI
//!
//! Runs a game of Werewolf over a configured roster of console and LLM
//! players.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use parley_games::games::werewolf::WerewolfRule;
use parley_games::{
    Agent, ConsoleAgent, GameConfig, LlmAgent, LlmClient, PlayerKind, Roster, play,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, seed } => run_play(config, seed).await,
    }
}

/// Run one game of Werewolf
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_play(config_path: std::path::PathBuf, seed: Option<u64>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Parley Games");

    let config = GameConfig::from_file(&config_path)?;
    let mut roster = Roster::new();

    for player in config.players() {
        let agent: Box<dyn Agent> = match player.kind() {
            PlayerKind::Console => Box::new(ConsoleAgent::new(player.name().clone())),
            PlayerKind::Llm => {
                let llm_config = player.create_llm_config()?;
                Box::new(LlmAgent::new(
                    player.name().clone(),
                    LlmClient::new(llm_config),
                ))
            }
        };
        roster.register(player.name().clone(), agent)?;
    }

    let mut rule = match seed {
        Some(seed) => {
            info!(seed, "Using fixed seed");
            WerewolfRule::from_seed(seed)
        }
        None => WerewolfRule::new(),
    };

    play(&mut rule, &roster).await?;

    info!("Game finished");
    Ok(())
}
