//! Command-line interface for parley_games.

use clap::{Parser, Subcommand};

/// Parley Games - agent-driven social deduction games
#[derive(Parser, Debug)]
#[command(name = "parley_games")]
#[command(about = "Werewolf for mixed tables of humans and LLM agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one game of Werewolf with the configured roster
    Play {
        /// Path to the roster configuration file
        #[arg(short, long, default_value = "players.toml")]
        config: std::path::PathBuf,

        /// Seed for reproducible role assignment and orderings
        #[arg(long)]
        seed: Option<u64>,
    },
}
