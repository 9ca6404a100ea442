//! Command-line interface for strictly_noughts.

use clap::{Parser, Subcommand};

use crate::config::StorageBackend;

/// Strictly Noughts - two-player noughts and crosses with a result history
#[derive(Parser, Debug)]
#[command(name = "strictly_noughts")]
#[command(about = "Two-player noughts and crosses with a rolling result history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// History storage backend (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play at the terminal (default)
    Play,

    /// Print the stored result history
    History,
}
