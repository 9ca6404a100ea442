//! Strictly Noughts - terminal host
//!
//! Reads intents from stdin, drives a session and prints the board.

use anyhow::Result;
use clap::Parser;
use strictly_noughts::{
    AppConfig, Cli, Command, ConsoleCommand, HELP, HISTORY_KEY, HistoryStore, ResultHistory, SessionEvent,
    SessionHost, parse_line, render,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_play(config).await,
        Command::History => run_history(config).await,
    }
}

/// Reads the config file if given, then applies command-line overrides.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(storage) = cli.storage {
        config = config.with_storage(storage);
    }
    if let Some(db_path) = &cli.db_path {
        config = config.with_db_path(db_path.clone());
    }
    Ok(config)
}

/// Interactive play loop.
#[instrument(skip(config), fields(storage = %config.storage()))]
async fn run_play(config: AppConfig) -> Result<()> {
    let store = config.open_store()?;
    let mut host = SessionHost::new(store);
    info!("Starting play loop");

    // Give the initial history load a chance to land before the first draw.
    host.settle().await;
    println!("{}\n{}", render(&host.snapshot()), HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_line(&line) else {
            println!("Unrecognised input. {}", HELP);
            continue;
        };
        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Show => println!("{}", render(&host.snapshot())),
            ConsoleCommand::Intent(intent) => match host.handle(intent) {
                Ok(SessionEvent::Ignored) => println!("Nothing to do for '{}' right now.", intent),
                Ok(_) => println!("{}", render(&host.snapshot())),
                Err(e) => println!("{}", e),
            },
        }
    }

    host.shutdown().await;
    info!("Play loop finished");
    Ok(())
}

/// Prints the stored history.
#[instrument(skip(config), fields(storage = %config.storage()))]
async fn run_history(config: AppConfig) -> Result<()> {
    let store = config.open_store()?;
    let blob = match store.get(HISTORY_KEY).await {
        Ok(blob) => blob,
        Err(e) => {
            warn!(error = %e, "Could not read history");
            None
        }
    };
    let history = ResultHistory::load(blob.as_deref());
    println!("Previous Game Results");
    for entry in history.to_strings() {
        println!("  {}", if entry.is_empty() { "-" } else { entry.as_str() });
    }
    Ok(())
}
