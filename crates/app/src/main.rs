use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Parser, Subcommand};
use greeting_core::{AppConfig, Session, TimedEvent};
use tracing_subscriber::EnvFilter;

fn main() -> greeting_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            config,
            settle_ms,
        } => run_replay(&script, config.as_deref(), settle_ms),
        Commands::Defaults => print_defaults(),
    }
}

fn run_replay(
    script: &Path,
    config: Option<&Path>,
    settle_ms: Option<u64>,
) -> greeting_core::Result<()> {
    let config = match config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    tracing::info!(?script, autoplay = ?config.playback.autoplay, "replaying session");

    let steps: Vec<TimedEvent> = serde_json::from_str(&std::fs::read_to_string(script)?)?;
    let mut session = Session::simulated(config)?;
    let mut snapshots = session.replay(&steps)?;

    if let Some(settle_ms) = settle_ms {
        session.advance_to(Duration::from_millis(settle_ms));
        snapshots.push(session.snapshot());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for snapshot in &snapshots {
        serde_json::to_writer(&mut out, snapshot)?;
        writeln!(out)?;
    }

    tracing::info!(steps = steps.len(), "replay finished");
    Ok(())
}

fn print_defaults() -> greeting_core::Result<()> {
    let json = serde_json::to_string_pretty(&AppConfig::default())?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Replays greeting site sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed a scripted session through the core and print one snapshot per step.
    Replay {
        /// JSON array of `{ "at_ms": .., "event": .. }` steps.
        script: PathBuf,
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Advance to this time after the last step and print a final snapshot.
        #[arg(long)]
        settle_ms: Option<u64>,
    },
    /// Print the built-in configuration.
    Defaults,
}
