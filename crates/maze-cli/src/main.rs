//! Maze CLI - Command line driver for the maze solvers
//!
//! Loads a maze, builds one solver per run and drives it tick by tick,
//! printing each snapshot as a JSON line on stdout. Logs go to stderr.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{config as config_cmd, render, train};

#[derive(Parser)]
#[command(name = "maze")]
#[command(author, version, about = "Maze - grid world solvers driven tick by tick", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a solver and stream snapshots as JSON lines
    #[command(alias = "run")]
    Train(train::TrainArgs),

    /// Print the plain render of a maze
    Render(render::RenderArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity; "maze" covers every maze_* target
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("maze={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Train(args) => train::run(args).await,
        Commands::Render(args) => render::run(args).await,
        Commands::Config(cmd) => config_cmd::run(cmd).await,
    }
}
