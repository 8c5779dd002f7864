//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::MazeConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Config file to read instead of the default search path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub async fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { config } => show(config).await,
    }
}

async fn show(path: Option<PathBuf>) -> Result<()> {
    let config = MazeConfig::load(path.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}
