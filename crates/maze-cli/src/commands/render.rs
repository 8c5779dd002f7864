//! Plain render of a maze file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use maze_core::MazeEnvironment;
use maze_rl::snapshot::hex_rows;

#[derive(Args)]
pub struct RenderArgs {
    /// Maze text file
    pub maze: PathBuf,

    /// Print the color rows as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: RenderArgs) -> Result<()> {
    let env = MazeEnvironment::from_file(&args.maze)
        .with_context(|| format!("Failed to load maze {}", args.maze.display()))?;
    let rows = hex_rows(&env.render_colors(None)?);

    if args.json {
        println!("{}", serde_json::to_string(&rows)?);
    } else {
        for row in &rows {
            println!("{}", row.join(" "));
        }
        println!();
        println!("start: {}  goal: {}", env.start(), env.goal());
    }

    Ok(())
}
