//! CLI for maze generation

use std::path::PathBuf;

use amazeing::{output, render, MazeConfig};
use anyhow::Context;
use clap::Parser;
use log::info;

/// Generate a maze from a configuration file and write it out with its solution
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file with KEY=VALUE lines
    config: PathBuf,

    /// Draw the maze and its solution on the terminal
    #[arg(short, long)]
    show: bool,

    /// Play the solution back on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Animate the carving of the maze
    #[arg(short, long)]
    animate: bool,

    /// Frame length of playback and animation in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,

    /// Random seed, overrides SEED of the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// ENTRY and EXIT of the configuration are 0-based
    #[arg(long)]
    zero_based: bool,

    /// Write the maze here instead of OUTPUT_FILE
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging, unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

/// Read configuration, generate and solve the maze, write output
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    amazeing::init_logging(args.verbose);

    let mut config = MazeConfig::from_file(&args.config)?.zero_based(args.zero_based);
    if let Some(seed) = args.seed {
        config.set("SEED", seed.to_string());
    }
    let params = config.validate().context("Invalid configuration")?;

    let maze = if args.animate {
        render::animate_generation(&params, args.frame_length)?
    } else {
        amazeing::generate(&params)?
    };
    let path = amazeing::find_shortest_path(&maze.grid, &params)?;

    let file = args
        .output
        .or_else(|| params.output_file.clone())
        .context("No output file given")?;
    output::write_to_file(&file, &maze.grid, &path)?;
    info!("Maze written to {}", file.display());

    if args.playback {
        render::playback(&maze.grid, &path, args.frame_length);
    } else if args.show || args.animate {
        println!("{}", render::render(&maze.grid, Some(&path)));
    }
    println!("The shortest path is {} steps.", path.len_edges());
    Ok(())
}
