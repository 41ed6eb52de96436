//! CLI for maze solving

use std::{
    io::{self, Read},
    path::PathBuf,
};

use amazeing::{output, path::shortest_path, render};
use anyhow::Context;
use clap::Parser;
use log::warn;

/// Read a generated maze back and find the shortest way out
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display solution on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 300)]
    frame_length: u64,

    /// Debug logging, unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// File, where to read the maze. Use `-` for stdin.
    file: PathBuf,
}

/// Read maze from file, print output
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    amazeing::init_logging(args.verbose);

    let parsed = if args.file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        output::parse(&buf).context("Malformed maze on stdin")?
    } else {
        output::read_from_file(&args.file)?
    };

    let grid = &parsed.grid;
    let path = shortest_path(grid, grid.entry(), grid.exit())?;
    if let Some(stored) = &parsed.path {
        if stored.len_edges() != path.len_edges() {
            warn!(
                "Stored path has {} steps, the shortest one has {}",
                stored.len_edges(),
                path.len_edges()
            );
        }
    }

    if args.playback {
        render::playback(grid, &path, args.frame_length);
    }
    println!("The shortest path is {} steps.", path.len_edges());
    println!("{}", path.direction_string());
    Ok(())
}
