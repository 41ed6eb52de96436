//! Generate thin-wall mazes, embed the "42" pattern and find the way out
//!
//! # Examples
//! ## Perfect maze
//! ```
//! use amazeing::{Coord, MazeParams};
//!
//! let mut params = MazeParams::new(20, 15, Coord::new(0, 0), Coord::new(19, 14));
//! params.seed = Some(42);
//!
//! let maze = amazeing::generate(&params).unwrap();
//! assert!(maze.pattern.is_placed());
//! // Spanning tree over every cell outside of the pattern
//! let cells = 20 * 15 - maze.grid.pattern_cell_count();
//! assert_eq!(maze.grid.open_edge_count(), cells - 1);
//!
//! let path = amazeing::find_shortest_path(&maze.grid, &params).unwrap();
//! assert_eq!(path.cells().first(), Some(&params.entry));
//! assert_eq!(path.cells().last(), Some(&params.exit));
//!
//! let dump = amazeing::serialize(&maze.grid, &path);
//! let parsed = amazeing::output::parse(&dump).unwrap();
//! assert_eq!(parsed.grid, maze.grid);
//! ```
//!
//! ## Configuration file
//! ```
//! use amazeing::MazeConfig;
//!
//! let config = "
//! WIDTH=10
//! HEIGHT=10
//! ENTRY=1,1
//! EXIT=10,10
//! OUTPUT_FILE=maze.txt
//! PERFECT=False
//! SEED=7";
//! let params = MazeConfig::parse_str(config).unwrap().validate().unwrap();
//! let maze = amazeing::generate(&params).unwrap();
//! let path = amazeing::find_shortest_path(&maze.grid, &params).unwrap();
//! println!("{}", amazeing::render::render(&maze.grid, Some(&path)));
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod imperfect;
pub mod maze_generator;
pub mod output;
pub mod path;
pub mod pattern;
pub mod render;

use env_logger::Env;
use rand::Rng;

pub use config::{MazeConfig, MazeParams};
pub use error::{MazeError, Result};
pub use grid::{Cell, Coord, Direction, Grid};
pub use maze_generator::{Maze, MazeGenerator};
pub use path::Path;
pub use pattern::{PatternPlacement, SkipReason};

/// Generate a maze, seeded from `params.seed`
///
/// The dead ends are already relaxed when `params.perfect` is false.
pub fn generate(params: &MazeParams) -> Result<Maze> {
    MazeGenerator::new(params.seed).generate(params)
}

/// Open dead ends of `grid` with the probability set in `params`
///
/// Returns the number of removed walls.
pub fn relax<R: Rng + ?Sized>(grid: &mut Grid, params: &MazeParams, rng: &mut R) -> Result<usize> {
    imperfect::remove_dead_ends(grid, params.dead_end_probability, rng)
}

/// Shortest path from `params.entry` to `params.exit`
pub fn find_shortest_path(grid: &Grid, params: &MazeParams) -> Result<Path> {
    path::shortest_path(grid, params.entry, params.exit)
}

/// Output file contents for `grid` and `path`
pub fn serialize(grid: &Grid, path: &Path) -> String {
    output::serialize(grid, path)
}

/// Log to stderr, `RUST_LOG` takes precedence over `verbose`
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
