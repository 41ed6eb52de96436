//! Maze generation

use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::config::MazeParams;
use crate::error::Result;
use crate::grid::{Coord, Grid};
use crate::imperfect::remove_dead_ends;
use crate::pattern::{self, Pattern, PatternPlacement};

/// Generated maze, ready for solving and serialization
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Maze {
    pub grid: Grid,
    /// Whether the "42" pattern made it into the grid
    pub pattern: PatternPlacement,
    /// Walls removed to make the maze imperfect
    pub removed_dead_ends: usize,
}

/// Maze generator, owning the random source of one run
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a maze according to `params`
    ///
    /// Steps: allocate the grid, stamp the pattern, carve a spanning tree
    /// from the exit, and open dead ends unless the maze is perfect.
    pub fn generate(&mut self, params: &MazeParams) -> Result<Maze> {
        self.generate_with(params, |_, _| ())
    }

    /// Same as [Self::generate], calling `on_step` after every carved passage
    pub fn generate_with<F>(&mut self, params: &MazeParams, on_step: F) -> Result<Maze>
    where
        F: FnMut(&Grid, Coord),
    {
        params.validate()?;
        info!(
            "Generating {}x{} {} maze",
            params.width,
            params.height,
            if params.perfect { "perfect" } else { "imperfect" }
        );

        let mut grid = Grid::new(params.width, params.height, params.entry, params.exit)?;
        let pattern = if params.insert_pattern {
            pattern::place(&mut grid, &Pattern::FORTY_TWO)
        } else {
            PatternPlacement::Disabled
        };

        carve_with(&mut grid, params.exit, &mut self.random, on_step)?;

        let removed_dead_ends = if params.perfect {
            0
        } else {
            remove_dead_ends(&mut grid, params.dead_end_probability, &mut self.random)?
        };

        Ok(Maze {
            grid,
            pattern,
            removed_dead_ends,
        })
    }
}

/// Carve a perfect maze with a randomized depth-first backtracker.
///
/// Pattern cells count as visited and are never entered, so the result is a
/// spanning tree over all other cells reachable from `start`.
pub fn carve<R: Rng + ?Sized>(grid: &mut Grid, start: Coord, rng: &mut R) -> Result<()> {
    carve_with(grid, start, rng, |_, _| ())
}

/// [carve], calling `on_step` with the grid and the newly entered cell
pub fn carve_with<R, F>(grid: &mut Grid, start: Coord, rng: &mut R, mut on_step: F) -> Result<()>
where
    R: Rng + ?Sized,
    F: FnMut(&Grid, Coord),
{
    let mut visited: Vec<bool> = grid
        .coords()
        .map(|c| grid.is_pattern(c).unwrap_or(true))
        .collect();
    visited[grid.index(start)?] = true;

    let mut stack = vec![start];
    let mut carved = 0;
    while let Some(&current) = stack.last() {
        let mut unvisited = Vec::with_capacity(4);
        for (_, n) in grid.neighbors(current) {
            if !visited[grid.index(n)?] {
                unvisited.push(n);
            }
        }

        match unvisited.choose(rng) {
            Some(&next) => {
                grid.clear_wall(current, next)?;
                visited[grid.index(next)?] = true;
                stack.push(next);
                carved += 1;
                on_step(&*grid, next);
            }
            None => {
                stack.pop();
            }
        }
    }

    debug!("Carved {carved} passages from {start}");
    Ok(())
}
