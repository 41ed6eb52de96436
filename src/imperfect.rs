//! Turn a perfect maze into an imperfect one by opening dead ends

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::grid::{Coord, Grid};

/// Open one extra wall at a random subset of the dead ends.
///
/// Cells are visited row-major, each one judged on the grid as it stands at
/// that point. A dead end is opened with chance `probability` percent; the
/// wall to remove is picked among its walled in-grid neighbours that are
/// not part of the pattern. Removing walls only adds passages, so the grid
/// stays connected.
///
/// Returns the number of walls removed.
pub fn remove_dead_ends<R: Rng + ?Sized>(
    grid: &mut Grid,
    probability: u8,
    rng: &mut R,
) -> Result<usize> {
    if probability == 0 {
        return Ok(0);
    }

    let mut removed = 0;
    let coords: Vec<Coord> = grid.coords().collect();
    for c in coords {
        if grid.is_pattern(c)? || !grid.is_dead_end(c)? {
            continue;
        }
        if probability < 100 && rng.gen_range(0..100) >= probability {
            continue;
        }

        let mut walled = Vec::with_capacity(3);
        for (_, n) in grid.neighbors(c) {
            if !grid.is_pattern(n)? && grid.wall_between(c, n)? {
                walled.push(n);
            }
        }
        if let Some(&n) = walled.choose(rng) {
            grid.clear_wall(c, n)?;
            removed += 1;
        }
    }

    debug!("Removed {removed} dead-end walls");
    Ok(removed)
}
