//! Embedding of the "42" glyph
//!
//! The glyph is stamped onto a fresh grid before carving. Pattern cells are
//! walled in on all four sides and the carver treats them as visited, so the
//! spanning tree covers every other cell.

use std::fmt;

use log::{debug, warn};
use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};

use crate::grid::{Coord, Direction, Grid};

/// Fixed bitmap, `#` marks a foreground cell
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Pattern {
    rows: &'static [&'static str],
}

impl Pattern {
    pub const FORTY_TWO: Pattern = Pattern {
        rows: &[
            "#...###", //
            "#.....#",
            "###.###",
            "..#.#..",
            "..#.###",
        ],
    };

    pub const fn new(rows: &'static [&'static str]) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Offsets of the foreground cells, row-major
    pub fn foreground(&self) -> impl Iterator<Item = Coord> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.chars()
                .enumerate()
                .filter(|(_, c)| *c == '#')
                .map(move |(x, _)| Coord::new(x, y))
        })
    }
}

/// Why the pattern was left out of the maze
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SkipReason {
    /// Grid smaller than the glyph plus a one-cell margin
    TooSmall,
    /// Glyph would cover the entry or the exit
    CoversEndpoint,
    /// Glyph would cut the remaining cells apart
    Disconnects,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooSmall => write!(f, "grid is too small for the pattern"),
            SkipReason::CoversEndpoint => write!(f, "pattern would cover the entry or the exit"),
            SkipReason::Disconnects => write!(f, "pattern would disconnect the maze"),
        }
    }
}

/// Outcome of [place]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PatternPlacement {
    /// Glyph stamped with its top-left corner at `origin`
    Placed { origin: Coord },
    /// Not an error: generation goes on without the glyph
    Skipped(SkipReason),
    /// Placement was not requested
    Disabled,
}

impl PatternPlacement {
    pub fn is_placed(&self) -> bool {
        matches!(self, PatternPlacement::Placed { .. })
    }
}

/// Stamp `pattern` in the middle of `grid`.
///
/// The grid is left untouched when the pattern is skipped.
pub fn place(grid: &mut Grid, pattern: &Pattern) -> PatternPlacement {
    match try_place(grid, pattern) {
        Ok(origin) => {
            debug!("Pattern placed at {origin}");
            PatternPlacement::Placed { origin }
        }
        Err(reason) => {
            warn!("Pattern skipped: {reason}");
            PatternPlacement::Skipped(reason)
        }
    }
}

fn try_place(grid: &mut Grid, pattern: &Pattern) -> Result<Coord, SkipReason> {
    if pattern.width() == 0
        || grid.width() < pattern.width() + 2
        || grid.height() < pattern.height() + 2
    {
        return Err(SkipReason::TooSmall);
    }

    let origin = Coord::new(
        (grid.width() - pattern.width()) / 2,
        (grid.height() - pattern.height()) / 2,
    );
    let cells: Vec<Coord> = pattern
        .foreground()
        .map(|c| Coord::new(origin.x + c.x, origin.y + c.y))
        .collect();

    if cells.iter().any(|&c| c == grid.entry() || c == grid.exit()) {
        return Err(SkipReason::CoversEndpoint);
    }
    if !stays_connected(grid, &cells) {
        return Err(SkipReason::Disconnects);
    }

    for c in cells {
        grid.mark_pattern(c).map_err(|_| SkipReason::TooSmall)?;
    }
    Ok(origin)
}

/// Whether the cells outside of the pattern still form one region,
/// counting every in-grid neighbour pair as a potential passage
fn stays_connected(grid: &Grid, pattern_cells: &[Coord]) -> bool {
    let blocked = |c: Coord| {
        pattern_cells.contains(&c) || grid.is_pattern(c).unwrap_or(true)
    };

    let mut graph = Graph::<Coord, (), Undirected>::new_undirected();
    let nodes: Vec<Option<NodeIndex>> = grid
        .coords()
        .map(|c| (!blocked(c)).then(|| graph.add_node(c)))
        .collect();
    let node_at = |c: Coord| grid.index(c).ok().and_then(|i| nodes[i]);

    for c in grid.coords() {
        let Some(a) = node_at(c) else {
            continue;
        };
        for dir in [Direction::East, Direction::South] {
            if let Some(b) = grid.neighbor(c, dir).and_then(node_at) {
                graph.add_edge(a, b, ());
            }
        }
    }
    connected_components(&graph) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_two_shape() {
        let p = Pattern::FORTY_TWO;
        assert_eq!((p.width(), p.height()), (7, 5));
        assert_eq!(p.foreground().count(), 18);
        assert_eq!(p.foreground().next(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn placed_in_the_middle() {
        let mut grid = Grid::new(11, 9, Coord::new(0, 0), Coord::new(10, 8)).unwrap();
        let placement = place(&mut grid, &Pattern::FORTY_TWO);

        assert_eq!(
            placement,
            PatternPlacement::Placed {
                origin: Coord::new(2, 2)
            }
        );
        assert_eq!(grid.pattern_cell_count(), 18);
        assert_eq!(grid.cell(Coord::new(2, 2)).unwrap().value(), 0xF);
        assert!(!grid.is_pattern(Coord::new(3, 2)).unwrap());
        assert!(grid.has_wall(Coord::new(1, 2), Direction::East).unwrap());
    }

    #[test]
    fn skipped_on_small_grid() {
        let mut grid = Grid::new(8, 6, Coord::new(0, 0), Coord::new(7, 5)).unwrap();
        let before = grid.clone();

        let placement = place(&mut grid, &Pattern::FORTY_TWO);
        assert_eq!(placement, PatternPlacement::Skipped(SkipReason::TooSmall));
        assert_eq!(grid, before);
    }

    #[test]
    fn skipped_when_covering_endpoint() {
        // (2, 2) is the top-left cell of the glyph on an 11x9 grid
        let mut grid = Grid::new(11, 9, Coord::new(2, 2), Coord::new(10, 8)).unwrap();
        let placement = place(&mut grid, &Pattern::FORTY_TWO);
        assert_eq!(
            placement,
            PatternPlacement::Skipped(SkipReason::CoversEndpoint)
        );
        assert_eq!(grid.pattern_cell_count(), 0);
    }

    #[test]
    fn skipped_when_disconnecting() {
        const RING: Pattern = Pattern::new(&["###", "#.#", "###"]);
        let mut grid = Grid::new(5, 5, Coord::new(0, 0), Coord::new(4, 4)).unwrap();
        let placement = place(&mut grid, &RING);
        assert_eq!(placement, PatternPlacement::Skipped(SkipReason::Disconnects));
    }

    #[test]
    fn connectivity_ignores_walls() {
        let grid = Grid::new(3, 3, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        assert!(stays_connected(&grid, &[Coord::new(1, 1)]));
        assert!(!stays_connected(
            &grid,
            &[Coord::new(1, 0), Coord::new(1, 1), Coord::new(1, 2)]
        ));
    }
}
