//! Shortest path from entry to exit

use std::collections::VecDeque;

use itertools::Itertools;
use log::debug;

use crate::error::{MazeError, Result};
use crate::grid::{Coord, Direction, Grid};

/// Cells visited on the way, including start and end
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Path {
    cells: Vec<Coord>,
}

impl Path {
    pub fn new(cells: Vec<Coord>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of steps, i.e. one less than the number of cells
    pub fn len_edges(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    /// Direction of every step
    pub fn directions(&self) -> Vec<Direction> {
        self.cells
            .iter()
            .tuple_windows()
            .filter_map(|(a, b)| {
                Direction::ALL.into_iter().find(|dir| match dir {
                    Direction::North => a.x == b.x && a.y == b.y + 1,
                    Direction::East => a.y == b.y && a.x + 1 == b.x,
                    Direction::South => a.x == b.x && a.y + 1 == b.y,
                    Direction::West => a.y == b.y && a.x == b.x + 1,
                })
            })
            .collect()
    }

    /// Steps as a string of `N`, `E`, `S` and `W` letters
    pub fn direction_string(&self) -> String {
        self.directions().iter().map(|d| d.letter()).collect()
    }

    /// Walk `directions` from `start`.
    ///
    /// Returns `None` when a step runs into a wall or leaves the grid.
    pub fn follow(grid: &Grid, start: Coord, directions: &[Direction]) -> Option<Self> {
        let mut cells = vec![start];
        let mut current = start;
        for &dir in directions {
            if grid.has_wall(current, dir).ok()? {
                return None;
            }
            current = grid.neighbor(current, dir)?;
            cells.push(current);
        }
        Some(Self { cells })
    }

    /// Whether every consecutive pair is adjacent with no wall in between
    pub fn is_open_on(&self, grid: &Grid) -> bool {
        self.directions().len() == self.len_edges()
            && self
                .cells
                .iter()
                .tuple_windows()
                .all(|(&a, &b)| grid.wall_between(a, b) == Ok(false))
    }
}

/// Breadth-first search from `from` to `to`.
///
/// Neighbours are expanded North, East, South, West, so among several
/// shortest paths the same one is always returned. Pattern cells are walled
/// in and therefore never entered.
pub fn shortest_path(grid: &Grid, from: Coord, to: Coord) -> Result<Path> {
    let start = grid.index(from)?;
    let goal = grid.index(to)?;

    let mut prev: Vec<Option<Coord>> = vec![None; grid.width() * grid.height()];
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::from([from]);
    visited[start] = true;

    while let Some(current) = queue.pop_front() {
        if current == to {
            break;
        }
        for (dir, n) in grid.neighbors(current) {
            let idx = grid.index(n)?;
            if !visited[idx] && !grid.has_wall(current, dir)? {
                visited[idx] = true;
                prev[idx] = Some(current);
                queue.push_back(n);
            }
        }
    }

    if !visited[goal] {
        return Err(MazeError::NoPathFound {
            entry: from,
            exit: to,
        });
    }

    let mut cells = vec![to];
    let mut current = to;
    while let Some(p) = prev[grid.index(current)?] {
        cells.push(p);
        current = p;
    }
    cells.reverse();

    let path = Path::new(cells);
    debug!("Shortest path from {from} to {to}: {} steps", path.len_edges());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: usize, height: usize) -> Grid {
        let mut grid =
            Grid::new(width, height, Coord::new(0, 0), Coord::new(width - 1, height - 1))
                .unwrap();
        for c in grid.coords().collect::<Vec<_>>() {
            for (_, n) in grid.neighbors(c) {
                grid.clear_wall(c, n).unwrap();
            }
        }
        grid
    }

    #[test]
    fn manhattan_distance_on_open_grid() {
        let grid = open_grid(3, 3);
        let path = shortest_path(&grid, Coord::new(0, 0), Coord::new(2, 2)).unwrap();

        assert_eq!(path.len_edges(), 4);
        assert_eq!(path.cells().len(), 5);
        // East is expanded before South
        assert_eq!(path.direction_string(), "EESS");
        assert!(path.is_open_on(&grid));
    }

    #[test]
    fn ties_follow_expansion_order() {
        let grid = open_grid(3, 3);
        let path = shortest_path(&grid, Coord::new(2, 2), Coord::new(0, 0)).unwrap();
        assert_eq!(path.direction_string(), "NNWW");
    }

    #[test]
    fn follows_corridor_around_walls() {
        // Walls east of (1, 0) and south of (0, 0)
        let mut grid = open_grid(3, 2);
        grid.set_wall(Coord::new(1, 0), Coord::new(2, 0), true).unwrap();
        grid.set_wall(Coord::new(0, 0), Coord::new(0, 1), true).unwrap();

        let path = shortest_path(&grid, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        assert_eq!(path.direction_string(), "ESEN");
        assert!(path.is_open_on(&grid));
    }

    #[test]
    fn disconnected_grid_has_no_path() {
        let grid = Grid::new(2, 2, Coord::new(0, 0), Coord::new(1, 1)).unwrap();
        assert_eq!(
            shortest_path(&grid, grid.entry(), grid.exit()),
            Err(MazeError::NoPathFound {
                entry: Coord::new(0, 0),
                exit: Coord::new(1, 1)
            })
        );
    }

    #[test]
    fn out_of_bounds_endpoint() {
        let grid = open_grid(2, 2);
        assert!(matches!(
            shortest_path(&grid, Coord::new(0, 0), Coord::new(2, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn follow_directions() {
        let grid = open_grid(3, 3);
        let path = Path::follow(
            &grid,
            Coord::new(0, 0),
            &[Direction::East, Direction::South, Direction::West],
        )
        .unwrap();
        assert_eq!(path.cells().last(), Some(&Coord::new(0, 1)));
        assert_eq!(path.len_edges(), 3);

        let mut walled = grid.clone();
        walled
            .set_wall(Coord::new(0, 0), Coord::new(1, 0), true)
            .unwrap();
        assert!(Path::follow(&walled, Coord::new(0, 0), &[Direction::East]).is_none());
        // Door on the North side of the entry, but no cell behind it
        assert!(Path::follow(&grid, Coord::new(0, 0), &[Direction::North]).is_none());
    }
}
