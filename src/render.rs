//! Terminal drawing of the maze

use std::thread;
use std::time::Duration;

use itertools::Itertools;

use crate::config::MazeParams;
use crate::error::Result;
use crate::grid::{Coord, Direction, Grid};
use crate::maze_generator::{Maze, MazeGenerator};
use crate::path::Path;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Draw walls, entry (`E`), exit (`X`), pattern (`###`) and path (`.`)
pub fn render(grid: &Grid, path: Option<&Path>) -> String {
    let mut lines = Vec::with_capacity(2 * grid.height() + 1);
    for y in 0..grid.height() {
        lines.push(horizontal_walls(grid, y, Direction::North));

        let last = Coord::new(grid.width() - 1, y);
        let body = (0..grid.width())
            .map(|x| {
                let c = Coord::new(x, y);
                let west = if wall(grid, c, Direction::West) { '|' } else { ' ' };
                format!("{west}{}", content(grid, c, path))
            })
            .join("");
        let east = if wall(grid, last, Direction::East) { '|' } else { ' ' };
        lines.push(format!("{body}{east}"));
    }
    lines.push(horizontal_walls(grid, grid.height() - 1, Direction::South));
    lines.join("\n")
}

fn horizontal_walls(grid: &Grid, y: usize, side: Direction) -> String {
    let walls = (0..grid.width())
        .map(|x| {
            if wall(grid, Coord::new(x, y), side) {
                "+---"
            } else {
                "+   "
            }
        })
        .join("");
    format!("{walls}+")
}

fn wall(grid: &Grid, c: Coord, dir: Direction) -> bool {
    grid.has_wall(c, dir).unwrap_or(true)
}

fn content(grid: &Grid, c: Coord, path: Option<&Path>) -> &'static str {
    let Ok(cell) = grid.cell(c) else {
        return "   ";
    };
    if cell.is_pattern() {
        "###"
    } else if cell.is_entry() {
        " E "
    } else if cell.is_exit() {
        " X "
    } else if path.is_some_and(|p| p.contains(c)) {
        " . "
    } else {
        "   "
    }
}

fn print_frame(frame: &str) {
    print!("{CLEAR_SCREEN}");
    println!("{frame}");
}

/// Show the path growing one step per frame
///
/// ## Arguments
/// - `grid`: Solved maze.
/// - `path`: Path to play back.
/// - `step_ms`: Time step for each frame, milliseconds.
pub fn playback(grid: &Grid, path: &Path, step_ms: u64) {
    for n in 1..=path.cells().len() {
        let partial = Path::new(path.cells()[..n].to_vec());
        print_frame(&render(grid, Some(&partial)));
        thread::sleep(Duration::from_millis(step_ms));
    }
}

/// Generate a maze, redrawing the grid after every carved passage
pub fn animate_generation(params: &MazeParams, step_ms: u64) -> Result<Maze> {
    MazeGenerator::new(params.seed).generate_with(params, |grid, _| {
        print_frame(&render(grid, None));
        thread::sleep(Duration::from_millis(step_ms));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::shortest_path;

    fn small_grid() -> Grid {
        let mut grid = Grid::new(3, 2, Coord::new(0, 0), Coord::new(2, 1)).unwrap();
        grid.clear_wall(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        grid.clear_wall(Coord::new(1, 0), Coord::new(2, 0)).unwrap();
        grid.clear_wall(Coord::new(2, 0), Coord::new(2, 1)).unwrap();
        grid.clear_wall(Coord::new(2, 1), Coord::new(1, 1)).unwrap();
        grid.clear_wall(Coord::new(1, 1), Coord::new(0, 1)).unwrap();
        grid
    }

    #[test]
    fn draws_walls_and_doors() {
        let expected = [
            "+   +---+---+",
            "| E         |",
            "+---+---+   +",
            "|         X  ",
            "+---+---+---+",
        ]
        .join("\n");
        assert_eq!(render(&small_grid(), None), expected);
    }

    #[test]
    fn draws_path() {
        let grid = small_grid();
        let path = shortest_path(&grid, grid.entry(), grid.exit()).unwrap();
        let drawing = render(&grid, Some(&path));
        assert_eq!(drawing.lines().nth(1), Some("| E   .   . |"));
    }

    #[test]
    fn draws_pattern() {
        let mut grid = Grid::new(3, 1, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        grid.mark_pattern(Coord::new(1, 0)).unwrap();
        assert_eq!(render(&grid, None).lines().nth(1), Some("| E |###| X |"));
    }
}
