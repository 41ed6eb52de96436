//! Output file format
//!
//! ```text
//! D53
//! D56
//!
//! 0,0
//! 2,1
//! EES
//! ```
//!
//! One uppercase hex digit per cell holds its four walls (North `1`, East
//! `2`, South `4`, West `8`). The outer border is always written closed and
//! pattern cells read `F`. After an empty line come the 0-based entry and
//! exit coordinates and the path as a string of direction letters.

use std::fs;
use std::path::Path as FilePath;

use anyhow::Context;
use itertools::Itertools;

use crate::error::{MazeError, Result};
use crate::grid::{Cell, Coord, Direction, Grid};
use crate::path::Path;

/// Grid and path read back from an output file
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ParsedMaze {
    pub grid: Grid,
    /// `None` when the file carries no path
    pub path: Option<Path>,
}

/// Four-wall mask of a cell as written to the output file
pub fn wall_mask(grid: &Grid, c: Coord) -> u8 {
    Direction::ALL
        .into_iter()
        .filter(|&dir| grid.neighbor(c, dir).is_none() || grid.has_wall(c, dir).unwrap_or(true))
        .map(Direction::bit)
        .sum()
}

/// Render the grid and the path in the output file format
pub fn serialize(grid: &Grid, path: &Path) -> String {
    let rows = (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| format!("{:X}", wall_mask(grid, Coord::new(x, y))))
                .join("")
        })
        .join("\n");
    let (entry, exit) = (grid.entry(), grid.exit());
    format!(
        "{rows}\n\n{},{}\n{},{}\n{}\n",
        entry.x,
        entry.y,
        exit.x,
        exit.y,
        path.direction_string()
    )
}

pub fn write_to_file(file: &FilePath, grid: &Grid, path: &Path) -> anyhow::Result<()> {
    fs::write(file, serialize(grid, path))
        .with_context(|| format!("Cannot write maze to {}", file.display()))
}

pub fn read_from_file(file: &FilePath) -> anyhow::Result<ParsedMaze> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Cannot read maze from {}", file.display()))?;
    parse(&text).with_context(|| format!("Malformed maze file {}", file.display()))
}

/// Read an output file back.
///
/// Neighbouring cells must agree on the wall they share. Border bits are
/// not checked.
pub fn parse(text: &str) -> Result<ParsedMaze> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let height = lines
        .iter()
        .position(|line| line.is_empty())
        .unwrap_or(lines.len());
    if height == 0 {
        return Err(MazeError::parse(1, "grid is empty"));
    }

    let width = lines[0].chars().count();
    let mut masks = Vec::with_capacity(width * height);
    for (y, row) in lines[..height].iter().enumerate() {
        if row.chars().count() != width {
            return Err(MazeError::parse(
                y + 1,
                format!("expected {width} cells, got {}", row.chars().count()),
            ));
        }
        for c in row.chars() {
            let mask = c
                .to_digit(16)
                .ok_or_else(|| MazeError::parse(y + 1, format!("`{c}` is not a hex digit")))?;
            masks.push(mask as u8);
        }
    }
    check_shared_walls(&masks, width, height)?;

    let entry = parse_coord(&lines, height + 1)?;
    let exit = parse_coord(&lines, height + 2)?;
    let cells = masks
        .iter()
        .map(|&mask| {
            if mask == 0xF {
                Cell::from_value(Cell::PATTERN)
            } else {
                Cell::from_value(mask & (Cell::NORTH_WALL | Cell::EAST_WALL))
            }
        })
        .collect();
    let grid = Grid::from_cells(width, height, cells, entry, exit)
        .map_err(|e| MazeError::parse(height + 2, e.to_string()))?;

    let path_line = height + 4;
    let steps = lines.get(path_line - 1).copied().unwrap_or_default();
    let path = if steps.is_empty() {
        None
    } else {
        let directions = steps
            .chars()
            .map(|c| {
                Direction::from_letter(c).ok_or_else(|| {
                    MazeError::parse(path_line, format!("`{c}` is not a direction"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let path = Path::follow(&grid, entry, &directions).ok_or_else(|| {
            MazeError::parse(path_line, "path runs into a wall or leaves the grid")
        })?;
        if path.cells().last() != Some(&exit) {
            return Err(MazeError::parse(path_line, "path does not end at the exit"));
        }
        Some(path)
    };

    Ok(ParsedMaze { grid, path })
}

fn check_shared_walls(masks: &[u8], width: usize, height: usize) -> Result<()> {
    let wall = |x: usize, y: usize, dir: Direction| masks[y * width + x] & dir.bit() != 0;
    for y in 0..height {
        for x in 0..width {
            if x + 1 < width && wall(x, y, Direction::East) != wall(x + 1, y, Direction::West) {
                return Err(MazeError::parse(
                    y + 1,
                    format!("cells {x} and {} disagree on their shared wall", x + 1),
                ));
            }
            if y + 1 < height && wall(x, y, Direction::South) != wall(x, y + 1, Direction::North)
            {
                return Err(MazeError::parse(
                    y + 1,
                    format!("cell {x} disagrees with the cell below on their shared wall"),
                ));
            }
        }
    }
    Ok(())
}

/// `x,y` pair at `lines[index]`
fn parse_coord(lines: &[&str], index: usize) -> Result<Coord> {
    let raw = lines
        .get(index)
        .ok_or_else(|| MazeError::parse(index + 1, "missing coordinates"))?;
    let malformed = || MazeError::parse(index + 1, format!("expected `x,y`, got `{raw}`"));
    let (x, y) = raw.split_once(',').ok_or_else(malformed)?;
    Ok(Coord::new(
        x.trim().parse().map_err(|_| malformed())?,
        y.trim().parse().map_err(|_| malformed())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::shortest_path;

    /// 3x2 maze, entry top-left, exit bottom-right:
    ///
    /// ```text
    /// +--+--+--+
    /// |E       |
    /// +--+--+  +
    /// |       X|
    /// +--+--+--+
    /// ```
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
    fn serialize_small_grid() {
        let grid = small_grid();
        let path = shortest_path(&grid, grid.entry(), grid.exit()).unwrap();
        assert_eq!(serialize(&grid, &path), "D53\nD56\n\n0,0\n2,1\nEES\n");
    }

    #[test]
    fn parse_small_grid() {
        let parsed = parse("D53\nD56\n\n0,0\n2,1\nEES\n").unwrap();
        assert_eq!(parsed.grid, small_grid());
        assert_eq!(
            parsed.path.unwrap().cells(),
            &[
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(2, 1)
            ]
        );
    }

    #[test]
    fn pattern_cells_read_as_f() {
        let mut grid = Grid::new(3, 2, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        grid.mark_pattern(Coord::new(1, 0)).unwrap();
        grid.clear_wall(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        grid.clear_wall(Coord::new(0, 1), Coord::new(1, 1)).unwrap();
        grid.clear_wall(Coord::new(1, 1), Coord::new(2, 1)).unwrap();
        grid.clear_wall(Coord::new(2, 1), Coord::new(2, 0)).unwrap();
        let path = shortest_path(&grid, grid.entry(), grid.exit()).unwrap();

        let text = serialize(&grid, &path);
        assert_eq!(text, "BFB\nC56\n\n0,0\n2,0\nSEEN\n");

        let parsed = parse(&text).unwrap();
        assert!(parsed.grid.is_pattern(Coord::new(1, 0)).unwrap());
        assert_eq!(parsed.grid, grid);
        assert_eq!(parsed.path, Some(path));
    }

    #[test]
    fn path_line_is_optional() {
        let parsed = parse("D53\nD56\n\n0,0\n2,1\n").unwrap();
        assert_eq!(parsed.grid, small_grid());
        assert_eq!(parsed.path, None);
    }

    #[test]
    fn rejects_inconsistent_walls() {
        // East wall of the first cell without the matching West wall
        let err = parse("F53\nD56\n\n0,0\n2,1\n").unwrap_err();
        assert_eq!(
            err,
            MazeError::Parse {
                line: 1,
                message: "cells 0 and 1 disagree on their shared wall".to_string()
            }
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("D5\nD56\n\n0,0\n2,1\n").is_err());
        assert!(parse("D5G\nD56\n\n0,0\n2,1\n").is_err());
        assert!(parse("D53\nD56\n\n0;0\n2,1\n").is_err());
        assert!(parse("D53\nD56\n\n0,0\n").is_err());
        assert!(parse("D53\nD56\n\n0,0\n5,1\n").is_err());
        // Path through the wall below the entry
        assert!(parse("D53\nD56\n\n0,0\n2,1\nSEE\n").is_err());
        // Path stopping short of the exit
        assert!(parse("D53\nD56\n\n0,0\n2,1\nEE\n").is_err());
        assert!(parse("D53\nD56\n\n0,0\n2,1\nEEX\n").is_err());
    }
}
