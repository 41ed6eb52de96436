//! Thin-wall grid model
//!
//! Every cell stores only two walls, North and East. The South wall of a
//! cell is the North wall of the cell below it, and the West wall is the
//! East wall of the cell to its left, so a shared wall exists exactly once.
//!
//! The two upper bits of a cell hold a marker: entry (`0b01`), exit
//! (`0b10`) or pattern (`0b11`). A pattern cell therefore has the value
//! `0xF`.

use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};

use crate::error::{MazeError, Result};

/// Location in the maze, zero-based, (0, 0) is the top-left cell
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug, Default)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four edges of a cell
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed iteration order used by every algorithm in the crate
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Bit of the full four-wall mask used in the output dump
    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 8,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Bit-packed cell: two owned walls plus a two-bit marker
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Cell(u8);

impl Cell {
    pub const NORTH_WALL: u8 = 0b0001;
    pub const EAST_WALL: u8 = 0b0010;
    pub const ENTRY: u8 = 0b0100;
    pub const EXIT: u8 = 0b1000;
    pub const PATTERN: u8 = 0b1111;
    const MARKER: u8 = 0b1100;

    /// Cell with both owned walls up and no marker
    pub const fn closed() -> Self {
        Cell(Self::NORTH_WALL | Self::EAST_WALL)
    }

    pub const fn from_value(value: u8) -> Self {
        Cell(value & 0xF)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_entry(self) -> bool {
        self.0 & Self::MARKER == Self::ENTRY
    }

    pub fn is_exit(self) -> bool {
        self.0 & Self::MARKER == Self::EXIT
    }

    pub fn is_pattern(self) -> bool {
        self.0 & Self::MARKER == Self::MARKER
    }

    fn wall(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    fn with_wall(self, bit: u8, present: bool) -> Self {
        if present {
            Cell(self.0 | bit)
        } else {
            Cell(self.0 & !bit)
        }
    }

    fn with_marker(self, marker: u8) -> Self {
        Cell((self.0 & !Self::MARKER) | (marker & Self::MARKER))
    }
}

/// Undirected graph of the open passages, node weights are coordinates
pub type PassageGraph = Graph<Coord, (), Undirected>;

/// Maze grid of `width * height` cells, stored row-major
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    entry: Coord,
    exit: Coord,
}

impl Grid {
    /// Allocate a grid with every wall up and the entry/exit markers set.
    ///
    /// Fails with [MazeError::InvalidConfig] for empty dimensions or when
    /// entry equals exit, and with [MazeError::OutOfBounds] when an endpoint
    /// lies outside of the grid.
    pub fn new(width: usize, height: usize, entry: Coord, exit: Coord) -> Result<Self> {
        Self::from_cells(
            width,
            height,
            vec![Cell::closed(); Self::cell_count(width, height)?],
            entry,
            exit,
        )
    }

    /// `width * height`, rejecting products that do not fit in `usize`
    pub fn cell_count(width: usize, height: usize) -> Result<usize> {
        width.checked_mul(height).ok_or_else(|| {
            MazeError::invalid(format!("a {width}x{height} maze has too many cells"))
        })
    }

    /// Assemble a grid from raw cells, e.g. when reading a dump back
    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<Cell>,
        entry: Coord,
        exit: Coord,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::invalid(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = Self::cell_count(width, height)?;
        if cells.len() != expected {
            return Err(MazeError::invalid(format!(
                "expected {expected} cells, got {}",
                cells.len()
            )));
        }
        let mut grid = Self {
            width,
            height,
            cells,
            entry,
            exit,
        };
        grid.index(entry)?;
        grid.index(exit)?;
        if entry == exit {
            return Err(MazeError::invalid(format!(
                "entry and exit must differ, both are {entry}"
            )));
        }

        let entry_idx = grid.index(entry)?;
        let exit_idx = grid.index(exit)?;
        grid.cells[entry_idx] = grid.cells[entry_idx].with_marker(Cell::ENTRY);
        grid.cells[exit_idx] = grid.cells[exit_idx].with_marker(Cell::EXIT);
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entry(&self) -> Coord {
        self.entry
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x < self.width && c.y < self.height
    }

    /// Row-major index of `c`, or [MazeError::OutOfBounds]
    pub fn index(&self, c: Coord) -> Result<usize> {
        if self.in_bounds(c) {
            Ok(c.y * self.width + c.x)
        } else {
            Err(MazeError::OutOfBounds {
                x: c.x,
                y: c.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn cell(&self, c: Coord) -> Result<Cell> {
        Ok(self.cells[self.index(c)?])
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Neighbour of `c` in direction `dir`, if it lies inside the grid
    pub fn neighbor(&self, c: Coord, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        let x = c.x.checked_add_signed(dx)?;
        let y = c.y.checked_add_signed(dy)?;
        let n = Coord::new(x, y);
        self.in_bounds(n).then_some(n)
    }

    /// In-grid neighbours of `c`, always in North, East, South, West order
    pub fn neighbors(&self, c: Coord) -> Vec<(Direction, Coord)> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(c, dir).map(|n| (dir, n)))
            .collect()
    }

    /// Exterior opening of the entry or exit cell.
    ///
    /// The door is the first boundary side of the cell in North, East,
    /// South, West order. Cells that are not an endpoint, or endpoints
    /// away from the border, have no door.
    pub fn door(&self, c: Coord) -> Option<Direction> {
        if c != self.entry && c != self.exit {
            return None;
        }
        Direction::ALL
            .into_iter()
            .find(|&dir| self.neighbor(c, dir).is_none())
    }

    /// Whether there is a wall on side `dir` of cell `c`
    pub fn has_wall(&self, c: Coord, dir: Direction) -> Result<bool> {
        self.index(c)?;
        match self.neighbor(c, dir) {
            None => Ok(self.door(c) != Some(dir)),
            Some(n) => {
                let (owner, bit) = Self::edge_owner(c, dir, n);
                Ok(self.cells[self.index(owner)?].wall(bit))
            }
        }
    }

    /// Whether the edge shared by two 4-connected cells is walled
    pub fn wall_between(&self, a: Coord, b: Coord) -> Result<bool> {
        self.index(a)?;
        self.index(b)?;
        let dir = Self::direction_to(a, b).ok_or(MazeError::NotAdjacent { a, b })?;
        self.has_wall(a, dir)
    }

    /// Raise or remove the wall between two 4-connected cells
    pub fn set_wall(&mut self, a: Coord, b: Coord, present: bool) -> Result<()> {
        self.index(a)?;
        self.index(b)?;
        let dir = Self::direction_to(a, b).ok_or(MazeError::NotAdjacent { a, b })?;
        let (owner, bit) = Self::edge_owner(a, dir, b);
        let idx = self.index(owner)?;
        self.cells[idx] = self.cells[idx].with_wall(bit, present);
        Ok(())
    }

    pub fn clear_wall(&mut self, a: Coord, b: Coord) -> Result<()> {
        self.set_wall(a, b, false)
    }

    /// Number of open passages from `c` to its in-grid neighbours
    pub fn open_degree(&self, c: Coord) -> Result<usize> {
        let mut degree = 0;
        for (dir, _) in self.neighbors(c) {
            if !self.has_wall(c, dir)? {
                degree += 1;
            }
        }
        Ok(degree)
    }

    pub fn is_dead_end(&self, c: Coord) -> Result<bool> {
        Ok(self.open_degree(c)? == 1)
    }

    /// Number of open internal edges in the whole grid
    pub fn open_edge_count(&self) -> usize {
        self.coords()
            .map(|c| {
                let cell = self.cells[c.y * self.width + c.x];
                let north = c.y > 0 && !cell.wall(Cell::NORTH_WALL);
                let east = c.x + 1 < self.width && !cell.wall(Cell::EAST_WALL);
                usize::from(north) + usize::from(east)
            })
            .sum()
    }

    pub fn is_pattern(&self, c: Coord) -> Result<bool> {
        Ok(self.cell(c)?.is_pattern())
    }

    pub fn pattern_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_pattern()).count()
    }

    /// Turn `c` into a pattern cell (`0xF`) and wall it in on all four sides
    pub(crate) fn mark_pattern(&mut self, c: Coord) -> Result<()> {
        let idx = self.index(c)?;
        self.cells[idx] = Cell::from_value(Cell::PATTERN);
        for dir in [Direction::South, Direction::West] {
            if let Some(n) = self.neighbor(c, dir) {
                self.set_wall(c, n, true)?;
            }
        }
        Ok(())
    }

    /// Passage graph over the non-pattern cells.
    ///
    /// Only positive deltas (East, South) are visited, because the graph is
    /// undirected.
    pub fn passage_graph(&self) -> PassageGraph {
        let mut graph = Graph::new_undirected();
        let nodes: Vec<Option<NodeIndex>> = self
            .coords()
            .map(|c| {
                let cell = self.cells[c.y * self.width + c.x];
                (!cell.is_pattern()).then(|| graph.add_node(c))
            })
            .collect();

        for c in self.coords() {
            let Some(node_a) = nodes[c.y * self.width + c.x] else {
                continue;
            };
            for dir in [Direction::East, Direction::South] {
                let Some(n) = self.neighbor(c, dir) else {
                    continue;
                };
                if let Some(node_b) = nodes[n.y * self.width + n.x] {
                    if !self.has_wall(c, dir).unwrap_or(true) {
                        graph.add_edge(node_a, node_b, ());
                    }
                }
            }
        }
        graph
    }

    fn edge_owner(c: Coord, dir: Direction, n: Coord) -> (Coord, u8) {
        match dir {
            Direction::North => (c, Cell::NORTH_WALL),
            Direction::East => (c, Cell::EAST_WALL),
            Direction::South => (n, Cell::NORTH_WALL),
            Direction::West => (n, Cell::EAST_WALL),
        }
    }

    fn direction_to(a: Coord, b: Coord) -> Option<Direction> {
        match (b.x as isize - a.x as isize, b.y as isize - a.y as isize) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}
