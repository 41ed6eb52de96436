//! Maze parameters and the `KEY=VALUE` configuration file
//!
//! ```text
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=1,1
//! EXIT=20,15
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! SEED=42
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use log::{debug, warn};

use crate::error::{MazeError, Result};
use crate::grid::{Coord, Grid};

/// Validated parameters of one generation run
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MazeParams {
    pub width: usize,
    pub height: usize,
    /// Entry cell, 0-based
    pub entry: Coord,
    /// Exit cell, 0-based
    pub exit: Coord,
    /// Keep the spanning tree as is; otherwise remove dead ends
    pub perfect: bool,
    /// Fixed random seed, or entropy when `None`
    pub seed: Option<u64>,
    /// Stamp the "42" pattern into the maze
    pub insert_pattern: bool,
    /// Chance (0-100) that a dead end gets opened in an imperfect maze
    pub dead_end_probability: u8,
    pub output_file: Option<PathBuf>,
    /// Pixel size of a cell, only used by graphical renderers
    pub cell_size: u32,
}

impl MazeParams {
    pub const DEFAULT_DEAD_END_PROBABILITY: u8 = 99;
    pub const DEFAULT_CELL_SIZE: u32 = 25;
    /// Largest grid accepted, in cells
    pub const MAX_CELLS: usize = 1 << 24;

    /// Perfect maze with the pattern and default settings
    pub fn new(width: usize, height: usize, entry: Coord, exit: Coord) -> Self {
        Self {
            width,
            height,
            entry,
            exit,
            perfect: true,
            seed: None,
            insert_pattern: true,
            dead_end_probability: Self::DEFAULT_DEAD_END_PROBABILITY,
            output_file: None,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }

    /// Check the constraints on the parameters, first violation wins
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MazeError::invalid(format!(
                "WIDTH and HEIGHT must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let cells = Grid::cell_count(self.width, self.height)?;
        if cells > Self::MAX_CELLS {
            return Err(MazeError::invalid(format!(
                "a {}x{} maze has {cells} cells, at most {} are supported",
                self.width,
                self.height,
                Self::MAX_CELLS
            )));
        }
        for (name, c) in [("ENTRY", self.entry), ("EXIT", self.exit)] {
            if c.x >= self.width || c.y >= self.height {
                return Err(MazeError::invalid(format!(
                    "{name} {c} must be inside the {}x{} maze",
                    self.width, self.height
                )));
            }
        }
        if self.entry == self.exit {
            return Err(MazeError::invalid("ENTRY and EXIT must be different"));
        }
        for (name, c) in [("ENTRY", self.entry), ("EXIT", self.exit)] {
            if !self.on_border(c) {
                warn!("{name} {c} is not on the border, it gets no door");
            }
        }
        if self.dead_end_probability > 100 {
            return Err(MazeError::invalid(format!(
                "DEAD_END_PROBABILITY must be within 0-100, got {}",
                self.dead_end_probability
            )));
        }
        if self.cell_size < 2 {
            return Err(MazeError::invalid(format!(
                "W_CELL_SIZE must be at least 2, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }

    fn on_border(&self, c: Coord) -> bool {
        c.x == 0 || c.y == 0 || c.x + 1 == self.width || c.y + 1 == self.height
    }
}

/// Raw configuration, as read from a file
#[derive(Clone, Debug, Default)]
pub struct MazeConfig {
    values: BTreeMap<String, String>,
    zero_based: bool,
}

impl MazeConfig {
    const KNOWN_KEYS: [&'static str; 10] = [
        "WIDTH",
        "HEIGHT",
        "ENTRY",
        "EXIT",
        "OUTPUT_FILE",
        "PERFECT",
        "SEED",
        "INSERT_42",
        "W_CELL_SIZE",
        "DEAD_END_PROBABILITY",
    ];
    const REQUIRED_KEYS: [&'static str; 6] =
        ["WIDTH", "HEIGHT", "ENTRY", "EXIT", "OUTPUT_FILE", "PERFECT"];

    /// Parse `KEY=VALUE` lines.
    ///
    /// Blank lines and `#` comments are skipped, values may be quoted and
    /// a repeated key overrides the earlier one.
    pub fn parse_str(text: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                MazeError::invalid(format!("line {}: expected KEY=VALUE, got `{line}`", n + 1))
            })?;
            let key = key.trim().to_uppercase();
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                debug!("Ignoring unknown configuration key {key}");
            }
            values.insert(key, value.to_string());
        }
        Ok(Self {
            values,
            zero_based: false,
        })
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Ok(Self::parse_str(&text)?)
    }

    /// Treat `ENTRY` and `EXIT` as 0-based coordinates
    pub fn zero_based(mut self, zero_based: bool) -> Self {
        self.zero_based = zero_based;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_uppercase(), value.into());
    }

    /// Turn the raw values into [MazeParams]
    pub fn validate(&self) -> Result<MazeParams> {
        for key in Self::REQUIRED_KEYS {
            if self.get(key).map_or(true, str::is_empty) {
                return Err(MazeError::invalid(format!("{key} is not set")));
            }
        }

        let width = self.number::<usize>("WIDTH")?;
        let height = self.number::<usize>("HEIGHT")?;
        let entry = self.coord("ENTRY")?;
        let exit = self.coord("EXIT")?;

        let mut params = MazeParams::new(width, height, entry, exit);
        params.perfect = self.flag("PERFECT")?;
        params.output_file = self.get("OUTPUT_FILE").map(PathBuf::from);
        if self.is_set("SEED") {
            params.seed = Some(self.number("SEED")?);
        }
        if self.is_set("INSERT_42") {
            params.insert_pattern = self.flag("INSERT_42")?;
        }
        if self.is_set("W_CELL_SIZE") {
            params.cell_size = self.number("W_CELL_SIZE")?;
        }
        if self.is_set("DEAD_END_PROBABILITY") {
            params.dead_end_probability = self.number("DEAD_END_PROBABILITY")?;
        }

        params.validate()?;
        Ok(params)
    }

    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    fn raw(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| MazeError::invalid(format!("{key} is not set")))
    }

    fn number<T: FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.raw(key)?;
        raw.parse().map_err(|_| {
            MazeError::invalid(format!("{key} must be a non-negative integer, got `{raw}`"))
        })
    }

    fn flag(&self, key: &str) -> Result<bool> {
        let raw = self.raw(key)?;
        match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(MazeError::invalid(format!(
                "{key} must be True or False, got `{raw}`"
            ))),
        }
    }

    /// `x,y` pair, translated to 0-based unless configured otherwise
    fn coord(&self, key: &str) -> Result<Coord> {
        let raw = self.raw(key)?;
        let malformed = || MazeError::invalid(format!("{key} must be `x,y`, got `{raw}`"));
        let (x, y) = raw.split_once(',').ok_or_else(malformed)?;
        let x: usize = x.trim().parse().map_err(|_| malformed())?;
        let y: usize = y.trim().parse().map_err(|_| malformed())?;
        if self.zero_based {
            return Ok(Coord::new(x, y));
        }
        if x == 0 || y == 0 {
            return Err(MazeError::invalid(format!(
                "{key} coordinates start at 1, got `{raw}`"
            )));
        }
        Ok(Coord::new(x - 1, y - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
# sample
WIDTH=20
HEIGHT = 15
ENTRY=1,1
EXIT=20,15
OUTPUT_FILE=\"maze.txt\"
PERFECT=True
SEED=42
";

    #[test]
    fn parse_sample() {
        let params = MazeConfig::parse_str(SAMPLE).unwrap().validate().unwrap();
        assert_eq!((params.width, params.height), (20, 15));
        assert_eq!(params.entry, Coord::new(0, 0));
        assert_eq!(params.exit, Coord::new(19, 14));
        assert!(params.perfect);
        assert_eq!(params.seed, Some(42));
        assert!(params.insert_pattern);
        assert_eq!(params.dead_end_probability, 99);
        assert_eq!(params.cell_size, 25);
        assert_eq!(params.output_file, Some(PathBuf::from("maze.txt")));
    }

    #[test]
    fn zero_based_coordinates() {
        let params = MazeConfig::parse_str(&SAMPLE.replace("20,15", "19,14"))
            .unwrap()
            .zero_based(true)
            .validate()
            .unwrap();
        assert_eq!(params.entry, Coord::new(1, 1));
        assert_eq!(params.exit, Coord::new(19, 14));
    }

    #[test]
    fn optional_keys() {
        let mut config = MazeConfig::parse_str(SAMPLE).unwrap();
        config.set("insert_42", "False");
        config.set("W_CELL_SIZE", "10");
        config.set("DEAD_END_PROBABILITY", "0");
        config.set("SEED", "");
        config.set("PERFECT", "false");
        let params = config.validate().unwrap();
        assert!(!params.insert_pattern);
        assert!(!params.perfect);
        assert_eq!(params.cell_size, 10);
        assert_eq!(params.dead_end_probability, 0);
        assert_eq!(params.seed, None);
    }

    fn invalid_with(key: &str, value: &str) -> MazeError {
        let mut config = MazeConfig::parse_str(SAMPLE).unwrap();
        config.set(key, value);
        config.validate().unwrap_err()
    }

    #[test]
    fn rejects_invalid_values() {
        for (key, value) in [
            ("WIDTH", "0"),
            ("WIDTH", "-3"),
            ("HEIGHT", "ten"),
            ("ENTRY", "1;1"),
            ("ENTRY", "0,1"),
            ("EXIT", "21,1"),
            ("EXIT", "1,1"),
            ("PERFECT", "maybe"),
            ("SEED", "1.5"),
            ("DEAD_END_PROBABILITY", "101"),
            ("W_CELL_SIZE", "1"),
            ("OUTPUT_FILE", ""),
        ] {
            assert!(
                matches!(invalid_with(key, value), MazeError::InvalidConfig(_)),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_huge_dimensions() {
        for (width, height) in [("9223372036854775808", "15"), ("20000", "20000")] {
            let mut config = MazeConfig::parse_str(SAMPLE).unwrap();
            config.set("WIDTH", width);
            config.set("HEIGHT", height);
            assert!(
                matches!(config.validate(), Err(MazeError::InvalidConfig(_))),
                "{width}x{height} should be rejected"
            );
        }
    }

    #[test]
    fn border_endpoints() {
        let params = MazeParams::new(5, 4, Coord::new(0, 2), Coord::new(4, 3));
        assert!(params.on_border(params.entry));
        assert!(params.on_border(params.exit));
        assert!(params.on_border(Coord::new(2, 0)));
        assert!(!params.on_border(Coord::new(2, 2)));

        let interior = MazeParams::new(5, 4, Coord::new(2, 1), Coord::new(4, 3));
        assert!(interior.validate().is_ok());
    }

    #[test]
    fn missing_key() {
        let config = MazeConfig::parse_str("WIDTH=3\nHEIGHT=3").unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            MazeError::InvalidConfig("ENTRY is not set".to_string())
        );
    }

    #[test]
    fn malformed_line() {
        assert!(matches!(
            MazeConfig::parse_str("WIDTH 3"),
            Err(MazeError::InvalidConfig(_))
        ));
    }
}
