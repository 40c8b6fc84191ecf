use anyhow::{anyhow, bail, Context};
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::common::{Cell, Direction, SearchError};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Obstacle,
    Weight(u32),
}

impl Tile {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' | '@' => Some(Tile::Obstacle),
            '.' => Some(Tile::Weight(0)),
            _ => ALPHABET.find(ch).map(|index| Tile::Weight(index as u32)),
        }
    }

    pub fn is_passable(&self) -> bool {
        matches!(self, Tile::Weight(_))
    }
}

/// Immutable weighted grid. Never changes once loaded, so one map can back
/// any number of searches.
#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    grid: Vec<Vec<Tile>>,
}

impl Map {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open map file {path}"))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let mut header = |name: &str| -> anyhow::Result<String> {
            lines
                .next()
                .ok_or_else(|| anyhow!("missing {name} line"))?
                .map_err(anyhow::Error::from)
        };

        let _type = header("type")?;
        let height = parse_dimension(&header("height")?, "height")?;
        let width = parse_dimension(&header("width")?, "width")?;
        let _map = header("map")?;

        let mut rows = Vec::with_capacity(height);
        for line in lines.take(height) {
            rows.push(line?.trim_end().to_string());
        }
        if rows.len() != height {
            bail!("{path}: expected {height} rows, found {}", rows.len());
        }

        let map = Self::parse_rows(rows.iter().map(String::as_str), width)
            .with_context(|| format!("error with map file: {path}"))?;
        Ok(map)
    }

    /// Builds a map from in-memory rows; every row must have the same width.
    pub fn from_rows(rows: &[&str]) -> anyhow::Result<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        Self::parse_rows(rows.iter().copied(), width)
    }

    fn parse_rows<'a>(rows: impl Iterator<Item = &'a str>, width: usize) -> anyhow::Result<Self> {
        let mut grid = Vec::new();
        for (row_index, row) in rows.enumerate() {
            let tiles = row
                .chars()
                .map(|ch| {
                    Tile::from_char(ch)
                        .ok_or_else(|| anyhow!("unknown tile {ch:?} in row {row_index}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            if tiles.len() != width {
                bail!(
                    "row {row_index} has {} tiles, expected {width}",
                    tiles.len()
                );
            }
            grid.push(tiles);
        }

        Ok(Map {
            height: grid.len(),
            width,
            grid,
        })
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && (cell.0 as usize) < self.height
            && (cell.1 as usize) < self.width
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if self.contains(cell) {
            Some(self.grid[cell.0 as usize][cell.1 as usize])
        } else {
            None
        }
    }

    /// Outside the grid counts as blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !matches!(self.tile(cell), Some(Tile::Weight(_)))
    }

    /// Traversal cost of a passable cell. Blocked cells report zero; callers
    /// check `is_blocked` first.
    pub fn weight(&self, cell: Cell) -> u32 {
        match self.tile(cell) {
            Some(Tile::Weight(weight)) => weight,
            _ => 0,
        }
    }

    /// A unit move is legal when the target is open and, for diagonals, at
    /// least one of the two orthogonal cells is open.
    pub fn can_step(&self, cell: Cell, direction: Direction) -> bool {
        if self.is_blocked(direction.step(cell)) {
            return false;
        }
        if direction.is_diagonal() {
            let [first, second] = direction.components();
            return !(self.is_blocked(first.step(cell)) && self.is_blocked(second.step(cell)));
        }
        true
    }

    pub fn get_neighbors(&self, cell: Cell) -> Vec<Cell> {
        Direction::ALL
            .iter()
            .filter(|direction| self.can_step(cell, **direction))
            .map(|direction| direction.step(cell))
            .collect()
    }

    /// Search precondition: endpoints must be inside the grid and open.
    pub fn check_endpoint(&self, cell: Cell) -> Result<(), SearchError> {
        if !self.contains(cell) {
            return Err(SearchError::OutOfBounds(cell));
        }
        if self.is_blocked(cell) {
            return Err(SearchError::Blocked(cell));
        }
        Ok(())
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height as isize).flat_map(move |x| (0..self.width as isize).map(move |y| (x, y)))
    }
}

fn parse_dimension(line: &str, name: &str) -> anyhow::Result<usize> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(key), Some(value)) if key == name => value
            .parse::<usize>()
            .with_context(|| format!("invalid {name} value {value:?}")),
        _ => bail!("expected `{name} <n>`, got {line:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_map_is_shareable_across_threads() {
        assert_send_sync::<Map>();

        let map = std::sync::Arc::new(Map::from_file("map_file/test/test.map").unwrap());
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let map = std::sync::Arc::clone(&map);
                std::thread::spawn(move || map.weight((5, 7)))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }

    #[test]
    fn test_read_map() {
        let map = Map::from_file("map_file/test/test.map").unwrap();

        assert_eq!(map.height, 6);
        assert_eq!(map.width, 8);

        assert!(map.is_blocked((-1, 0)));
        assert!(map.is_blocked((0, 8)));
        assert!(map.is_blocked((2, 3)));
        assert!(!map.is_blocked((0, 0)));
        assert_eq!(map.weight((0, 0)), 0);
        assert_eq!(map.weight((5, 7)), 2);
    }

    #[test]
    fn test_tile_encoding() {
        assert_eq!(Tile::from_char('A'), Some(Tile::Weight(0)));
        assert_eq!(Tile::from_char('Z'), Some(Tile::Weight(25)));
        assert_eq!(Tile::from_char('.'), Some(Tile::Weight(0)));
        assert_eq!(Tile::from_char('#'), Some(Tile::Obstacle));
        assert_eq!(Tile::from_char('@'), Some(Tile::Obstacle));
        assert_eq!(Tile::from_char('x'), None);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        assert!(Map::from_rows(&["AAA", "AA"]).is_err());
        assert!(Map::from_rows(&["AAA", "A?A"]).is_err());
    }

    #[test]
    fn test_corner_squeeze() {
        let map = Map::from_rows(&["A#", "#A"]).unwrap();
        assert!(!map.can_step((0, 0), Direction::new(1, 1)));
        assert!(map.get_neighbors((0, 0)).is_empty());

        let map = Map::from_rows(&["AA", "#A"]).unwrap();
        assert!(map.can_step((0, 0), Direction::new(1, 1)));
        assert_eq!(map.get_neighbors((0, 0)).len(), 2);
    }

    #[test]
    fn test_check_endpoint() {
        let map = Map::from_rows(&["A#"]).unwrap();
        assert_eq!(map.check_endpoint((0, 0)), Ok(()));
        assert_eq!(map.check_endpoint((0, 1)), Err(SearchError::Blocked((0, 1))));
        assert_eq!(
            map.check_endpoint((3, 0)),
            Err(SearchError::OutOfBounds((3, 0)))
        );
    }
}
