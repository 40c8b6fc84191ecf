use serde::Serialize;
use thiserror::Error;

/// Grid coordinate as (row, column). Signed so that a step off any edge is
/// still a valid query for the map.
pub type Cell = (isize, isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: isize,
    pub dy: isize,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::new(-1, -1),
        Direction::new(-1, 0),
        Direction::new(-1, 1),
        Direction::new(0, -1),
        Direction::new(0, 1),
        Direction::new(1, -1),
        Direction::new(1, 0),
        Direction::new(1, 1),
    ];

    pub const fn new(dx: isize, dy: isize) -> Self {
        Direction { dx, dy }
    }

    /// Componentwise sign of `to - from`. Zero when the cells are equal.
    pub fn between(from: Cell, to: Cell) -> Self {
        Direction {
            dx: (to.0 - from.0).signum(),
            dy: (to.1 - from.1).signum(),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// The two straight directions a diagonal is made of.
    pub fn components(&self) -> [Direction; 2] {
        [Direction::new(self.dx, 0), Direction::new(0, self.dy)]
    }

    pub fn step(&self, cell: Cell) -> Cell {
        (cell.0 + self.dx, cell.1 + self.dy)
    }
}

/// Outcome of a single search call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchResult {
    Found { path: Vec<Cell>, expansions: usize },
    NotFound { expansions: usize },
    // Expansion cap was reached before the frontier drained.
    Aborted { expansions: usize },
}

impl SearchResult {
    pub fn path(&self) -> Option<&[Cell]> {
        match self {
            SearchResult::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<Cell>> {
        match self {
            SearchResult::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn expansions(&self) -> usize {
        match self {
            SearchResult::Found { expansions, .. }
            | SearchResult::NotFound { expansions }
            | SearchResult::Aborted { expansions } => *expansions,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("cell {0:?} is outside the map")]
    OutOfBounds(Cell),
    #[error("cell {0:?} is an obstacle")]
    Blocked(Cell),
}
