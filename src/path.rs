use serde::Serialize;

use crate::common::{Cell, Direction};
use crate::heuristic::dist;
use crate::map::Map;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PathCost {
    /// Octile length of the path.
    pub distance: f64,
    /// Sum of the weights of every cell on the path, start included.
    pub terrain: f64,
}

impl PathCost {
    pub fn total(&self) -> f64 {
        self.distance + self.terrain
    }
}

/// Expands consecutive jump points into every cell in between.
pub fn materialize(jump_points: &[Cell]) -> Vec<Cell> {
    let mut cells = Vec::new();
    for pair in jump_points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let direction = Direction::between(from, to);
        let mut current = from;
        while current != to {
            cells.push(current);
            current = direction.step(current);
        }
    }
    if let Some(&last) = jump_points.last() {
        cells.push(last);
    }
    cells
}

/// Cost of a dense path: the start cell's weight, then for every step the
/// octile distance plus the weight of the cell entered.
pub fn path_cost(map: &Map, path: &[Cell]) -> PathCost {
    let Some(&first) = path.first() else {
        return PathCost::default();
    };
    let mut cost = PathCost {
        distance: 0.0,
        terrain: map.weight(first) as f64,
    };
    for pair in path.windows(2) {
        cost.distance += dist(pair[0], pair[1]);
        cost.terrain += map.weight(pair[1]) as f64;
    }
    cost
}

/// Checks a dense path: right endpoints, and every step is a legal unit move.
pub fn verify(map: &Map, path: &[Cell], start: Cell, goal: Cell) -> bool {
    if path.first() != Some(&start) || path.last() != Some(&goal) {
        return false;
    }
    path.windows(2).all(|pair| {
        let direction = Direction::between(pair[0], pair[1]);
        !direction.is_zero()
            && direction.step(pair[0]) == pair[1]
            && map.can_step(pair[0], direction)
    })
}
