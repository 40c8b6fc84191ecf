use super::Frontier;
use crate::common::{Cell, Direction, SearchError, SearchResult};
use crate::heuristic::dist;
use crate::map::Map;

use tracing::{debug, instrument, trace};

/// Neighbors worth exploring from a cell, split by why they survive pruning.
#[derive(Debug, Default)]
struct Pruned {
    natural: [Option<Cell>; 3],
    forced: [Option<Cell>; 2],
}

impl Pruned {
    fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.natural.iter().chain(self.forced.iter()).flatten().copied()
    }

    fn has_forced(&self) -> bool {
        self.forced.iter().any(Option::is_some)
    }
}

/// `target` only needs its own branch if the side cell is blocked or the
/// terrain breaks the symmetry with the path through `cell`.
fn is_forced(map: &Map, cell: Cell, side: Cell, target: Cell) -> bool {
    let weight = map.weight(cell);
    !map.is_blocked(target)
        && (map.is_blocked(side) || weight < map.weight(side) || weight != map.weight(target))
}

fn pruned_neighbors(map: &Map, direction: Direction, cell: Cell) -> Pruned {
    let (x, y) = cell;
    let Direction { dx, dy } = direction;
    let mut pruned = Pruned::default();

    let open = |n: Cell| (!map.is_blocked(n)).then_some(n);
    let forced = |side: Cell, target: Cell| is_forced(map, cell, side, target).then_some(target);

    if direction.is_diagonal() {
        let horizontal = open((x, y + dy));
        let vertical = open((x + dx, y));
        pruned.natural[0] = horizontal;
        pruned.natural[1] = vertical;
        if horizontal.is_some() || vertical.is_some() {
            pruned.natural[2] = open((x + dx, y + dy));
        }

        pruned.forced[0] = forced((x - dx, y), (x - dx, y + dy));
        pruned.forced[1] = forced((x, y - dy), (x + dx, y - dy));
    } else {
        let ahead = (x + dx, y + dy);
        if map.is_blocked(ahead) {
            return pruned;
        }
        pruned.natural[0] = Some(ahead);

        // Perpendicular axis to the direction of travel.
        let (px, py) = if dx == 0 { (1, 0) } else { (0, 1) };
        for (slot, sign) in [1, -1].into_iter().enumerate() {
            let side = (x + sign * px, y + sign * py);
            let target = (ahead.0 + sign * px, ahead.1 + sign * py);
            pruned.forced[slot] = forced(side, target);
        }
    }

    pruned
}

/// Candidate neighbors of `cell` when it was reached from `parent`.
/// The start cell has no parent and keeps every legal move.
pub(crate) fn prune(map: &Map, parent: Option<Cell>, cell: Cell) -> Vec<Cell> {
    match parent {
        None => map.get_neighbors(cell),
        Some(parent) => pruned_neighbors(map, Direction::between(parent, cell), cell)
            .iter()
            .collect(),
    }
}

/// True when `cell` is a jump point for travel from `parent`: either a forced
/// neighbor exists or a natural neighbor sits on different terrain.
pub(crate) fn has_forced(map: &Map, parent: Cell, cell: Cell) -> bool {
    let pruned = pruned_neighbors(map, Direction::between(parent, cell), cell);
    let weight = map.weight(cell);
    pruned.has_forced()
        || pruned
            .natural
            .iter()
            .flatten()
            .any(|n| map.weight(*n) != weight)
}

/// Scans from `from` along `direction` and returns the next jump point.
/// Straight rays are walked in a loop; diagonal rays scan both straight
/// components at every step, so call depth never exceeds two.
pub(crate) fn jump(map: &Map, from: Cell, direction: Direction, goal: Cell) -> Option<Cell> {
    let mut current = from;
    loop {
        if !map.can_step(current, direction) {
            return None;
        }
        let next = direction.step(current);

        if next == goal || has_forced(map, current, next) {
            return Some(next);
        }

        if direction.is_diagonal()
            && direction
                .components()
                .into_iter()
                .any(|straight| jump(map, next, straight, goal).is_some())
        {
            return Some(next);
        }

        current = next;
    }
}

pub(crate) fn identify_successors(
    map: &Map,
    parent: Option<Cell>,
    cell: Cell,
    goal: Cell,
) -> Vec<Cell> {
    let mut successors = Vec::new();
    for neighbor in prune(map, parent, cell) {
        if let Some(jump_point) = jump(map, cell, Direction::between(cell, neighbor), goal) {
            if !successors.contains(&jump_point) {
                successors.push(jump_point);
            }
        }
    }
    successors
}

/// Number of cells strictly between two cells on a straight or diagonal line.
fn jumped_over(from: Cell, to: Cell) -> usize {
    let steps = (from.0 - to.0).unsigned_abs().max((from.1 - to.1).unsigned_abs());
    steps.saturating_sub(1)
}

/// Skipped cells must share the jump point's weight; the scan stops at every
/// terrain change, which is what lets the cost update charge `weight(to)`.
pub(crate) fn skipped_cells_match(map: &Map, from: Cell, to: Cell) -> bool {
    let direction = Direction::between(from, to);
    let weight = map.weight(to);
    let mut current = direction.step(from);
    while current != to {
        if map.is_blocked(current) || map.weight(current) != weight {
            return false;
        }
        current = direction.step(current);
    }
    true
}

/// Jump Point Search from `start` to `goal`. On success the path holds the
/// jump points only; see [`crate::path::materialize`] for the dense path.
pub fn jps(map: &Map, start: Cell, goal: Cell) -> Result<SearchResult, SearchError> {
    jps_with_limit(map, start, goal, None)
}

#[instrument(skip_all, name = "jps", fields(start = ?start, goal = ?goal), level = "debug")]
pub fn jps_with_limit(
    map: &Map,
    start: Cell,
    goal: Cell,
    max_expansions: Option<usize>,
) -> Result<SearchResult, SearchError> {
    map.check_endpoint(start)?;
    map.check_endpoint(goal)?;

    let mut frontier = Frontier::new(start);
    let mut expansions = 0;

    while let Some(current) = frontier.pop() {
        if max_expansions.is_some_and(|max| expansions >= max) {
            debug!("expansion limit reached after {expansions} expansions");
            return Ok(SearchResult::Aborted { expansions });
        }
        expansions += 1;
        if frontier.is_stale(&current) {
            trace!("skip stale node: {current:?}");
            continue;
        }
        trace!("expand node: {current:?}");

        if current.position == goal {
            let path = frontier.construct_path(goal);
            debug!("found path with {} jump points", path.len());
            return Ok(SearchResult::Found { path, expansions });
        }

        let cell = current.position;
        let cell_weight = map.weight(cell) as f64;
        for jump_point in identify_successors(map, current.parent, cell, goal) {
            debug_assert!(skipped_cells_match(map, cell, jump_point));

            let skipped = jumped_over(cell, jump_point) as f64;
            let total_cost = current.cost - dist(cell, goal)
                + dist(cell, jump_point)
                + dist(jump_point, goal)
                + map.weight(jump_point) as f64 * skipped
                + cell_weight;
            frontier.relax(cell, jump_point, total_cost);
        }
    }

    debug!("cannot find solution");
    Ok(SearchResult::NotFound { expansions })
}
