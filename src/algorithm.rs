mod astar;
mod jps;

pub use astar::{a_star, a_star_with_limit};
pub use jps::{jps, jps_with_limit};

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::common::Cell;

type Trace = HashMap<Cell, Cell>;

#[derive(Debug, Clone)]
pub(crate) struct OpenNode {
    pub(crate) cost: f64,
    pub(crate) position: Cell,
    pub(crate) parent: Option<Cell>,
    seq: usize,
}

// Lower cost pops first; equal costs pop in insertion order.
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// Open list plus the best-cost table. A cell may sit in the heap several
/// times; only the entry matching the recorded best cost gets expanded.
pub(crate) struct Frontier {
    open_list: BinaryHeap<OpenNode>,
    closed: HashMap<Cell, f64>,
    trace: Trace,
    next_seq: usize,
}

impl Frontier {
    pub(crate) fn new(start: Cell) -> Self {
        let mut frontier = Frontier {
            open_list: BinaryHeap::new(),
            closed: HashMap::new(),
            trace: HashMap::new(),
            next_seq: 0,
        };
        frontier.closed.insert(start, 0.0);
        frontier.push(0.0, start, None);
        frontier
    }

    fn push(&mut self, cost: f64, position: Cell, parent: Option<Cell>) {
        self.open_list.push(OpenNode {
            cost,
            position,
            parent,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<OpenNode> {
        self.open_list.pop()
    }

    /// An entry is stale once a cheaper cost was recorded for its cell.
    /// Stale pops still count as expansions, so counts line up with a
    /// search that never deduplicates its heap.
    pub(crate) fn is_stale(&self, node: &OpenNode) -> bool {
        self.closed
            .get(&node.position)
            .is_some_and(|best| node.cost > *best)
    }

    /// Records `cost` for `to` if it beats the best known one and queues it.
    pub(crate) fn relax(&mut self, from: Cell, to: Cell, cost: f64) -> bool {
        if self.closed.get(&to).is_some_and(|best| cost >= *best) {
            return false;
        }
        self.closed.insert(to, cost);
        self.trace.insert(to, from);
        self.push(cost, to, Some(from));
        true
    }

    pub(crate) fn construct_path(&self, mut current: Cell) -> Vec<Cell> {
        let mut path = vec![current];
        while let Some(&prev) = self.trace.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_pops_lowest_cost_first() {
        let mut frontier = Frontier::new((0, 0));
        assert_eq!(frontier.pop().unwrap().position, (0, 0));

        frontier.relax((0, 0), (0, 1), 3.0);
        frontier.relax((0, 0), (1, 0), 1.5);
        frontier.relax((0, 0), (1, 1), 2.0);

        let order: Vec<Cell> = std::iter::from_fn(|| frontier.pop())
            .map(|node| node.position)
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (0, 1)]);
    }

    #[test]
    fn test_frontier_ties_keep_insertion_order() {
        let mut frontier = Frontier::new((0, 0));
        frontier.pop();
        frontier.relax((0, 0), (0, 1), 1.0);
        frontier.relax((0, 0), (1, 0), 1.0);
        assert_eq!(frontier.pop().unwrap().position, (0, 1));
        assert_eq!(frontier.pop().unwrap().position, (1, 0));
    }

    #[test]
    fn test_frontier_skips_stale_entries() {
        let mut frontier = Frontier::new((0, 0));
        frontier.pop();

        assert!(frontier.relax((0, 0), (2, 2), 5.0));
        assert!(!frontier.relax((1, 1), (2, 2), 5.0));
        assert!(frontier.relax((1, 1), (2, 2), 4.0));

        let node = frontier.pop().unwrap();
        assert_eq!(node.position, (2, 2));
        assert_eq!(node.cost, 4.0);
        assert_eq!(node.parent, Some((1, 1)));
        assert!(!frontier.is_stale(&node));

        let old = frontier.pop().unwrap();
        assert_eq!(old.cost, 5.0);
        assert!(frontier.is_stale(&old));
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_construct_path() {
        let mut frontier = Frontier::new((0, 0));
        frontier.relax((0, 0), (0, 3), 1.0);
        frontier.relax((0, 3), (2, 5), 2.0);
        assert_eq!(frontier.construct_path((2, 5)), vec![(0, 0), (0, 3), (2, 5)]);
    }
}
