use super::Frontier;
use crate::common::{Cell, SearchError, SearchResult};
use crate::heuristic::dist;
use crate::map::Map;

use tracing::{debug, instrument, trace};

/// Plain 8-directional A*, the baseline JPS is measured against.
pub fn a_star(map: &Map, start: Cell, goal: Cell) -> Result<SearchResult, SearchError> {
    a_star_with_limit(map, start, goal, None)
}

#[instrument(skip_all, name = "a_star", fields(start = ?start, goal = ?goal), level = "debug")]
pub fn a_star_with_limit(
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
            debug!("found path of {} cells", path.len());
            return Ok(SearchResult::Found { path, expansions });
        }

        let cell = current.position;
        for neighbor in map.get_neighbors(cell) {
            let total_cost = current.cost - dist(cell, goal)
                + dist(cell, neighbor)
                + dist(neighbor, goal)
                + map.weight(neighbor) as f64;
            frontier.relax(cell, neighbor, total_cost);
        }
    }

    debug!("cannot find solution");
    Ok(SearchResult::NotFound { expansions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{path_cost, verify};
    use tracing_subscriber;

    const EPSILON: f64 = 1e-9;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    #[test]
    fn test_a_star_open_grid() {
        init_tracing();
        let map = Map::from_rows(&["AAAAA"; 5]).unwrap();
        let result = a_star(&map, (0, 0), (4, 4)).unwrap();
        let path = result.path().unwrap();
        assert_eq!(path, &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        assert!((path_cost(&map, path).total() - 4.0 * std::f64::consts::SQRT_2).abs() < EPSILON);
        assert_eq!(result.expansions(), 5);
    }

    #[test]
    fn test_a_star_straight_line() {
        let map = Map::from_rows(&["AAAAAAA"]).unwrap();
        let result = a_star(&map, (0, 6), (0, 0)).unwrap();
        assert_eq!(result.path().unwrap().len(), 7);
    }

    #[test]
    fn test_a_star_avoids_expensive_terrain() {
        // Going straight through the Z cell costs far more than the detour.
        let map = Map::from_rows(&["AAA", "AZA", "AAA"]).unwrap();
        let path = a_star(&map, (1, 0), (1, 2)).unwrap().into_path().unwrap();
        assert!(!path.contains(&(1, 1)));
        assert!(verify(&map, &path, (1, 0), (1, 2)));
        assert!((path_cost(&map, &path).total() - 2.0 * std::f64::consts::SQRT_2).abs() < EPSILON);
    }

    #[test]
    fn test_a_star_no_corner_squeeze() {
        let map = Map::from_rows(&["A#", "#A"]).unwrap();
        let result = a_star(&map, (0, 0), (1, 1)).unwrap();
        assert_eq!(result, SearchResult::NotFound { expansions: 1 });
    }

    #[test]
    fn test_a_star_wall_unreachable() {
        let map = Map::from_rows(&["AAAA", "####", "AAAA"]).unwrap();
        let result = a_star(&map, (0, 0), (2, 3)).unwrap();
        assert!(!result.is_found());
        assert_eq!(result.expansions(), 4);
    }

    #[test]
    fn test_a_star_expansion_limit() {
        let map = Map::from_rows(&["AAAAAAAAAA"]).unwrap();
        let result = a_star_with_limit(&map, (0, 0), (0, 9), Some(3)).unwrap();
        assert_eq!(result, SearchResult::Aborted { expansions: 3 });
    }

    #[test]
    fn test_a_star_counts_stale_pops() {
        // Four of these pops are cells that were reached again more cheaply
        // before their first entry came off the heap.
        let map = Map::from_file("map_file/test/test.map").unwrap();
        let result = a_star(&map, (0, 0), (4, 4)).unwrap();
        assert_eq!(
            result.path().unwrap(),
            &[(0, 0), (1, 1), (1, 2), (1, 3), (2, 4), (3, 4), (4, 4)]
        );
        assert_eq!(result.expansions(), 26);

        let capped = a_star_with_limit(&map, (0, 0), (4, 4), Some(25)).unwrap();
        assert_eq!(capped, SearchResult::Aborted { expansions: 25 });
    }

    #[test]
    fn test_a_star_rejects_invalid_endpoints() {
        let map = Map::from_rows(&["AA#"]).unwrap();
        assert_eq!(a_star(&map, (0, 0), (0, 2)), Err(SearchError::Blocked((0, 2))));
        assert_eq!(
            a_star(&map, (-1, 0), (0, 1)),
            Err(SearchError::OutOfBounds((-1, 0)))
        );
    }
}
