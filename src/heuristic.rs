use crate::common::Cell;

/// Octile distance: exact cost of an unobstructed 8-directional path with
/// unit straight moves and sqrt(2) diagonal moves.
pub fn dist(a: Cell, b: Cell) -> f64 {
    let dx = (a.0 - b.0).unsigned_abs() as f64;
    let dy = (a.1 - b.1).unsigned_abs() as f64;
    (dx + dy) + (std::f64::consts::SQRT_2 - 2.0) * dx.min(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_dist_known_values() {
        assert_eq!(dist((0, 0), (0, 0)), 0.0);
        assert!((dist((0, 0), (0, 5)) - 5.0).abs() < EPSILON);
        assert!((dist((0, 0), (4, 4)) - 4.0 * std::f64::consts::SQRT_2).abs() < EPSILON);
        assert!((dist((1, 2), (4, 8)) - (3.0 + 3.0 * std::f64::consts::SQRT_2)).abs() < EPSILON);
    }

    #[test]
    fn test_dist_symmetric() {
        let cells = [(0, 0), (3, -2), (7, 7), (-4, 9), (10, 1)];
        for &a in &cells {
            assert_eq!(dist(a, a), 0.0);
            for &b in &cells {
                assert!((dist(a, b) - dist(b, a)).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_dist_consistent() {
        // h(a) <= cost(a, n) + h(n) for every unit move.
        let goal = (5, 9);
        for x in -3..8 {
            for y in -3..12 {
                let a = (x, y);
                for dx in -1..=1isize {
                    for dy in -1..=1isize {
                        let n = (x + dx, y + dy);
                        assert!(dist(a, goal) <= dist(a, n) + dist(n, goal) + EPSILON);
                    }
                }
            }
        }
    }
}
