pub mod algorithm;
pub mod common;
pub mod config;
pub mod heuristic;
pub mod map;
pub mod path;
pub mod render;
pub mod runner;
pub mod scenario;
pub mod stat;

pub use algorithm::{a_star, a_star_with_limit, jps, jps_with_limit};
pub use common::{Cell, Direction, SearchError, SearchResult};
pub use map::{Map, Tile};
