use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;
use tracing::info;

use crate::common::{Cell, SearchResult};
use crate::map::Map;
use crate::path::{materialize, path_cost, PathCost};
use crate::scenario::Route;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub algorithm: String,
    pub cost: Option<PathCost>,
    /// Heap pops, stale entries included.
    pub expansions: usize,
    pub time_us: u64,
    pub path_len: usize,
    pub aborted: bool,
}

impl Stats {
    /// `jump_points` marks paths that still need materializing.
    pub fn from_result(
        algorithm: &str,
        map: &Map,
        result: &SearchResult,
        elapsed: Duration,
        jump_points: bool,
    ) -> (Self, Option<Vec<Cell>>) {
        let dense = result.path().map(|path| {
            if jump_points {
                materialize(path)
            } else {
                path.to_vec()
            }
        });

        let stats = Stats {
            algorithm: algorithm.to_string(),
            cost: dense.as_deref().map(|path| path_cost(map, path)),
            expansions: result.expansions(),
            time_us: elapsed.as_micros() as u64,
            path_len: dense.as_ref().map_or(0, Vec::len),
            aborted: matches!(result, SearchResult::Aborted { .. }),
        };
        (stats, dense)
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.cost.map(|cost| cost.total())
    }

    pub(crate) fn print(&self) {
        match self.total_cost() {
            Some(cost) => info!(
                "{} cost {:.5} path cells {} expanded nodes {} time(microseconds) {}",
                self.algorithm, cost, self.path_len, self.expansions, self.time_us
            ),
            None => info!(
                "{} found no path (aborted: {}) expanded nodes {} time(microseconds) {}",
                self.algorithm, self.aborted, self.expansions, self.time_us
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub map: String,
    pub bucket: usize,
    pub start: Cell,
    pub goal: Cell,
    /// Length listed in the scenario file, for comparison with `cost`.
    pub optimal_length: f64,
    pub jps: Stats,
    pub a_star: Stats,
    pub costs_match: bool,
}

impl CaseReport {
    pub fn new(map: &str, route: &Route, jps: Stats, a_star: Stats) -> Self {
        let costs_match = match (jps.total_cost(), a_star.total_cost()) {
            (Some(a), Some(b)) => (a - b).abs() < 1e-9,
            (None, None) => true,
            _ => false,
        };
        CaseReport {
            map: map.to_string(),
            bucket: route.bucket,
            start: route.start,
            goal: route.goal,
            optimal_length: route.optimal_length,
            jps,
            a_star,
            costs_match,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub cases: Vec<CaseReport>,
}

impl Report {
    pub fn mismatches(&self) -> usize {
        self.cases.iter().filter(|case| !case.costs_match).count()
    }

    pub fn write_json(&self, path: &str) -> Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        info!("wrote {} cases to {path}", self.cases.len());
        Ok(())
    }
}
