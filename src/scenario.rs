use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{debug, info};

use crate::common::{Cell, SearchError};
use crate::map::Map;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Route {
    pub bucket: usize,
    pub start: Cell,
    pub goal: Cell,
    pub optimal_length: f64,
}

impl Route {
    /// Both endpoints must be valid search endpoints on `map`.
    pub fn verify(&self, map: &Map) -> Result<(), SearchError> {
        map.check_endpoint(self.start)?;
        map.check_endpoint(self.goal)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Scenario {
    pub map: String,
    pub map_width: usize,
    pub map_height: usize,
    pub routes: Vec<Route>,
}

impl Scenario {
    pub fn load_from_scen(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("cannot open scenario {path}"))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // First line is "version x.x" which we can skip
        let _version = lines
            .next()
            .ok_or_else(|| anyhow!("{path}: empty scenario file"))??;

        let mut scenario = Scenario {
            map: String::new(),
            map_width: 0,
            map_height: 0,
            routes: Vec::new(),
        };

        for (index, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            let route = parse_route(&parts)
                .with_context(|| format!("{path}: bad route on line {}", index + 2))?;

            if scenario.map.is_empty() {
                // Initialize map details from the first route entry
                scenario.map = parts[1].to_string();
                scenario.map_width = parts[2].parse()?;
                scenario.map_height = parts[3].parse()?;
            }

            scenario.routes.push(route);
        }

        debug!("loaded {} routes from {path}", scenario.routes.len());
        Ok(scenario)
    }

    /// Whether the dimensions listed in the scenario agree with `map`.
    pub fn matches_map(&self, map: &Map) -> bool {
        self.map_width == map.width && self.map_height == map.height
    }

    /// The first `num_cases` routes, or a seeded random sample of them.
    pub fn select<R: Rng + ?Sized>(&self, num_cases: usize, shuffle: bool, rng: &mut R) -> Vec<Route> {
        let routes = if shuffle {
            self.routes
                .choose_multiple(rng, num_cases)
                .cloned()
                .collect::<Vec<_>>()
        } else {
            self.routes.iter().take(num_cases).cloned().collect()
        };
        info!("selected {} of {} routes", routes.len(), self.routes.len());
        routes
    }
}

// Columns: bucket map width height start_x start_y goal_x goal_y optimal_length.
// Cells are (row, column), so x and y swap.
fn parse_route(parts: &[&str]) -> Result<Route> {
    if parts.len() < 9 {
        return Err(anyhow!("expected 9 columns, got {}", parts.len()));
    }
    let coordinate = |index: usize| -> Result<isize> {
        parts[index]
            .parse::<isize>()
            .with_context(|| format!("invalid coordinate {:?}", parts[index]))
    };

    Ok(Route {
        bucket: parts[0].parse()?,
        start: (coordinate(5)?, coordinate(4)?),
        goal: (coordinate(7)?, coordinate(6)?),
        optimal_length: parts[8].parse()?,
    })
}
