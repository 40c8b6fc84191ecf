use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::algorithm::{a_star_with_limit, jps_with_limit};
use crate::config::Config;
use crate::map::Map;
use crate::render::{Canvas, Palette};
use crate::scenario::{Route, Scenario};
use crate::stat::{CaseReport, Report, Stats};

/// Runs both searches over every selected case of every configured map.
pub fn run(config: &Config) -> Result<Report> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut report = Report::default();

    for map_path in &config.maps {
        run_map(config, map_path, &mut rng, &mut report)
            .with_context(|| format!("error with map: {map_path}"))?;
    }

    if report.mismatches() > 0 {
        warn!("{} cases where JPS and A* disagree", report.mismatches());
    }
    if let Some(results_path) = &config.results_path {
        report.write_json(results_path)?;
    }
    Ok(report)
}

#[instrument(skip_all, fields(map = map_path))]
fn run_map(config: &Config, map_path: &str, rng: &mut StdRng, report: &mut Report) -> Result<()> {
    let map = Map::from_file(map_path)?;
    let scenario = Scenario::load_from_scen(&Config::scenario_path(map_path))?;
    info!("Looking at {map_path} ({}x{})", map.height, map.width);
    if !scenario.matches_map(&map) {
        warn!(
            "scenario expects a {}x{} map, {map_path} is {}x{}",
            scenario.map_height, scenario.map_width, map.height, map.width
        );
    }

    let palette = Palette::new(rng);
    let mut canvas = Canvas::new(&map, &palette);

    for route in scenario.select(config.cases, config.shuffle, rng) {
        if let Err(err) = route.verify(&map) {
            warn!("skipping route {route:?}: {err}");
            continue;
        }
        let case = run_case(&map, map_path, &route, config.max_expansions, &mut canvas)?;
        report.cases.push(case);
    }

    if config.render {
        canvas.save(&image_path(&config.output_dir, map_path))?;
    }
    Ok(())
}

fn run_case(
    map: &Map,
    map_name: &str,
    route: &Route,
    max_expansions: Option<usize>,
    canvas: &mut Canvas,
) -> Result<CaseReport> {
    info!("New case, start: {:?} goal: {:?}", route.start, route.goal);

    let timer = Instant::now();
    let jps_result = jps_with_limit(map, route.start, route.goal, max_expansions)?;
    let (jps_stats, jps_path) = Stats::from_result("JPS", map, &jps_result, timer.elapsed(), true);
    jps_stats.print();

    let timer = Instant::now();
    let a_star_result = a_star_with_limit(map, route.start, route.goal, max_expansions)?;
    let (a_star_stats, a_star_path) =
        Stats::from_result("A*", map, &a_star_result, timer.elapsed(), false);
    a_star_stats.print();

    if let Some(path) = &jps_path {
        canvas.draw_jps(path);
    }
    if let Some(path) = &a_star_path {
        canvas.draw_a_star(path);
    }

    let case = CaseReport::new(map_name, route, jps_stats, a_star_stats);
    if !case.costs_match {
        warn!(
            "cost mismatch from {:?} to {:?}: JPS {:?} A* {:?}",
            route.start,
            route.goal,
            case.jps.total_cost(),
            case.a_star.total_cost()
        );
    }
    Ok(case)
}

fn image_path(output_dir: &str, map_path: &str) -> PathBuf {
    let stem = Path::new(map_path)
        .file_stem()
        .map_or_else(|| "map".into(), |stem| stem.to_string_lossy());
    Path::new(output_dir).join(format!("{stem}_paths.png"))
}
