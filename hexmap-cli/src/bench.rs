//! Bench command - random path queries in parallel over one shared grid
//!
//! - Level 1: run() - orchestration
//! - Level 2: sample_queries(), run_queries(), report_results()

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use rand::Rng;
use rayon::prelude::*;

use hexmap_core::{Cell, Grid};

use crate::common::{create_rng, MapArgs};

#[derive(Args)]
pub struct BenchArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Number of path queries
    #[arg(long, default_value = "1000")]
    pub queries: usize,

    /// Maximum total path cost per query
    #[arg(long)]
    pub max_cost: Option<f64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated query results
#[derive(Clone, Debug)]
struct BenchResults {
    queries: usize,
    found: usize,
    avg_cost: f64,
    avg_length: f64,
    total_time: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: BenchArgs, seed: Option<u64>) -> Result<()> {
    let (config, grid) = args.map.load()?;
    if grid.is_empty() {
        bail!("Map '{}' has no cells", config.name);
    }

    tracing::info!("Starting benchmark: {} queries on '{}'", args.queries, config.name);

    let queries = sample_queries(&grid, args.queries, seed);
    let results = run_queries(&grid, &queries, args.max_cost.unwrap_or(f64::INFINITY));

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Pick random (start, end) pairs up front so the timed part is search only
fn sample_queries(grid: &Grid, count: usize, seed: Option<u64>) -> Vec<(&Cell, &Cell)> {
    let mut rng = create_rng(seed);
    let cells: Vec<&Cell> = grid.cells().collect();
    (0..count)
        .map(|_| {
            let a = cells[rng.gen_range(0..cells.len())];
            let b = cells[rng.gen_range(0..cells.len())];
            (a, b)
        })
        .collect()
}

/// Grid is only read here, so queries share it across threads
fn run_queries(grid: &Grid, queries: &[(&Cell, &Cell)], max_cost: f64) -> BenchResults {
    let start = Instant::now();

    let routes: Vec<Option<(f64, usize)>> = queries
        .par_iter()
        .map(|&(a, b)| {
            grid.find_route(a, b, max_cost)
                .map(|route| (route.cost, route.cells.len()))
        })
        .collect();

    let total_time = start.elapsed();
    let found: Vec<(f64, usize)> = routes.into_iter().flatten().collect();
    let n = found.len().max(1) as f64;

    BenchResults {
        queries: queries.len(),
        found: found.len(),
        avg_cost: found.iter().map(|(cost, _)| cost).sum::<f64>() / n,
        avg_length: found.iter().map(|&(_, len)| len as f64).sum::<f64>() / n,
        total_time,
    }
}

fn report_results(results: &BenchResults, args: &BenchArgs) {
    let per_query = results.total_time.as_secs_f64() * 1e6 / results.queries.max(1) as f64;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "queries": results.queries,
                "found": results.found,
                "avg_cost": results.avg_cost,
                "avg_length": results.avg_length,
                "total_ms": results.total_time.as_secs_f64() * 1000.0,
                "us_per_query": per_query,
            })
        );
        return;
    }

    println!("Queries:      {}", results.queries);
    println!("Paths found:  {}", results.found);
    println!("Avg cost:     {:.2}", results.avg_cost);
    println!("Avg length:   {:.2}", results.avg_length);
    println!("Total time:   {:.2?}", results.total_time);
    println!("Per query:    {:.1} us", per_query);
}
