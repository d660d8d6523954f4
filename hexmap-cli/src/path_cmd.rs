//! Path command - cheapest path between two cells
//!
//! - Level 1: run() - orchestration
//! - Level 2: report_route() - output

use anyhow::Result;
use clap::Args;

use hexmap_core::{Coordinate, Grid, Route};

use crate::common::{coordinate_list, format_cells, require_cell, MapArgs};

#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Start cell as x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub from: Coordinate,

    /// End cell as x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub to: Coordinate,

    /// Maximum total path cost
    #[arg(long)]
    pub max_cost: Option<f64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run path command
pub fn run(args: PathArgs) -> Result<()> {
    let (_, grid) = args.map.load()?;
    let start = require_cell(&grid, args.from)?;
    let end = require_cell(&grid, args.to)?;
    let max_cost = args.max_cost.unwrap_or(f64::INFINITY);

    tracing::info!("Searching {} -> {} (max cost {})", args.from, args.to, max_cost);

    let route = grid.find_route(start, end, max_cost);
    if route.is_none() {
        tracing::warn!("No path from {} to {}", args.from, args.to);
    }

    report_route(&grid, route.as_ref(), &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - OUTPUT
// ============================================================================

fn report_route(grid: &Grid, route: Option<&Route<'_>>, args: &PathArgs) {
    if args.json {
        let value = match route {
            Some(route) => serde_json::json!({
                "found": true,
                "cost": route.cost,
                "cells": coordinate_list(&route.cells),
            }),
            None => serde_json::json!({ "found": false }),
        };
        println!("{}", value);
        return;
    }

    match route {
        Some(route) => {
            let start = route.cells[0];
            let end = route.cells[route.cells.len() - 1];
            println!(
                "Path: {} steps (distance {}), cost {:.2}",
                route.cells.len() - 1,
                Grid::distance(start, end),
                route.cost
            );
            println!("{}", format_cells(&route.cells));
        }
        None => println!("No path (grid radius {})", grid.radius()),
    }
}
