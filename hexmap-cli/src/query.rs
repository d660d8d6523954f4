//! Line and range queries

use anyhow::Result;
use clap::Args;

use hexmap_core::Coordinate;

use crate::common::{coordinate_list, format_cells, require_cell, MapArgs};

#[derive(Args)]
pub struct LineArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Start cell as x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub from: Coordinate,

    /// End cell as x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub to: Coordinate,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RangeArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Center cell as x,y,z
    #[arg(long, allow_hyphen_values = true)]
    pub center: Coordinate,

    /// Maximum distance from the center
    #[arg(long, default_value = "1")]
    pub distance: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_line(args: LineArgs) -> Result<()> {
    let (_, grid) = args.map.load()?;
    let start = require_cell(&grid, args.from)?;
    let end = require_cell(&grid, args.to)?;

    let line = grid.line(start, end);

    if args.json {
        println!("{}", serde_json::json!({ "cells": coordinate_list(&line) }));
    } else {
        println!("Line: {} cells", line.len());
        println!("{}", format_cells(&line));
    }

    Ok(())
}

pub fn run_range(args: RangeArgs) -> Result<()> {
    let (_, grid) = args.map.load()?;
    let center = require_cell(&grid, args.center)?;

    let cells = grid.cells_in_range(center, args.distance);
    let passable = cells.iter().filter(|cell| cell.is_passable()).count();

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "cells": coordinate_list(&cells),
                "passable": passable,
            })
        );
    } else {
        println!(
            "Range {} around {}: {} cells ({} passable)",
            args.distance,
            args.center,
            cells.len(),
            passable
        );
        for cell in &cells {
            println!("  {} {:?} cost {}", cell.coordinate(), cell.terrain(), cell.movement_cost());
        }
    }

    Ok(())
}
