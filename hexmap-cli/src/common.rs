//! Shared arguments and helpers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hexmap_core::{Cell, Coordinate, Grid, MapConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Where the grid comes from: a map file, or a plain grid of some radius
#[derive(Args)]
pub struct MapArgs {
    /// Map configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Radius of a plain grid (ignored with --map)
    #[arg(long, default_value = "5")]
    pub radius: u32,
}

impl MapArgs {
    pub fn load(&self) -> Result<(MapConfig, Grid)> {
        let config = match &self.map {
            Some(path) => MapConfig::load(path)
                .with_context(|| format!("Failed to load map: {}", path.display()))?,
            None => MapConfig::new("plain", self.radius),
        };

        let grid = config
            .build()
            .with_context(|| format!("Invalid map '{}'", config.name))?;

        tracing::info!(
            "Loaded map '{}' (radius {}, {} cells)",
            config.name,
            grid.radius(),
            grid.len()
        );

        Ok((config, grid))
    }
}

/// Look up a cell the user asked for, failing with a readable message
pub fn require_cell(grid: &Grid, at: Coordinate) -> Result<&Cell> {
    grid.cell(at)
        .with_context(|| format!("{} is outside the map (radius {})", at, grid.radius()))
}

/// Create RNG from optional seed
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub fn coordinate_list(cells: &[&Cell]) -> Vec<Coordinate> {
    cells.iter().map(|cell| cell.coordinate()).collect()
}

pub fn format_cells(cells: &[&Cell]) -> String {
    cells
        .iter()
        .map(|cell| cell.coordinate().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
