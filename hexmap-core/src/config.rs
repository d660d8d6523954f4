//! MapConfig - grid description loadable from JSON

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Terrain};
use crate::coord::Coordinate;
use crate::error::MapError;
use crate::grid::Grid;
use crate::pathfinding::TieBreak;

/// Terrain assignment for one cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub at: Coordinate,
    pub terrain: Terrain,
}

/// Finite cost override for one cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostOverride {
    pub at: Coordinate,
    pub cost: f64,
}

/// Map description: size plus per-cell terrain and cost overrides
///
/// JSON has no infinity, so impassable cells get their own list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub radius: u32,
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default)]
    pub terrain: Vec<TerrainPatch>,
    #[serde(default)]
    pub costs: Vec<CostOverride>,
    #[serde(default)]
    pub impassable: Vec<Coordinate>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

impl MapConfig {
    /// Plain map of the given radius, no overrides
    pub fn new(name: &str, radius: u32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            tie_break: TieBreak::default(),
            terrain: Vec::new(),
            costs: Vec::new(),
            impassable: Vec::new(),
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MapConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the grid, applying terrain first, then costs, then impassable cells
    pub fn build(&self) -> Result<Grid, MapError> {
        let mut grid = Grid::generate(self.radius).with_tie_break(self.tie_break);

        for patch in &self.terrain {
            self.cell_mut(&mut grid, patch.at)?.set_terrain(patch.terrain);
        }
        for over in &self.costs {
            self.cell_mut(&mut grid, over.at)?.set_movement_cost(over.cost)?;
        }
        for &at in &self.impassable {
            self.cell_mut(&mut grid, at)?.set_impassable();
        }

        tracing::debug!(
            "Built map '{}': radius {}, {} terrain, {} costs, {} impassable",
            self.name,
            self.radius,
            self.terrain.len(),
            self.costs.len(),
            self.impassable.len()
        );

        Ok(grid)
    }

    fn cell_mut<'g>(&self, grid: &'g mut Grid, at: Coordinate) -> Result<&'g mut Cell, MapError> {
        grid.cell_mut(at).ok_or(MapError::OutOfBounds {
            coordinate: at,
            radius: self.radius,
        })
    }

    /// Random terrain scattered over a map of the given radius
    ///
    /// Roughly half the cells stay plains; `blocked` of every hundred become
    /// impassable. The origin is always left open.
    pub fn random<R: Rng>(rng: &mut R, name: &str, radius: u32, blocked: u32) -> Self {
        let mut config = Self::new(name, radius);

        for at in Coordinate::ORIGIN.range(radius) {
            if at == Coordinate::ORIGIN {
                continue;
            }
            let roll = rng.gen_range(0..100u32);
            if roll < blocked {
                config.impassable.push(at);
            } else if rng.gen_bool(0.5) {
                // Skip plains, index 0, which is the default
                let terrain = Terrain::ALL[rng.gen_range(1..Terrain::ALL.len())];
                config.terrain.push(TerrainPatch { at, terrain });
            }
        }

        config
    }
}
