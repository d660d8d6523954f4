//! Map cells and their movement cost

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;
use crate::error::MapError;

/// Terrain type of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Plains,
    Desert,
    Forest,
    Water,
    Mountains,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Plains,
        Terrain::Desert,
        Terrain::Forest,
        Terrain::Water,
        Terrain::Mountains,
    ];

    /// Base cost of entering a cell of this terrain
    pub fn movement_cost(self) -> f64 {
        match self {
            Terrain::Plains => 1.0,
            Terrain::Desert => 1.2,
            Terrain::Forest => 1.5,
            Terrain::Water => 1.5,
            Terrain::Mountains => 2.0,
        }
    }
}

/// A single hex on the map
///
/// Equality and hashing go through the coordinate only: two cells at the
/// same coordinate are the same graph node whatever their cost.
#[derive(Clone, Debug)]
pub struct Cell {
    coordinate: Coordinate,
    terrain: Terrain,
    /// Explicit cost, takes precedence over terrain when set
    cost_override: Option<f64>,
}

impl Cell {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            terrain: Terrain::default(),
            cost_override: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
    }

    /// Cost of entering this cell; `f64::INFINITY` means impassable
    pub fn movement_cost(&self) -> f64 {
        self.cost_override.unwrap_or_else(|| self.terrain.movement_cost())
    }

    /// Override the terrain cost. Accepts any non-negative value including infinity.
    pub fn set_movement_cost(&mut self, cost: f64) -> Result<(), MapError> {
        if cost.is_nan() || cost < 0.0 {
            return Err(MapError::InvalidMovementCost(cost));
        }
        self.cost_override = Some(cost);
        Ok(())
    }

    pub fn set_impassable(&mut self) {
        self.cost_override = Some(f64::INFINITY);
    }

    /// Drop any override and fall back to the terrain cost
    pub fn clear_movement_cost(&mut self) {
        self.cost_override = None;
    }

    pub fn is_passable(&self) -> bool {
        self.movement_cost().is_finite()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate.hash(state);
    }
}
