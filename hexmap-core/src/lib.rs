//! HEXMAP Core - Hex map substrate for turn-based strategy
//!
//! This crate provides the map layer:
//! - Cube coordinates with the x + y + z == 0 invariant
//! - Cells carrying terrain and an overridable movement cost
//! - Bounded hexagonal grid with neighbor, distance, line and range queries
//! - A* path search with per-cell costs and a total-cost ceiling
//! - JSON map configuration

pub mod coord;
pub mod cell;
pub mod grid;
pub mod pathfinding;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use coord::{Coordinate, DIRECTIONS};
pub use cell::{Cell, Terrain};
pub use grid::Grid;
pub use pathfinding::{CellCost, CostModel, PathFinder, Route, TieBreak};
pub use config::{CostOverride, MapConfig, TerrainPatch};
pub use error::MapError;
