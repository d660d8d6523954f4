//! Error types for map construction

use crate::coord::Coordinate;

/// Errors raised while building coordinates, cells, or grids
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("Invalid hex coordinates: {x}, {y}, {z} (sum must be 0)")]
    InvalidCoordinate { x: i32, y: i32, z: i32 },

    #[error("Malformed coordinate: {0:?} (expected x,y,z)")]
    MalformedCoordinate(String),

    #[error("Invalid movement cost: {0} (must be non-negative)")]
    InvalidMovementCost(f64),

    #[error("Coordinate {coordinate} is outside a grid of radius {radius}")]
    OutOfBounds { coordinate: Coordinate, radius: u32 },
}
