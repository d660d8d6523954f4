//! Hex geometry with cube coordinates

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Cube hex coordinates (x + y + z == 0)
///
/// Fields are private so a coordinate can only come out of a validated
/// constructor or out of arithmetic on already-valid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[i32; 3]", into = "[i32; 3]")]
pub struct Coordinate {
    x: i32,
    y: i32,
    z: i32,
}

/// Direction vectors in cube coordinates (dx, dy, dz)
///
/// The order is fixed: neighbor lists and search tie-breaks depend on it.
pub const DIRECTIONS: [Coordinate; 6] = [
    Coordinate::raw(1, -1, 0),
    Coordinate::raw(1, 0, -1),
    Coordinate::raw(0, 1, -1),
    Coordinate::raw(-1, 1, 0),
    Coordinate::raw(-1, 0, 1),
    Coordinate::raw(0, -1, 1),
];

impl Coordinate {
    /// Center of the map
    pub const ORIGIN: Coordinate = Coordinate::raw(0, 0, 0);

    /// Create a coordinate, failing when the components do not sum to zero
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, MapError> {
        if x as i64 + y as i64 + z as i64 != 0 {
            return Err(MapError::InvalidCoordinate { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Build from axial (q, r); the third axis is implied, so this cannot fail
    pub const fn from_axial(q: i32, r: i32) -> Self {
        Self::raw(q, r, -q - r)
    }

    // Callers guarantee x + y + z == 0.
    const fn raw(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Hex distance: max(|dx|, |dy|, |dz|)
    pub fn distance(&self, other: Coordinate) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }

    /// Distance from the origin
    pub fn length(&self) -> u32 {
        self.distance(Self::ORIGIN)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Coordinate {
        *self + DIRECTIONS[direction % 6]
    }

    /// All six neighbors in direction order
    pub fn neighbors(&self) -> impl Iterator<Item = Coordinate> + '_ {
        DIRECTIONS.iter().map(move |&dir| *self + dir)
    }

    /// Multiply every component by `k` (still sums to zero)
    pub fn scale(&self, k: i32) -> Coordinate {
        Self::raw(self.x * k, self.y * k, self.z * k)
    }

    /// Round fractional cube coordinates to the nearest valid hex
    ///
    /// The component with the largest rounding error is recomputed from the
    /// other two, so the result always satisfies the zero-sum invariant.
    pub fn round(fx: f64, fy: f64, fz: f64) -> Coordinate {
        let mut rx = fx.round();
        let mut ry = fy.round();
        let mut rz = fz.round();

        let x_diff = (rx - fx).abs();
        let y_diff = (ry - fy).abs();
        let z_diff = (rz - fz).abs();

        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff > z_diff {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self::raw(rx as i32, ry as i32, rz as i32)
    }

    /// Linear interpolation in cube space, unrounded
    pub fn lerp(&self, other: Coordinate, t: f64) -> (f64, f64, f64) {
        let lerp = |a: i32, b: i32| a as f64 + (b - a) as f64 * t;
        (
            lerp(self.x, other.x),
            lerp(self.y, other.y),
            lerp(self.z, other.z),
        )
    }

    /// Every coordinate at exactly `radius` steps, walking the ring in direction order
    ///
    /// A ring of radius 0 is the coordinate itself. Positions that would fall
    /// outside the `i32` range are skipped.
    pub fn ring(self, radius: u32) -> impl Iterator<Item = Coordinate> {
        let r = i64::from(radius);
        let center = (radius == 0).then_some(self);
        center.into_iter().chain((0..6).flat_map(move |side| {
            // Corner of the hexagon where this side starts
            let corner = DIRECTIONS[(side + 4) % 6];
            let dir = DIRECTIONS[side];
            (0..r).filter_map(move |step| {
                let dx = i64::from(corner.x) * r + i64::from(dir.x) * step;
                let dy = i64::from(corner.y) * r + i64::from(dir.y) * step;
                self.offset(dx, dy)
            })
        }))
    }

    /// Every coordinate within `radius` steps (the filled hexagon)
    ///
    /// Positions that would fall outside the `i32` range are skipped.
    pub fn range(self, radius: u32) -> impl Iterator<Item = Coordinate> {
        let r = i64::from(radius);
        (-r..=r).flat_map(move |dx| {
            let lo = (-r).max(-dx - r);
            let hi = r.min(-dx + r);
            (lo..=hi).filter_map(move |dy| self.offset(dx, dy))
        })
    }

    // z follows from dx and dy, so the sum stays zero.
    fn offset(self, dx: i64, dy: i64) -> Option<Coordinate> {
        let x = i32::try_from(i64::from(self.x) + dx).ok()?;
        let y = i32::try_from(i64::from(self.y) + dy).ok()?;
        let z = i32::try_from(i64::from(self.z) - dx - dy).ok()?;
        Some(Self::raw(x, y, z))
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Self::raw(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Self::raw(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    fn neg(self) -> Coordinate {
        Self::raw(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Parses `x,y,z`, optionally wrapped in parentheses
impl FromStr for Coordinate {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MapError::MalformedCoordinate(s.to_string());
        let inner = s.trim();
        let inner = inner
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(inner);

        let parts: Vec<i32> = inner
            .split(',')
            .map(|part| part.trim().parse::<i32>().map_err(|_| malformed()))
            .collect::<Result<_, _>>()?;

        match parts.as_slice() {
            &[x, y, z] => Coordinate::new(x, y, z),
            _ => Err(malformed()),
        }
    }
}

impl TryFrom<[i32; 3]> for Coordinate {
    type Error = MapError;

    fn try_from([x, y, z]: [i32; 3]) -> Result<Self, Self::Error> {
        Coordinate::new(x, y, z)
    }
}

impl From<Coordinate> for [i32; 3] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y, c.z]
    }
}
