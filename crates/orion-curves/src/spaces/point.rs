//! Grid points.

use serde::{Deserialize, Serialize};

/// A point of an N-dimensional discrete space: N coordinates and one
/// function value.
pub trait Point {
    /// Number of coordinates.
    fn dimension(&self) -> usize;

    /// Coordinate `i`, or `None` past the dimension.
    fn coordinate(&self, i: usize) -> Option<f64>;

    /// The function value at this point.
    fn value(&self) -> f64;
}

/// A point on a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point1D {
    /// Coordinate, typically a time in years.
    pub x: f64,
    /// Function value.
    pub value: f64,
}

impl Point1D {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, value: f64) -> Self {
        Self { x, value }
    }
}

/// A point on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// First coordinate (rows, e.g. expiry).
    pub x: f64,
    /// Second coordinate (columns, e.g. strike or tenor).
    pub y: f64,
    /// Function value.
    pub value: f64,
}

impl Point2D {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// A point in a cube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// First coordinate.
    pub x: f64,
    /// Second coordinate.
    pub y: f64,
    /// Third coordinate.
    pub z: f64,
    /// Function value.
    pub value: f64,
}

impl Point3D {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, value: f64) -> Self {
        Self { x, y, z, value }
    }
}

impl Point for Point1D {
    fn dimension(&self) -> usize {
        1
    }

    fn coordinate(&self, i: usize) -> Option<f64> {
        (i == 0).then_some(self.x)
    }

    fn value(&self) -> f64 {
        self.value
    }
}

impl Point for Point2D {
    fn dimension(&self) -> usize {
        2
    }

    fn coordinate(&self, i: usize) -> Option<f64> {
        match i {
            0 => Some(self.x),
            1 => Some(self.y),
            _ => None,
        }
    }

    fn value(&self) -> f64 {
        self.value
    }
}

impl Point for Point3D {
    fn dimension(&self) -> usize {
        3
    }

    fn coordinate(&self, i: usize) -> Option<f64> {
        match i {
            0 => Some(self.x),
            1 => Some(self.y),
            2 => Some(self.z),
            _ => None,
        }
    }

    fn value(&self) -> f64 {
        self.value
    }
}
