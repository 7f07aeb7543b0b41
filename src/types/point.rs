//! 2D point used for all document coordinates.

use std::fmt;

/// A 2D point in document coordinates (inches unless noted otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Origin point.
    pub const ZERO: Point = Point::new(0.0, 0.0);

    /// Return this point translated by `(dx, dy)`.
    pub fn move_by(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Return this point rotated by `rotation` radians about `center`.
    pub fn rotate(&self, rotation: f64, center: &Point) -> Point {
        let (sin, cos) = rotation.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            dx * cos - dy * sin + center.x,
            dy * cos + dx * sin + center.y,
        )
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
