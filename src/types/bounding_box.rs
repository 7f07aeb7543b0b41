//! Oriented bounding box decomposition.
//!
//! The drawing format stores object placement as a 4-point quadrilateral in
//! traversal order.  [`BoundingBox`] recovers an axis-aligned rectangle plus
//! a rotation and two mirror flags from any orientation the file encodes.

use crate::error::{Result, ZmfError};
use crate::types::{almost_zero, Point};

/// An oriented rectangle: the original 4-point polygon plus derived center,
/// dimensions, rotation, and mirror flags.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    points: Vec<Point>,
    width: f64,
    height: f64,
    center: Point,
    rotation: f64,
    p1_quadrant: i32,
    p2_quadrant: i32,
    mirror_horizontal: bool,
    mirror_vertical: bool,
}

impl BoundingBox {
    /// Decompose a 4-point quadrilateral.
    ///
    /// Fails unless exactly 4 points are supplied.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        use std::f64::consts::PI;

        if points.len() != 4 {
            return Err(ZmfError::Parse(format!(
                "bounding box requires 4 points, got {}",
                points.len()
            )));
        }

        if points.iter().skip(1).all(|p| *p == points[0]) {
            return Err(ZmfError::Parse(
                "degenerate bounding box: all points coincide".to_string(),
            ));
        }

        // Rectangle center is the middle point of the diagonal.
        let center = Point::new(
            (points[0].x + points[2].x) / 2.0,
            (points[0].y + points[2].y) / 2.0,
        );

        let mut rotation = (points[1].y - points[0].y).atan2(points[1].x - points[0].x);
        if rotation < 0.0 {
            rotation += 2.0 * PI;
        }

        let original_points: Vec<Point> = if almost_zero(rotation) {
            points.clone()
        } else {
            points.iter().map(|p| p.rotate(-rotation, &center)).collect()
        };

        let dist1 = points[0].distance(&points[1]);
        let dist2 = points[0].distance(&points[3]);

        let (width, height) = if (original_points[0].x - original_points[1].x).abs()
            > (original_points[0].x - original_points[3].x).abs()
        {
            (dist1, dist2)
        } else {
            (dist2, dist1)
        };

        let p1_quadrant = quadrant(&original_points[0], &center);
        let p2_quadrant = quadrant(&original_points[1], &center);

        if p1_quadrant == 1 || p1_quadrant == 4 {
            rotation -= PI;
        }
        if rotation < 0.0 {
            rotation += 2.0 * PI;
        }

        Ok(BoundingBox {
            points,
            width,
            height,
            center,
            rotation,
            p1_quadrant,
            p2_quadrant,
            mirror_horizontal: p1_quadrant == 1 || p1_quadrant == 4,
            mirror_vertical: p1_quadrant == 3 || p1_quadrant == 4,
        })
    }

    /// The original corner points in traversal order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Top-left corner of the axis-aligned rectangle.
    pub fn top_left(&self) -> Point {
        self.center.move_by(-self.width / 2.0, -self.height / 2.0)
    }

    /// Rotation in radians, normalized into [0, 2π).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn p1_quadrant(&self) -> i32 {
        self.p1_quadrant
    }

    pub fn p2_quadrant(&self) -> i32 {
        self.p2_quadrant
    }

    pub fn mirror_horizontal(&self) -> bool {
        self.mirror_horizontal
    }

    pub fn mirror_vertical(&self) -> bool {
        self.mirror_vertical
    }
}

/// Quadrant of `p` relative to `center`: 1 = upper right, 2 = upper left,
/// 3 = lower left, 4 = lower right (y grows downward).
fn quadrant(p: &Point, center: &Point) -> i32 {
    if p.x > center.x {
        if p.y < center.y {
            1
        } else {
            4
        }
    } else if p.y < center.y {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(points: &[(f64, f64)]) -> BoundingBox {
        BoundingBox::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn test_wrong_point_count_fails() {
        assert!(BoundingBox::new(vec![Point::ZERO; 3]).is_err());
        assert!(BoundingBox::new(vec![Point::ZERO; 5]).is_err());
    }

    #[test]
    fn test_identical_points_fail() {
        assert!(BoundingBox::new(vec![Point::new(2.0, 3.0); 4]).is_err());
    }

    #[test]
    fn test_axis_aligned() {
        let b = bbox(&[(10.0, 10.0), (12.0, 10.0), (12.0, 12.0), (10.0, 12.0)]);
        assert!((b.width() - 2.0).abs() < 1e-12);
        assert!((b.height() - 2.0).abs() < 1e-12);
        assert_eq!(b.center(), Point::new(11.0, 11.0));
        assert!(almost_zero(b.rotation()));
        assert!(!b.mirror_horizontal());
        assert!(!b.mirror_vertical());
    }

    #[test]
    fn test_quadrants() {
        // Quadrants are computed after reversing the rotation, so the first
        // point never lands on the right side for these axis-aligned boxes.
        let cases = [
            (
                [(10.0, 10.0), (12.0, 10.0), (12.0, 12.0), (10.0, 12.0)],
                2,
                1,
            ),
            (
                [(10.0, 12.0), (12.0, 12.0), (12.0, 10.0), (10.0, 10.0)],
                3,
                4,
            ),
            (
                [(10.0, 10.0), (14.0, 10.0), (14.0, 12.0), (10.0, 12.0)],
                2,
                1,
            ),
            (
                [(10.0, 10.0), (12.0, 10.0), (12.0, 14.0), (10.0, 14.0)],
                2,
                1,
            ),
        ];

        for (points, p1, p2) in cases {
            let b = bbox(&points);
            assert_eq!(b.p1_quadrant(), p1);
            assert_eq!(b.p2_quadrant(), p2);
        }
    }

    #[test]
    fn test_vertical_mirror_flags() {
        let b = bbox(&[(10.0, 12.0), (12.0, 12.0), (12.0, 10.0), (10.0, 10.0)]);
        assert!(b.mirror_vertical());
        assert!(!b.mirror_horizontal());
    }

    #[test]
    fn test_wider_than_tall() {
        let b = bbox(&[(10.0, 10.0), (14.0, 10.0), (14.0, 12.0), (10.0, 12.0)]);
        assert!((b.width() - 4.0).abs() < 1e-12);
        assert!((b.height() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_left() {
        let b = bbox(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
        let tl = b.top_left();
        assert!((tl.x - 1.0).abs() < 1e-12);
        assert!((tl.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_square() {
        // Square rotated 90 degrees: p0 at top, traversal continues clockwise.
        let b = bbox(&[(1.0, 0.0), (1.0, 2.0), (-1.0, 2.0), (-1.0, 0.0)]);
        assert!((b.width() - 2.0).abs() < 1e-12);
        assert!((b.height() - 2.0).abs() < 1e-12);
        assert_eq!(b.center(), Point::new(0.0, 1.0));
    }
}
