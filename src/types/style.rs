//! Styling model: curves, pens, fills, transparencies, and shadows.

use std::sync::Arc;

use crate::types::{Color, Image, Point};

/// How a curve section consumes points.
///
/// A `Line` consumes 1 point, a `BezierCurve` consumes 3 (two control
/// points and the end point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    Line,
    BezierCurve,
}

/// A polyline-with-Beziers: an ordered point sequence partitioned into
/// sections, with a closed flag.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    pub points: Vec<Point>,
    pub section_types: Vec<CurveType>,
    pub closed: bool,
}

/// Line cap style of a pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCapType {
    #[default]
    Butt,
    Flat,
    Round,
    Pointed,
}

/// Line join style of a pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoinType {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// A line-end marker shape.
///
/// Arrows are shared: multiple pens may reference the same arrow by id.
#[derive(Debug, Clone, Default)]
pub struct Arrow {
    pub curves: Vec<Curve>,
    pub line_end_x: f64,
}

/// Shared handle to an [`Arrow`].
pub type ArrowRef = Arc<Arrow>;

/// Stroke properties.
#[derive(Debug, Clone, Default)]
pub struct Pen {
    pub color: Color,
    /// Stroke width in inches.
    pub width: f64,
    pub line_cap_type: LineCapType,
    pub line_join_type: LineJoinType,
    pub dash_pattern: Vec<f64>,
    pub dash_distance: f64,
    pub start_arrow: Option<ArrowRef>,
    pub end_arrow: Option<ArrowRef>,
    pub is_invisible: bool,
}

impl Pen {
    /// Create a solid pen of the given color.
    pub fn new(color: Color) -> Self {
        Pen {
            color,
            ..Default::default()
        }
    }
}

/// One color stop of a gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientStop {
    pub color: Color,
    /// Position within the gradient, in [0, 1].
    pub offset: f64,
}

/// Gradient shape subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
    Conical,
    Cross,
    Rectangular,
    Flexible,
}

/// A multi-stop gradient fill.
#[derive(Debug, Clone)]
pub struct Gradient {
    pub gradient_type: GradientType,
    pub stops: Vec<GradientStop>,
    pub angle: f64,
    pub center: Point,
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            gradient_type: GradientType::default(),
            stops: Vec::new(),
            angle: 0.0,
            center: Point::new(0.5, 0.5),
        }
    }
}

/// A bitmap fill, tiled or stretched.
#[derive(Debug, Clone, Default)]
pub struct ImageFill {
    pub image: Image,
    pub tile: bool,
    /// Tile size in inches.
    pub tile_width: f64,
    pub tile_height: f64,
}

/// Area fill of a shape.
#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Color),
    Gradient(Gradient),
    Image(ImageFill),
}

/// Opacity carried as a color: the red channel encodes transparency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transparency {
    pub color: Color,
}

impl Transparency {
    /// Opacity in [0, 1], derived from the red channel.
    pub fn opacity(&self) -> f64 {
        1.0 - f64::from(self.color.red) / 255.0
    }
}

/// Drop shadow properties.
#[derive(Debug, Clone, Copy)]
pub struct Shadow {
    pub offset: Point,
    pub angle: f64,
    /// Opacity in [0, 1].
    pub opacity: f64,
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Shadow {
            offset: Point::ZERO,
            angle: 0.0,
            opacity: 1.0,
            color: Color::default(),
        }
    }
}

/// The resolved style of one shape, re-created per shape from the parser's
/// reference tables.
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub pen: Option<Pen>,
    pub fill: Option<Fill>,
    pub transparency: Option<Transparency>,
    pub shadow: Option<Shadow>,
}
