//! Circle shape.

use super::{HitContext, InvalidShape, Rgb, ShapeKind, ShapeTrait, check_tessellation};
use crate::geometry::distance_to_circle_boundary;
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default number of segments used to tessellate a circle.
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 96;

/// Fewest segments a closed curve may be drawn with.
pub const MIN_TESSELLATION: u32 = 3;

/// A circle outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircle")]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub tessellation: u32,
    pub color: Rgb,
}

#[derive(Deserialize)]
struct RawCircle {
    center: Point,
    radius: f64,
    tessellation: u32,
    color: Rgb,
}

impl TryFrom<RawCircle> for Circle {
    type Error = InvalidShape;

    fn try_from(raw: RawCircle) -> Result<Self, Self::Error> {
        if raw.radius.is_nan() || raw.radius < 0.0 {
            return Err(InvalidShape::Radius(raw.radius));
        }
        Ok(Self {
            center: raw.center,
            radius: raw.radius,
            tessellation: check_tessellation(raw.tessellation)?,
            color: raw.color,
        })
    }
}

impl Circle {
    /// Create a circle. Negative radii are stored as their magnitude.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
            tessellation: DEFAULT_CIRCLE_SEGMENTS,
            color: Rgb::default(),
        }
    }

    pub fn with_tessellation(mut self, segments: u32) -> Self {
        self.tessellation = segments.max(MIN_TESSELLATION);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub(crate) fn read_fields(color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let center = reader.point("center")?;
        let radius = reader.number("radius")?;
        if radius < 0.0 {
            return Err(reader.malformed("negative radius"));
        }
        let tessellation = reader.tessellation()?;
        Ok(Self {
            center,
            radius,
            tessellation,
            color,
        })
    }
}

impl ShapeTrait for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, _ctx: &HitContext) -> f64 {
        distance_to_circle_boundary(point, self.center, self.radius)
    }

    fn snap_points(&self) -> Vec<Point> {
        vec![self.center]
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_circle(self.center, self.radius, self.tessellation, color);
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.center);
        out.number(self.radius);
        out.count(self.tessellation as usize);
    }
}
