//! Ellipse shape.

use super::circle::MIN_TESSELLATION;
use super::{HitContext, InvalidShape, Rgb, ShapeKind, ShapeTrait, check_tessellation};
use crate::geometry::distance_to_ellipse;
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default number of segments used to tessellate an ellipse.
pub const DEFAULT_ELLIPSE_SEGMENTS: u32 = 128;

/// A rotated ellipse outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEllipse")]
pub struct Ellipse {
    pub center: Point,
    /// Semi-axis along the (unrotated) x direction.
    pub semi_axis_a: f64,
    /// Semi-axis along the (unrotated) y direction.
    pub semi_axis_b: f64,
    /// Rotation angle in radians (counter-clockwise, around center).
    pub rotation: f64,
    pub tessellation: u32,
    pub color: Rgb,
}

#[derive(Deserialize)]
struct RawEllipse {
    center: Point,
    semi_axis_a: f64,
    semi_axis_b: f64,
    rotation: f64,
    tessellation: u32,
    color: Rgb,
}

impl TryFrom<RawEllipse> for Ellipse {
    type Error = InvalidShape;

    fn try_from(raw: RawEllipse) -> Result<Self, Self::Error> {
        Ok(Self {
            center: raw.center,
            semi_axis_a: raw.semi_axis_a,
            semi_axis_b: raw.semi_axis_b,
            rotation: raw.rotation,
            tessellation: check_tessellation(raw.tessellation)?,
            color: raw.color,
        })
    }
}

impl Ellipse {
    pub fn new(center: Point, semi_axis_a: f64, semi_axis_b: f64, rotation: f64) -> Self {
        Self {
            center,
            semi_axis_a,
            semi_axis_b,
            rotation,
            tessellation: DEFAULT_ELLIPSE_SEGMENTS,
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
        let semi_axis_a = reader.number("semi-axis a")?;
        let semi_axis_b = reader.number("semi-axis b")?;
        let rotation = reader.number("rotation")?;
        let tessellation = reader.tessellation()?;
        Ok(Self {
            center,
            semi_axis_a,
            semi_axis_b,
            rotation,
            tessellation,
            color,
        })
    }
}

impl ShapeTrait for Ellipse {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, ctx: &HitContext) -> f64 {
        distance_to_ellipse(
            point,
            self.center,
            self.semi_axis_a,
            self.semi_axis_b,
            self.rotation,
            ctx.curve_samples,
        )
    }

    fn snap_points(&self) -> Vec<Point> {
        vec![self.center]
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_ellipse(self, color);
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.center);
        out.number(self.semi_axis_a);
        out.number(self.semi_axis_b);
        out.number(self.rotation);
        out.count(self.tessellation as usize);
    }
}
