//! Polyline shape.

use super::{HitContext, InvalidShape, Rgb, ShapeKind, ShapeTrait};
use crate::geometry::distance_to_polyline;
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An open chain of straight segments with at least two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolyline")]
pub struct Polyline {
    vertices: Vec<Point>,
    pub color: Rgb,
}

#[derive(Deserialize)]
struct RawPolyline {
    vertices: Vec<Point>,
    color: Rgb,
}

impl TryFrom<RawPolyline> for Polyline {
    type Error = InvalidShape;

    fn try_from(raw: RawPolyline) -> Result<Self, Self::Error> {
        let count = raw.vertices.len();
        Polyline::new(raw.vertices)
            .map(|p| p.with_color(raw.color))
            .ok_or(InvalidShape::TooFewVertices(count))
    }
}

impl Polyline {
    /// Returns `None` for fewer than two vertices.
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        (vertices.len() >= 2).then(|| Self {
            vertices,
            color: Rgb::default(),
        })
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub(crate) fn read_fields(color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let count = reader.count("vertex count")?;
        if count < 2 {
            return Err(reader.malformed(format!("polyline needs at least 2 vertices, got {count}")));
        }
        let vertices = (0..count)
            .map(|_| reader.point("vertex"))
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Self { vertices, color })
    }
}

impl ShapeTrait for Polyline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polyline
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, _ctx: &HitContext) -> f64 {
        distance_to_polyline(point, &self.vertices)
    }

    fn snap_points(&self) -> Vec<Point> {
        self.vertices.clone()
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_polyline(&self.vertices, color);
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.count(self.vertices.len());
        for v in &self.vertices {
            out.point(*v);
        }
    }
}
