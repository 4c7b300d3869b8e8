//! Segments, rays and infinite lines.

use super::{HitContext, Rgb, ShapeKind, ShapeTrait};
use crate::geometry::{clip_line_to_rect, distance_to_infinite_line, distance_to_ray, distance_to_segment};
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// How far a line extends past its defining points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineExtent {
    /// Bounded by both points.
    Segment,
    /// Starts at `p1`, runs through `p2` and beyond.
    Ray,
    /// Unbounded in both directions.
    Infinite,
}

/// A straight line defined by two points.
///
/// For rays and infinite lines `p1` is the anchor and the direction is
/// `p2 - p1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
    extent: LineExtent,
    pub color: Rgb,
}

impl Line {
    pub fn new(extent: LineExtent, p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            extent,
            color: Rgb::default(),
        }
    }

    pub fn segment(p1: Point, p2: Point) -> Self {
        Self::new(LineExtent::Segment, p1, p2)
    }

    pub fn ray(p1: Point, p2: Point) -> Self {
        Self::new(LineExtent::Ray, p1, p2)
    }

    pub fn infinite(p1: Point, p2: Point) -> Self {
        Self::new(LineExtent::Infinite, p1, p2)
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn extent(&self) -> LineExtent {
        self.extent
    }

    pub fn direction(&self) -> Vec2 {
        self.p2 - self.p1
    }

    pub(crate) fn read_fields(extent: LineExtent, color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let p1 = reader.point("first point")?;
        let p2 = reader.point("second point")?;
        Ok(Self::new(extent, p1, p2).with_color(color))
    }
}

impl ShapeTrait for Line {
    fn kind(&self) -> ShapeKind {
        match self.extent {
            LineExtent::Segment => ShapeKind::Segment,
            LineExtent::Ray => ShapeKind::Ray,
            LineExtent::Infinite => ShapeKind::InfiniteLine,
        }
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, _ctx: &HitContext) -> f64 {
        match self.extent {
            LineExtent::Segment => distance_to_segment(point, self.p1, self.p2),
            LineExtent::Ray => distance_to_ray(point, self.p1, self.p2),
            LineExtent::Infinite => distance_to_infinite_line(point, self.p1, self.p2),
        }
    }

    fn snap_points(&self) -> Vec<Point> {
        vec![self.p1, self.p2]
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        let t_min = match self.extent {
            LineExtent::Segment => {
                renderer.draw_segment(self.p1, self.p2, color);
                return;
            }
            LineExtent::Ray => 0.0,
            LineExtent::Infinite => f64::NEG_INFINITY,
        };
        let view = renderer.view().as_rect();
        if let Some((a, b)) = clip_line_to_rect(self.p1, self.direction(), t_min, view) {
            renderer.draw_segment(a, b, color);
        }
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.p1);
        out.point(self.p2);
    }
}
