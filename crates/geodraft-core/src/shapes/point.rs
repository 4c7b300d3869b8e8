//! Point shape.

use super::{HitContext, Rgb, ShapeKind, ShapeTrait};
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default on-screen diameter of a point, in pixels.
pub const DEFAULT_POINT_SIZE: f64 = 6.0;

/// A point placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointShape {
    pub position: Point,
    /// Display size in pixels.
    pub display_size: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub show_name: bool,
    pub color: Rgb,
}

impl PointShape {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            display_size: DEFAULT_POINT_SIZE,
            name: None,
            show_name: false,
            color: Rgb::default(),
        }
    }

    /// Attach a label; an empty name clears it.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.show_name = !name.is_empty();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.display_size = size;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub(crate) fn read_fields(color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let position = reader.point("position")?;
        let display_size = reader.number("point size")?;
        let show_name = reader.flag("show name")?;
        let name = reader.name()?;
        Ok(Self {
            position,
            display_size,
            name,
            show_name,
            color,
        })
    }
}

impl ShapeTrait for PointShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Point
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, _ctx: &HitContext) -> f64 {
        self.position.distance(point)
    }

    fn snap_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_point(self.position, self.display_size, color);
        if self.show_name {
            if let Some(name) = &self.name {
                renderer.draw_label(self.position, name, color);
            }
        }
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.position);
        out.number(self.display_size);
        out.flag(self.show_name);
        out.name(self.name.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewRect;

    #[test]
    fn test_point_distance() {
        let p = PointShape::new(Point::new(1.0, 1.0));
        let ctx = HitContext::new(ViewRect::default(), 0.01);
        assert!((p.distance_to(Point::new(4.0, 5.0), &ctx) - 5.0).abs() < 1e-12);
        assert_eq!(p.snap_points(), vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_with_name() {
        let p = PointShape::new(Point::ZERO).with_name("A");
        assert_eq!(p.name.as_deref(), Some("A"));
        assert!(p.show_name);
        let q = PointShape::new(Point::ZERO).with_name("");
        assert_eq!(q.name, None);
        assert!(!q.show_name);
    }
}
