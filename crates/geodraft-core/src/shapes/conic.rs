//! Open conics: parabolas and hyperbolas.

use super::{HitContext, Rgb, ShapeKind, ShapeTrait};
use crate::geometry::{distance_to_hyperbola, distance_to_parabola};
use crate::render::Renderer;
use crate::storage::StorageResult;
use crate::storage::text::{FieldReader, FieldWriter};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Parabola `x² = 4ay` (vertical) or `y² = 4ax` (horizontal), translated so
/// its vertex sits at `vertex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parabola {
    pub vertex: Point,
    pub param_a: f64,
    pub is_vertical: bool,
    pub color: Rgb,
}

impl Parabola {
    pub fn new(vertex: Point, param_a: f64, is_vertical: bool) -> Self {
        Self {
            vertex,
            param_a,
            is_vertical,
            color: Rgb::default(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub(crate) fn read_fields(color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let vertex = reader.point("vertex")?;
        let param_a = reader.number("parameter a")?;
        let is_vertical = reader.flag("orientation")?;
        Ok(Self::new(vertex, param_a, is_vertical).with_color(color))
    }
}

impl ShapeTrait for Parabola {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Parabola
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, ctx: &HitContext) -> f64 {
        distance_to_parabola(
            point,
            self.vertex,
            self.param_a,
            self.is_vertical,
            ctx.curve_half_range(),
            ctx.curve_samples,
        )
    }

    fn snap_points(&self) -> Vec<Point> {
        vec![self.vertex]
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_parabola(self, color);
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.vertex);
        out.number(self.param_a);
        out.flag(self.is_vertical);
    }
}

/// Hyperbola `x²/a² − y²/b² = 1` (horizontal) or `y²/a² − x²/b² = 1`
/// (vertical), centered on `center`. Both branches are part of the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperbola {
    pub center: Point,
    pub a: f64,
    pub b: f64,
    pub is_vertical: bool,
    pub color: Rgb,
}

impl Hyperbola {
    pub fn new(center: Point, a: f64, b: f64, is_vertical: bool) -> Self {
        Self {
            center,
            a,
            b,
            is_vertical,
            color: Rgb::default(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub(crate) fn read_fields(color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        let center = reader.point("center")?;
        let a = reader.number("a")?;
        let b = reader.number("b")?;
        let is_vertical = reader.flag("orientation")?;
        Ok(Self::new(center, a, b, is_vertical).with_color(color))
    }
}

impl ShapeTrait for Hyperbola {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Hyperbola
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn distance_to(&self, point: Point, ctx: &HitContext) -> f64 {
        distance_to_hyperbola(
            point,
            self.center,
            self.a,
            self.b,
            self.is_vertical,
            ctx.curve_half_range(),
            ctx.curve_samples,
        )
    }

    // The center is not on the curve, so hyperbolas offer nothing to snap to.
    fn snap_points(&self) -> Vec<Point> {
        Vec::new()
    }

    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_hyperbola(self, color);
    }

    fn write_fields(&self, out: &mut FieldWriter) {
        out.point(self.center);
        out.number(self.a);
        out.number(self.b);
        out.flag(self.is_vertical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewRect;

    fn ctx() -> HitContext {
        HitContext::new(ViewRect::default(), 0.01)
    }

    #[test]
    fn test_parabola_hit_near_vertex() {
        let p = Parabola::new(Point::new(0.5, -0.5), 0.3, true);
        assert!(p.distance_to(Point::new(0.5, -0.5), &ctx()) < 1e-3);
        assert_eq!(p.snap_points(), vec![Point::new(0.5, -0.5)]);
    }

    #[test]
    fn test_hyperbola_center_is_off_curve() {
        let h = Hyperbola::new(Point::ZERO, 0.4, 0.25, false);
        assert!((h.distance_to(Point::ZERO, &ctx()) - 0.4).abs() < 1e-3);
        assert!(h.distance_to(Point::new(0.4, 0.0), &ctx()) < 1e-3);
        assert!(h.snap_points().is_empty());
    }
}
