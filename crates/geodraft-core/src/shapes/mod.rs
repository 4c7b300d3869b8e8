//! Shape definitions for the construction canvas.

mod circle;
mod conic;
mod ellipse;
mod line;
mod point;
mod polyline;

pub use circle::{Circle, DEFAULT_CIRCLE_SEGMENTS, MIN_TESSELLATION};
pub use conic::{Hyperbola, Parabola};
pub use ellipse::{DEFAULT_ELLIPSE_SEGMENTS, Ellipse};
pub use line::{Line, LineExtent};
pub use point::{DEFAULT_POINT_SIZE, PointShape};
pub use polyline::Polyline;

use crate::camera::ViewRect;
use crate::geometry::DEFAULT_CURVE_SAMPLES;
use crate::render::Renderer;
use crate::storage::text::{FieldReader, FieldWriter};
use crate::storage::StorageResult;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A shape record that breaks a shape invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidShape {
    #[error("polyline needs at least 2 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("segment count {0} is below {MIN_TESSELLATION}")]
    Tessellation(u32),
    #[error("invalid radius {0}")]
    Radius(f64),
}

fn check_tessellation(segments: u32) -> Result<u32, InvalidShape> {
    if segments < MIN_TESSELLATION {
        return Err(InvalidShape::Tessellation(segments));
    }
    Ok(segments)
}

/// RGB color with float channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color, clamping each channel into `[0, 1]`.
    pub fn clamped(r: f32, g: f32, b: f32) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(c(r), c(g), c(b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        let [r, g, b, _] = color.components;
        Rgb::clamped(r, g, b)
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Color::new([color.r, color.g, color.b, 1.0])
    }
}

/// Discriminant of a [`Shape`]. The numeric tag is the one written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point = 0,
    Segment = 1,
    InfiniteLine = 2,
    Ray = 3,
    Circle = 4,
    Ellipse = 5,
    Parabola = 6,
    Hyperbola = 7,
    Polyline = 8,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Point,
        ShapeKind::Segment,
        ShapeKind::InfiniteLine,
        ShapeKind::Ray,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Parabola,
        ShapeKind::Hyperbola,
        ShapeKind::Polyline,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Display name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Segment => "segment",
            ShapeKind::InfiniteLine => "line",
            ShapeKind::Ray => "ray",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Parabola => "parabola",
            ShapeKind::Hyperbola => "hyperbola",
            ShapeKind::Polyline => "polyline",
        }
    }

    /// Segments, rays and infinite lines.
    pub fn is_line_like(self) -> bool {
        matches!(self, ShapeKind::Segment | ShapeKind::InfiniteLine | ShapeKind::Ray)
    }
}

/// Parameters shared by every hit-test in a single pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitContext {
    /// Visible world rectangle.
    pub view: ViewRect,
    /// World units covered by one framebuffer pixel.
    pub world_per_pixel: f64,
    /// Sampling resolution for curve distance approximation.
    pub curve_samples: usize,
}

impl HitContext {
    pub fn new(view: ViewRect, world_per_pixel: f64) -> Self {
        Self {
            view,
            world_per_pixel,
            curve_samples: DEFAULT_CURVE_SAMPLES,
        }
    }

    /// Convert a pixel threshold into world units.
    pub fn world_threshold(&self, pixels: f64) -> f64 {
        pixels * self.world_per_pixel
    }

    /// Half-width of the window over which open curves are sampled.
    pub fn curve_half_range(&self) -> f64 {
        self.view.extent()
    }
}

/// Capabilities implemented once per shape variant.
pub trait ShapeTrait {
    fn kind(&self) -> ShapeKind;

    fn color(&self) -> Rgb;

    fn set_color(&mut self, color: Rgb);

    /// Distance (world units) from `point` to the drawn geometry.
    fn distance_to(&self, point: Point, ctx: &HitContext) -> f64;

    /// Vertices other constructions may snap to.
    fn snap_points(&self) -> Vec<Point>;

    /// Issue draw calls for this shape in the given color.
    fn draw(&self, renderer: &mut dyn Renderer, color: Rgb);

    /// Append the kind-specific record fields, in file order.
    fn write_fields(&self, out: &mut FieldWriter);
}

/// A shape stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(PointShape),
    Line(Line),
    Circle(Circle),
    Ellipse(Ellipse),
    Parabola(Parabola),
    Hyperbola(Hyperbola),
    Polyline(Polyline),
}

impl Shape {
    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Point(s) => s,
            Shape::Line(s) => s,
            Shape::Circle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Parabola(s) => s,
            Shape::Hyperbola(s) => s,
            Shape::Polyline(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Point(s) => s,
            Shape::Line(s) => s,
            Shape::Circle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Parabola(s) => s,
            Shape::Hyperbola(s) => s,
            Shape::Polyline(s) => s,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.as_trait().kind()
    }

    pub fn color(&self) -> Rgb {
        self.as_trait().color()
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.as_trait_mut().set_color(color);
    }

    pub fn distance_to(&self, point: Point, ctx: &HitContext) -> f64 {
        self.as_trait().distance_to(point, ctx)
    }

    pub fn snap_points(&self) -> Vec<Point> {
        self.as_trait().snap_points()
    }

    /// Draw in the shape's own color.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.as_trait().draw(renderer, self.color());
    }

    /// Draw with a color override (hover/selection highlight).
    pub fn draw_with_color(&self, renderer: &mut dyn Renderer, color: Rgb) {
        self.as_trait().draw(renderer, color);
    }

    pub fn write_fields(&self, out: &mut FieldWriter) {
        self.as_trait().write_fields(out);
    }

    /// Decode the kind-specific fields of a record whose tag and color have
    /// already been consumed.
    pub fn read_fields(kind: ShapeKind, color: Rgb, reader: &mut FieldReader<'_>) -> StorageResult<Self> {
        Ok(match kind {
            ShapeKind::Point => Shape::Point(PointShape::read_fields(color, reader)?),
            ShapeKind::Segment => Shape::Line(Line::read_fields(LineExtent::Segment, color, reader)?),
            ShapeKind::InfiniteLine => Shape::Line(Line::read_fields(LineExtent::Infinite, color, reader)?),
            ShapeKind::Ray => Shape::Line(Line::read_fields(LineExtent::Ray, color, reader)?),
            ShapeKind::Circle => Shape::Circle(Circle::read_fields(color, reader)?),
            ShapeKind::Ellipse => Shape::Ellipse(Ellipse::read_fields(color, reader)?),
            ShapeKind::Parabola => Shape::Parabola(Parabola::read_fields(color, reader)?),
            ShapeKind::Hyperbola => Shape::Hyperbola(Hyperbola::read_fields(color, reader)?),
            ShapeKind::Polyline => Shape::Polyline(Polyline::read_fields(color, reader)?),
        })
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Shape::Point(_))
    }

    pub fn as_point(&self) -> Option<&PointShape> {
        match self {
            Shape::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointShape> {
        match self {
            Shape::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Shape::Line(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Point(p) => match &p.name {
                Some(name) => write!(f, "point {} ({:.3}, {:.3})", name, p.position.x, p.position.y),
                None => write!(f, "point ({:.3}, {:.3})", p.position.x, p.position.y),
            },
            Shape::Line(l) => write!(
                f,
                "{} ({:.3}, {:.3}) -> ({:.3}, {:.3})",
                self.kind().name(),
                l.p1.x,
                l.p1.y,
                l.p2.x,
                l.p2.y
            ),
            Shape::Circle(c) => write!(f, "circle center ({:.3}, {:.3}) r={:.3}", c.center.x, c.center.y, c.radius),
            Shape::Ellipse(e) => write!(
                f,
                "ellipse center ({:.3}, {:.3}) a={:.3} b={:.3}",
                e.center.x, e.center.y, e.semi_axis_a, e.semi_axis_b
            ),
            Shape::Parabola(p) => write!(f, "parabola vertex ({:.3}, {:.3}) a={:.3}", p.vertex.x, p.vertex.y, p.param_a),
            Shape::Hyperbola(h) => write!(
                f,
                "hyperbola center ({:.3}, {:.3}) a={:.3} b={:.3}",
                h.center.x, h.center.y, h.a, h.b
            ),
            Shape::Polyline(p) => write!(f, "polyline with {} vertices", p.vertices().len()),
        }
    }
}

impl From<PointShape> for Shape {
    fn from(s: PointShape) -> Self {
        Shape::Point(s)
    }
}

impl From<Line> for Shape {
    fn from(s: Line) -> Self {
        Shape::Line(s)
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Ellipse> for Shape {
    fn from(s: Ellipse) -> Self {
        Shape::Ellipse(s)
    }
}

impl From<Parabola> for Shape {
    fn from(s: Parabola) -> Self {
        Shape::Parabola(s)
    }
}

impl From<Hyperbola> for Shape {
    fn from(s: Hyperbola) -> Self {
        Shape::Hyperbola(s)
    }
}

impl From<Polyline> for Shape {
    fn from(s: Polyline) -> Self {
        Shape::Polyline(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ShapeKind::from_tag(9), None);
        assert_eq!(ShapeKind::Point.tag(), 0);
        assert_eq!(ShapeKind::Polyline.tag(), 8);
    }

    #[test]
    fn test_line_like_kinds() {
        assert!(ShapeKind::Segment.is_line_like());
        assert!(ShapeKind::Ray.is_line_like());
        assert!(ShapeKind::InfiniteLine.is_line_like());
        assert!(!ShapeKind::Circle.is_line_like());
        assert!(!ShapeKind::Polyline.is_line_like());
    }

    #[test]
    fn test_rgb_peniko_conversion() {
        let rgb = Rgb::new(0.0, 0.4, 1.0);
        let color: Color = rgb.into();
        let back: Rgb = color.into();
        assert_eq!(back, rgb);
    }

    #[test]
    fn test_rgb_clamped() {
        assert_eq!(Rgb::clamped(-1.0, 2.0, f32::NAN), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_kind_is_stable_across_color_edits() {
        let mut shape = Shape::from(Circle::new(Point::new(0.0, 0.0), 1.0));
        shape.set_color(Rgb::WHITE);
        assert_eq!(shape.kind(), ShapeKind::Circle);
        assert_eq!(shape.color(), Rgb::WHITE);
    }

    #[test]
    fn test_display() {
        let circle = Shape::from(Circle::new(Point::new(1.0, 2.0), 0.5));
        assert_eq!(circle.to_string(), "circle center (1.000, 2.000) r=0.500");
        let named = Shape::from(PointShape::new(Point::ZERO).with_name("A"));
        assert_eq!(named.to_string(), "point A (0.000, 0.000)");
    }

    #[test]
    fn test_line_kinds_follow_extent() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(Shape::from(Line::segment(a, b)).kind(), ShapeKind::Segment);
        assert_eq!(Shape::from(Line::ray(a, b)).kind(), ShapeKind::Ray);
        assert_eq!(Shape::from(Line::infinite(a, b)).kind(), ShapeKind::InfiniteLine);
    }
}
