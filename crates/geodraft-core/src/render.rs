//! Renderer abstraction and per-frame draw dispatch.

use crate::camera::{ViewRect, format_tick};
use crate::document::Document;
use crate::selection::SelectionState;
use crate::shapes::{Ellipse, Hyperbola, Parabola, Rgb, Shape};
use kurbo::Point;

/// Color of the shape under the cursor.
pub const HOVER_COLOR: Rgb = Rgb::new(1.0, 0.6, 0.0);
/// Color of the selected shape.
pub const SELECT_COLOR: Rgb = Rgb::new(0.9, 0.1, 0.1);
/// Color of in-progress gestures.
pub const PREVIEW_COLOR: Rgb = Rgb::new(0.5, 0.5, 0.5);
/// Grid line color.
pub const GRID_COLOR: Rgb = Rgb::new(0.88, 0.88, 0.88);
/// Axis and tick label color.
pub const AXIS_COLOR: Rgb = Rgb::new(0.35, 0.35, 0.35);

/// Drawing backend. Coordinates are world space; the backend owns the
/// world-to-pixel transform of its current view.
pub trait Renderer {
    fn view(&self) -> ViewRect;

    fn set_view(&mut self, view: ViewRect);

    /// `size` is the marker diameter in pixels.
    fn draw_point(&mut self, position: Point, size: f64, color: Rgb);

    fn draw_segment(&mut self, a: Point, b: Point, color: Rgb);

    fn draw_circle(&mut self, center: Point, radius: f64, tessellation: u32, color: Rgb);

    fn draw_ellipse(&mut self, ellipse: &Ellipse, color: Rgb);

    fn draw_parabola(&mut self, parabola: &Parabola, color: Rgb);

    fn draw_hyperbola(&mut self, hyperbola: &Hyperbola, color: Rgb);

    fn draw_polyline(&mut self, vertices: &[Point], color: Rgb);

    /// Text next to a world position. Backends without text ignore it.
    fn draw_label(&mut self, _position: Point, _text: &str, _color: Rgb) {}
}

/// Everything drawn in one frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub document: &'a Document,
    pub selection: SelectionState,
    /// Unfinished gesture shapes.
    pub preview: Vec<Shape>,
    /// Vertex the cursor currently snaps to.
    pub snap_point: Option<Point>,
    pub show_grid: bool,
}

impl<'a> Frame<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            selection: SelectionState::default(),
            preview: Vec::new(),
            snap_point: None,
            show_grid: true,
        }
    }

    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_preview(mut self, preview: Vec<Shape>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_snap_point(mut self, point: Option<Point>) -> Self {
        self.snap_point = point;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }
}

/// Draw a whole frame: grid, shapes in z-order with highlights, then
/// gesture previews and the snap marker on top.
pub fn draw_frame(renderer: &mut dyn Renderer, frame: &Frame<'_>) {
    let view = frame.document.view();
    renderer.set_view(view);

    if frame.show_grid {
        draw_grid(renderer, view);
    }

    for (index, shape) in frame.document.shapes().iter().enumerate() {
        if frame.selection.is_selected(index) {
            shape.draw_with_color(renderer, SELECT_COLOR);
        } else if frame.selection.hovered() == Some(index) {
            shape.draw_with_color(renderer, HOVER_COLOR);
        } else {
            shape.draw(renderer);
        }
    }

    for shape in &frame.preview {
        shape.draw_with_color(renderer, PREVIEW_COLOR);
    }

    if let Some(point) = frame.snap_point {
        renderer.draw_point(point, 10.0, HOVER_COLOR);
    }
}

/// Grid lines, both axes, and tick labels along the axes.
pub fn draw_grid(renderer: &mut dyn Renderer, view: ViewRect) {
    for x in view.grid_lines_x() {
        renderer.draw_segment(Point::new(x, view.bottom()), Point::new(x, view.top()), GRID_COLOR);
    }
    for y in view.grid_lines_y() {
        renderer.draw_segment(Point::new(view.left(), y), Point::new(view.right(), y), GRID_COLOR);
    }

    renderer.draw_segment(Point::new(view.left(), 0.0), Point::new(view.right(), 0.0), AXIS_COLOR);
    renderer.draw_segment(Point::new(0.0, view.bottom()), Point::new(0.0, view.top()), AXIS_COLOR);

    for x in view.grid_lines_x() {
        renderer.draw_label(Point::new(x, 0.0), &format_tick(x), AXIS_COLOR);
    }
    for y in view.grid_lines_y().into_iter().filter(|y| *y != 0.0) {
        renderer.draw_label(Point::new(0.0, y), &format_tick(y), AXIS_COLOR);
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Point { position: Point, size: f64, color: Rgb },
    Segment { a: Point, b: Point, color: Rgb },
    Circle { center: Point, radius: f64, tessellation: u32, color: Rgb },
    Ellipse { ellipse: Ellipse, color: Rgb },
    Parabola { parabola: Parabola, color: Rgb },
    Hyperbola { hyperbola: Hyperbola, color: Rgb },
    Polyline { vertices: Vec<Point>, color: Rgb },
    Label { position: Point, text: String, color: Rgb },
}

impl DrawCall {
    pub fn color(&self) -> Rgb {
        match self {
            DrawCall::Point { color, .. }
            | DrawCall::Segment { color, .. }
            | DrawCall::Circle { color, .. }
            | DrawCall::Ellipse { color, .. }
            | DrawCall::Parabola { color, .. }
            | DrawCall::Hyperbola { color, .. }
            | DrawCall::Polyline { color, .. }
            | DrawCall::Label { color, .. } => *color,
        }
    }
}

/// Headless renderer that records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    view: ViewRect,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Calls drawn in `color`, excluding grid and labels.
    pub fn calls_with_color(&self, color: Rgb) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(move |c| c.color() == color && !matches!(c, DrawCall::Label { .. }))
    }
}

impl Renderer for RecordingRenderer {
    fn view(&self) -> ViewRect {
        self.view
    }

    fn set_view(&mut self, view: ViewRect) {
        self.view = view;
    }

    fn draw_point(&mut self, position: Point, size: f64, color: Rgb) {
        self.calls.push(DrawCall::Point { position, size, color });
    }

    fn draw_segment(&mut self, a: Point, b: Point, color: Rgb) {
        self.calls.push(DrawCall::Segment { a, b, color });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, tessellation: u32, color: Rgb) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            tessellation,
            color,
        });
    }

    fn draw_ellipse(&mut self, ellipse: &Ellipse, color: Rgb) {
        self.calls.push(DrawCall::Ellipse {
            ellipse: ellipse.clone(),
            color,
        });
    }

    fn draw_parabola(&mut self, parabola: &Parabola, color: Rgb) {
        self.calls.push(DrawCall::Parabola {
            parabola: parabola.clone(),
            color,
        });
    }

    fn draw_hyperbola(&mut self, hyperbola: &Hyperbola, color: Rgb) {
        self.calls.push(DrawCall::Hyperbola {
            hyperbola: hyperbola.clone(),
            color,
        });
    }

    fn draw_polyline(&mut self, vertices: &[Point], color: Rgb) {
        self.calls.push(DrawCall::Polyline {
            vertices: vertices.to_vec(),
            color,
        });
    }

    fn draw_label(&mut self, position: Point, text: &str, color: Rgb) {
        self.calls.push(DrawCall::Label {
            position,
            text: text.to_string(),
            color,
        });
    }
}
