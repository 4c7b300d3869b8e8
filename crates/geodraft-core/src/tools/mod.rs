//! Tool system: one click-driven state machine per tool family.

mod params;

pub use params::{DEFAULT_PAINT, ParamError, ToolParams};

use crate::document::Document;
use crate::geometry::{self, GeometryError};
use crate::selection::pick_shape_where;
use crate::shapes::{
    Circle, Ellipse, HitContext, Hyperbola, Line, LineExtent, Parabola, PointShape, Polyline, Shape, ShapeKind,
};
use crate::snap::snap_point;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Derived-point constructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConstructMode {
    #[default]
    Midpoint,
    /// Reflect the first point through the second.
    ReflectPoint,
    /// Reflect a point across a segment's supporting line.
    ReflectLine,
    /// Rotate the first point about the second.
    Rotate,
}

/// Sub-modes of the line tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LineMode {
    #[default]
    Segment,
    InfiniteLine,
    Ray,
    /// Measure the angle between two existing lines.
    AngleCalculator,
}

/// Sub-modes of the circle tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CircleMode {
    #[default]
    CenterThenPoint,
    CenterThenRadius,
    ThreePoints,
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Point,
    PointInput,
    Construct(ConstructMode),
    Line(LineMode),
    Circle(CircleMode),
    Ellipse,
    Parabola,
    Hyperbola,
    Polyline,
}

impl ToolKind {
    /// Tool name as typed on the command line, with its sub-mode if any.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Point => "point",
            ToolKind::PointInput => "point-input",
            ToolKind::Construct(ConstructMode::Midpoint) => "construct midpoint",
            ToolKind::Construct(ConstructMode::ReflectPoint) => "construct reflect-point",
            ToolKind::Construct(ConstructMode::ReflectLine) => "construct reflect-line",
            ToolKind::Construct(ConstructMode::Rotate) => "construct rotate",
            ToolKind::Line(LineMode::Segment) => "line segment",
            ToolKind::Line(LineMode::InfiniteLine) => "line infinite",
            ToolKind::Line(LineMode::Ray) => "line ray",
            ToolKind::Line(LineMode::AngleCalculator) => "line angle",
            ToolKind::Circle(CircleMode::CenterThenPoint) => "circle center-point",
            ToolKind::Circle(CircleMode::CenterThenRadius) => "circle center-radius",
            ToolKind::Circle(CircleMode::ThreePoints) => "circle three-points",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Parabola => "parabola",
            ToolKind::Hyperbola => "hyperbola",
            ToolKind::Polyline => "polyline",
        }
    }

    /// Parse a tool name and optional sub-mode; a missing sub-mode picks
    /// the family default.
    pub fn from_name(name: &str, submode: Option<&str>) -> Option<Self> {
        let tool = match (name, submode) {
            ("point", None) => ToolKind::Point,
            ("point-input", None) => ToolKind::PointInput,
            ("construct", mode) => ToolKind::Construct(match mode {
                None | Some("midpoint") => ConstructMode::Midpoint,
                Some("reflect-point") => ConstructMode::ReflectPoint,
                Some("reflect-line") => ConstructMode::ReflectLine,
                Some("rotate") => ConstructMode::Rotate,
                Some(_) => return None,
            }),
            ("line", mode) => ToolKind::Line(match mode {
                None | Some("segment") => LineMode::Segment,
                Some("infinite") => LineMode::InfiniteLine,
                Some("ray") => LineMode::Ray,
                Some("angle") => LineMode::AngleCalculator,
                Some(_) => return None,
            }),
            ("circle", mode) => ToolKind::Circle(match mode {
                None | Some("center-point") => CircleMode::CenterThenPoint,
                Some("center-radius") => CircleMode::CenterThenRadius,
                Some("three-points") => CircleMode::ThreePoints,
                Some(_) => return None,
            }),
            ("ellipse", None) => ToolKind::Ellipse,
            ("parabola", None) => ToolKind::Parabola,
            ("hyperbola", None) => ToolKind::Hyperbola,
            ("polyline", None) => ToolKind::Polyline,
            _ => return None,
        };
        Some(tool)
    }
}

/// Transient state of the active gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolSession {
    #[default]
    Idle,
    /// First click placed: line start, circle center, or conic anchor.
    Anchored { anchor: Point },
    /// First shape of a two-pick construction or angle measurement.
    Picked { first: usize },
    /// Clicks gathered for a three-point circle.
    Collecting { points: Vec<Point> },
    /// Vertices of the polyline under construction.
    Polyline { vertices: Vec<Point> },
}

impl ToolSession {
    /// Shape index held by the session, if any.
    pub fn picked_index(&self) -> Option<usize> {
        match self {
            ToolSession::Picked { first } => Some(*first),
            _ => None,
        }
    }
}

/// What a tool step asks the canvas to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Nothing to apply; the session may have advanced.
    None,
    /// Snapshot, then append this shape.
    Commit(Shape),
    /// Select an existing shape instead of drawing.
    Select(usize),
    /// An angle measurement in degrees.
    Measured(f64),
    /// The gesture was abandoned without touching the document.
    Discarded,
}

/// Read-only view of the editor a tool step resolves clicks against.
#[derive(Debug, Clone, Copy)]
pub struct ClickContext<'a> {
    pub document: &'a Document,
    pub hit: HitContext,
    pub snap_threshold_px: f64,
    pub hit_threshold_px: f64,
}

impl<'a> ClickContext<'a> {
    /// Position after snapping to the nearest vertex in range.
    pub fn snapped(&self, position: Point) -> Point {
        snap_point(self.document, position, &self.hit, self.snap_threshold_px).point
    }

    /// Nearest shape accepted by `accept`, with point priority.
    pub fn pick(&self, position: Point, accept: impl Fn(usize, &Shape) -> bool) -> Option<usize> {
        pick_shape_where(self.document, position, &self.hit, self.hit_threshold_px, accept).map(|hit| hit.index)
    }

    fn point_at(&self, index: usize) -> Option<Point> {
        self.document.get(index)?.as_point().map(|p| p.position)
    }

    fn segment_at(&self, index: usize) -> Option<(Point, Point)> {
        self.document
            .get(index)?
            .as_line()
            .filter(|l| l.extent() == LineExtent::Segment)
            .map(|l| (l.p1, l.p2))
    }

    fn line_at(&self, index: usize) -> Option<&'a Line> {
        self.document.get(index)?.as_line()
    }
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    session: ToolSession,
    /// Values the tools read when they commit.
    pub params: ToolParams,
    last_angle: Option<f64>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools; the previous gesture is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool changed to {}", tool.name());
        }
        self.current_tool = tool;
        self.reset();
    }

    pub fn session(&self) -> &ToolSession {
        &self.session
    }

    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    /// Return the active session to its first step.
    pub fn reset(&mut self) {
        self.session = ToolSession::Idle;
    }

    /// Abandon the gesture in progress. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        let active = self.session != ToolSession::Idle;
        if active {
            log::debug!("Cancelled {} gesture", self.current_tool.name());
        }
        self.reset();
        active
    }

    /// Drop any held shape index after the shape list was resized or replaced.
    pub fn invalidate_indices(&mut self) {
        if self.session.picked_index().is_some() {
            self.reset();
        }
    }

    /// Feed a click at a world position.
    pub fn click(&mut self, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        self.revalidate(ctx);
        match self.current_tool {
            ToolKind::Point => self.click_free_point(position, ctx),
            ToolKind::PointInput => ToolOutcome::None,
            ToolKind::Construct(mode) => self.click_construct(mode, position, ctx),
            ToolKind::Line(LineMode::AngleCalculator) => self.click_angle(position, ctx),
            ToolKind::Line(mode) => self.click_line(mode, position, ctx),
            ToolKind::Circle(CircleMode::ThreePoints) => self.click_three_points(position, ctx),
            ToolKind::Circle(CircleMode::CenterThenPoint) => self.click_center_then_point(position, ctx),
            ToolKind::Circle(CircleMode::CenterThenRadius)
            | ToolKind::Ellipse
            | ToolKind::Parabola
            | ToolKind::Hyperbola => {
                let anchor = ctx.snapped(position);
                log::debug!("{} anchor at ({:.3}, {:.3})", self.current_tool.name(), anchor.x, anchor.y);
                self.session = ToolSession::Anchored { anchor };
                ToolOutcome::None
            }
            ToolKind::Polyline => {
                let vertex = ctx.snapped(position);
                match &mut self.session {
                    ToolSession::Polyline { vertices } => vertices.push(vertex),
                    _ => {
                        self.session = ToolSession::Polyline {
                            vertices: vec![vertex],
                        }
                    }
                }
                log::debug!("Polyline vertex at ({:.3}, {:.3})", vertex.x, vertex.y);
                ToolOutcome::None
            }
        }
    }

    /// Explicit commit for parameter-driven tools.
    pub fn commit(&mut self) -> ToolOutcome {
        let paint = self.params.paint_color;
        let shape: Shape = match (self.current_tool, &self.session) {
            (ToolKind::PointInput, _) => {
                let mut point = PointShape::new(self.params.input_position)
                    .with_size(self.params.point_size)
                    .with_color(paint);
                if let Some(name) = &self.params.input_name {
                    point = point.with_name(name.clone());
                }
                point.into()
            }
            (ToolKind::Circle(CircleMode::CenterThenRadius), ToolSession::Anchored { anchor }) => {
                Circle::new(*anchor, self.params.circle_radius)
                    .with_tessellation(self.params.circle_segments)
                    .with_color(paint)
                    .into()
            }
            (ToolKind::Ellipse, ToolSession::Anchored { anchor }) => Ellipse::new(
                *anchor,
                self.params.ellipse_a,
                self.params.ellipse_b,
                self.params.ellipse_rotation,
            )
            .with_tessellation(self.params.ellipse_segments)
            .with_color(paint)
            .into(),
            (ToolKind::Parabola, ToolSession::Anchored { anchor }) => {
                Parabola::new(*anchor, self.params.parabola_a, self.params.parabola_vertical)
                    .with_color(paint)
                    .into()
            }
            (ToolKind::Hyperbola, ToolSession::Anchored { anchor }) => Hyperbola::new(
                *anchor,
                self.params.hyperbola_a,
                self.params.hyperbola_b,
                self.params.hyperbola_vertical,
            )
            .with_color(paint)
            .into(),
            _ => return ToolOutcome::None,
        };
        self.reset();
        ToolOutcome::Commit(shape)
    }

    /// Finish the polyline under construction.
    pub fn finish(&mut self) -> ToolOutcome {
        let ToolSession::Polyline { vertices } = std::mem::take(&mut self.session) else {
            return ToolOutcome::None;
        };
        match Polyline::new(vertices) {
            Some(polyline) => ToolOutcome::Commit(polyline.with_color(self.params.paint_color).into()),
            None => {
                log::debug!("Polyline needs at least two vertices, discarded");
                ToolOutcome::Discarded
            }
        }
    }

    /// Enter: finish a polyline, otherwise commit.
    pub fn confirm(&mut self) -> ToolOutcome {
        if self.current_tool == ToolKind::Polyline {
            self.finish()
        } else {
            self.commit()
        }
    }

    /// Shapes sketching the unfinished gesture towards `cursor`.
    pub fn preview(&self, cursor: Point) -> Vec<Shape> {
        match (&self.session, self.current_tool) {
            (ToolSession::Anchored { anchor }, ToolKind::Line(mode)) => {
                let extent = match mode {
                    LineMode::InfiniteLine => LineExtent::Infinite,
                    LineMode::Ray => LineExtent::Ray,
                    _ => LineExtent::Segment,
                };
                if *anchor == cursor {
                    vec![PointShape::new(*anchor).into()]
                } else {
                    vec![Line::new(extent, *anchor, cursor).into()]
                }
            }
            (ToolSession::Anchored { anchor }, ToolKind::Circle(CircleMode::CenterThenPoint)) => vec![
                PointShape::new(*anchor).into(),
                Circle::new(*anchor, geometry::distance(*anchor, cursor)).into(),
            ],
            (ToolSession::Anchored { anchor }, _) => vec![PointShape::new(*anchor).into()],
            (ToolSession::Collecting { points }, _) => points.iter().map(|p| PointShape::new(*p).into()).collect(),
            (ToolSession::Polyline { vertices }, _) => {
                let mut path = vertices.clone();
                path.push(cursor);
                Polyline::new(path).map(Shape::from).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn revalidate(&mut self, ctx: &ClickContext<'_>) {
        if let Some(first) = self.session.picked_index() {
            let still_valid = ctx.document.get(first).is_some_and(|shape| match self.current_tool {
                ToolKind::Line(LineMode::AngleCalculator) => shape.kind().is_line_like(),
                _ => shape.is_point(),
            });
            if !still_valid {
                log::debug!("Held shape {} is stale, restarting gesture", first);
                self.reset();
            }
        }
    }

    fn new_point(&self, position: Point) -> Shape {
        PointShape::new(position)
            .with_size(self.params.point_size)
            .with_color(self.params.paint_color)
            .into()
    }

    fn click_free_point(&mut self, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        if let Some(index) = ctx.pick(position, |_, _| true) {
            log::debug!("Click hit shape {}, selecting instead of placing", index);
            return ToolOutcome::Select(index);
        }
        ToolOutcome::Commit(self.new_point(ctx.snapped(position)))
    }

    fn click_construct(&mut self, mode: ConstructMode, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        let Some(first) = self.session.picked_index() else {
            if let Some(index) = ctx.pick(position, |_, s| s.is_point()) {
                log::debug!("Construction picked point {}", index);
                self.session = ToolSession::Picked { first: index };
            }
            return ToolOutcome::None;
        };

        let Some(base) = ctx.point_at(first) else {
            self.reset();
            return ToolOutcome::None;
        };

        let derived = if mode == ConstructMode::ReflectLine {
            let picked = ctx.pick(position, |_, s| s.kind() == ShapeKind::Segment);
            let Some((a, b)) = picked.and_then(|i| ctx.segment_at(i)) else {
                return ToolOutcome::None;
            };
            geometry::reflect_across_line(base, a, b)
        } else {
            let picked = ctx.pick(position, |i, s| i != first && s.is_point());
            let Some(other) = picked.and_then(|i| ctx.point_at(i)) else {
                return ToolOutcome::None;
            };
            match mode {
                ConstructMode::Midpoint => geometry::midpoint(base, other),
                ConstructMode::ReflectPoint => geometry::reflect_across_point(base, other),
                _ => geometry::rotate(base, other, self.params.rotation_degrees),
            }
        };

        self.reset();
        ToolOutcome::Commit(self.new_point(derived))
    }

    fn click_angle(&mut self, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        let first = self.session.picked_index();
        let Some(index) = ctx.pick(position, |i, s| Some(i) != first && s.kind().is_line_like()) else {
            return ToolOutcome::None;
        };
        let Some(first) = first else {
            log::debug!("Angle measurement picked line {}", index);
            self.session = ToolSession::Picked { first: index };
            return ToolOutcome::None;
        };

        self.reset();
        let (Some(l1), Some(l2)) = (ctx.line_at(first), ctx.line_at(index)) else {
            return ToolOutcome::None;
        };
        match geometry::angle_between_degrees(l1.direction(), l2.direction()) {
            Some(angle) => {
                log::info!("Angle between shapes {} and {}: {:.2} degrees", first, index, angle);
                self.last_angle = Some(angle);
                ToolOutcome::Measured(angle)
            }
            None => {
                log::warn!("Cannot measure angle against a zero-length line");
                ToolOutcome::Discarded
            }
        }
    }

    fn click_line(&mut self, mode: LineMode, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        let point = ctx.snapped(position);
        let ToolSession::Anchored { anchor } = self.session else {
            log::debug!("Line start at ({:.3}, {:.3})", point.x, point.y);
            self.session = ToolSession::Anchored { anchor: point };
            return ToolOutcome::None;
        };
        let extent = match mode {
            LineMode::InfiniteLine => LineExtent::Infinite,
            LineMode::Ray => LineExtent::Ray,
            _ => LineExtent::Segment,
        };
        self.reset();
        ToolOutcome::Commit(Line::new(extent, anchor, point).with_color(self.params.paint_color).into())
    }

    fn click_center_then_point(&mut self, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        let point = ctx.snapped(position);
        let ToolSession::Anchored { anchor } = self.session else {
            log::debug!("Circle center at ({:.3}, {:.3})", point.x, point.y);
            self.session = ToolSession::Anchored { anchor: point };
            return ToolOutcome::None;
        };
        self.reset();
        let circle = Circle::new(anchor, geometry::distance(anchor, point))
            .with_tessellation(self.params.circle_segments)
            .with_color(self.params.paint_color);
        ToolOutcome::Commit(circle.into())
    }

    fn click_three_points(&mut self, position: Point, ctx: &ClickContext<'_>) -> ToolOutcome {
        let point = ctx.snapped(position);
        let points = match &mut self.session {
            ToolSession::Collecting { points } => {
                points.push(point);
                points
            }
            _ => {
                self.session = ToolSession::Collecting { points: vec![point] };
                return ToolOutcome::None;
            }
        };
        let &[p1, p2, p3] = points.as_slice() else {
            return ToolOutcome::None;
        };

        self.reset();
        match geometry::circumcircle(p1, p2, p3) {
            Ok((center, radius)) => {
                let circle = Circle::new(center, radius)
                    .with_tessellation(self.params.circle_segments)
                    .with_color(self.params.paint_color);
                ToolOutcome::Commit(circle.into())
            }
            Err(GeometryError::Collinear) => {
                log::warn!("Three-point circle discarded: points are collinear");
                ToolOutcome::Discarded
            }
        }
    }
}
