//! Snapping pointer positions to existing vertices.

use crate::document::Document;
use crate::shapes::{HitContext, Shape, ShapeKind};
use kurbo::Point;

/// Snap radius in framebuffer pixels.
pub const SNAP_THRESHOLD_PX: f64 = 12.0;

/// Role of a snap target on its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    /// A Point shape itself.
    Point,
    /// Endpoint of a segment, ray or infinite line.
    Endpoint,
    /// Center of a circle or ellipse.
    Center,
    /// Vertex of a polyline or parabola.
    Vertex,
}

impl SnapTargetKind {
    fn for_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Point => SnapTargetKind::Point,
            ShapeKind::Segment | ShapeKind::InfiniteLine | ShapeKind::Ray => SnapTargetKind::Endpoint,
            ShapeKind::Circle | ShapeKind::Ellipse => SnapTargetKind::Center,
            ShapeKind::Parabola | ShapeKind::Hyperbola | ShapeKind::Polyline => SnapTargetKind::Vertex,
        }
    }
}

/// A point a construction may snap to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Point,
    pub kind: SnapTargetKind,
    /// Index of the owning shape.
    pub shape_index: usize,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped (or original) point.
    pub point: Point,
    /// The target that captured the point, if any.
    pub target: Option<SnapTarget>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self { point, target: None }
    }

    pub fn is_snapped(&self) -> bool {
        self.target.is_some()
    }
}

/// Snap targets contributed by one shape.
pub fn targets_for_shape(shape: &Shape, shape_index: usize) -> Vec<SnapTarget> {
    let kind = SnapTargetKind::for_shape(shape.kind());
    shape
        .snap_points()
        .into_iter()
        .map(|point| SnapTarget {
            point,
            kind,
            shape_index,
        })
        .collect()
}

/// All snap targets in document order.
pub fn collect_targets(document: &Document) -> Vec<SnapTarget> {
    document
        .shapes()
        .iter()
        .enumerate()
        .flat_map(|(i, shape)| targets_for_shape(shape, i))
        .collect()
}

/// Snap a point to the nearest target strictly within `threshold`.
///
/// Among exactly equidistant targets the first one wins.
pub fn snap_to_targets(point: Point, targets: &[SnapTarget], threshold: f64) -> SnapResult {
    let mut best_target: Option<&SnapTarget> = None;
    let mut best_dist_sq = threshold * threshold;

    for target in targets {
        let dist_sq = point.distance_squared(target.point);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_target = Some(target);
        }
    }

    match best_target {
        Some(target) => SnapResult {
            point: target.point,
            target: Some(*target),
        },
        None => SnapResult::none(point),
    }
}

/// Snap a world-space pointer position against the document's vertices.
pub fn snap_point(document: &Document, point: Point, ctx: &HitContext, threshold_px: f64) -> SnapResult {
    let targets = collect_targets(document);
    snap_to_targets(point, &targets, ctx.world_threshold(threshold_px))
}
