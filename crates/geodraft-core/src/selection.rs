//! Hover and selection: nearest-shape picking with point priority.

use crate::document::Document;
use crate::shapes::{HitContext, Shape};
use kurbo::Point;

/// Pick radius in framebuffer pixels.
pub const HIT_THRESHOLD_PX: f64 = 12.0;

/// A shape found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    /// Distance in world units.
    pub distance: f64,
}

/// Find the shape nearest to `point` within the pixel threshold.
///
/// Points and all other kinds are tracked separately; any point in range
/// wins over a closer line or curve. Shapes are scanned top-down, so later
/// shapes win exact ties.
pub fn pick_shape(document: &Document, point: Point, ctx: &HitContext, threshold_px: f64) -> Option<Hit> {
    pick_shape_where(document, point, ctx, threshold_px, |_, _| true)
}

/// [`pick_shape`] restricted to shapes accepted by `accept`, which sees
/// each shape with its index.
pub fn pick_shape_where(
    document: &Document,
    point: Point,
    ctx: &HitContext,
    threshold_px: f64,
    accept: impl Fn(usize, &Shape) -> bool,
) -> Option<Hit> {
    let threshold = ctx.world_threshold(threshold_px);
    let mut best_point: Option<Hit> = None;
    let mut best_other: Option<Hit> = None;

    for (index, shape) in document.shapes().iter().enumerate().rev() {
        if !accept(index, shape) {
            continue;
        }
        let distance = shape.distance_to(point, ctx);
        if !(distance < threshold) {
            continue;
        }
        let track = if shape.is_point() {
            &mut best_point
        } else {
            &mut best_other
        };
        if track.is_none_or(|best| distance < best.distance) {
            *track = Some(Hit { index, distance });
        }
    }

    best_point.or(best_other)
}

/// Hovered and selected shape indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index;
    }

    pub fn select(&mut self, index: usize) {
        self.selected = Some(index);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    /// Forget both indices; used after the shape collection is replaced or
    /// shrinks.
    pub fn invalidate(&mut self) {
        self.hovered = None;
        self.selected = None;
    }

    /// Drop indices that no longer address a shape.
    pub fn revalidate(&mut self, len: usize) {
        self.hovered = self.hovered.filter(|&i| i < len);
        self.selected = self.selected.filter(|&i| i < len);
    }
}
