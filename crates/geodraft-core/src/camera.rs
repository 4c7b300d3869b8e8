//! View rectangle: the visible world region and pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Factor applied per scroll notch.
pub const ZOOM_STEP: f64 = 1.15;

/// Smallest and largest world width a view may be zoomed to.
pub const MIN_VIEW_EXTENT: f64 = 1e-6;
pub const MAX_VIEW_EXTENT: f64 = 1e9;

/// Starting spacing for the adaptive grid.
const BASE_GRID_SPACING: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewError {
    #[error("degenerate view rectangle: left={left} right={right} bottom={bottom} top={top}")]
    Degenerate { left: f64, right: f64, bottom: f64, top: f64 },
}

/// Visible world rectangle with `left < right` and `bottom < top`.
///
/// World y grows upwards; screen y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawView", into = "RawView")]
pub struct ViewRect {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
}

#[derive(Serialize, Deserialize)]
struct RawView {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
}

impl TryFrom<RawView> for ViewRect {
    type Error = ViewError;

    fn try_from(raw: RawView) -> Result<Self, Self::Error> {
        ViewRect::new(raw.left, raw.right, raw.bottom, raw.top)
    }
}

impl From<ViewRect> for RawView {
    fn from(view: ViewRect) -> Self {
        RawView {
            left: view.left,
            right: view.right,
            bottom: view.bottom,
            top: view.top,
        }
    }
}

impl Default for ViewRect {
    fn default() -> Self {
        Self {
            left: -2.0,
            right: 2.0,
            bottom: -1.5,
            top: 1.5,
        }
    }
}

impl ViewRect {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self, ViewError> {
        let finite = [left, right, bottom, top].iter().all(|v| v.is_finite());
        if !finite || left >= right || bottom >= top {
            return Err(ViewError::Degenerate { left, right, bottom, top });
        }
        Ok(Self { left, right, bottom, top })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// The larger of width and height.
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.bottom + self.top) / 2.0)
    }

    /// World-space rectangle (`y0 = bottom`, `y1 = top`).
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left, self.bottom, self.right, self.top)
    }

    /// World units per framebuffer pixel, taking the coarser axis.
    pub fn world_per_pixel(&self, framebuffer: Size) -> f64 {
        let w = framebuffer.width.max(1.0);
        let h = framebuffer.height.max(1.0);
        (self.width() / w).max(self.height() / h)
    }

    /// World-to-screen transform for a framebuffer of the given size.
    pub fn transform(&self, framebuffer: Size) -> Affine {
        let sx = framebuffer.width / self.width();
        let sy = framebuffer.height / self.height();
        Affine::new([
            sx,
            0.0,
            0.0,
            -sy,
            -self.left * sx,
            framebuffer.height + self.bottom * sy,
        ])
    }

    pub fn screen_to_world(&self, screen: Point, framebuffer: Size) -> Point {
        let w = framebuffer.width.max(1.0);
        let h = framebuffer.height.max(1.0);
        Point::new(
            self.left + screen.x / w * self.width(),
            self.bottom + (h - screen.y) / h * self.height(),
        )
    }

    pub fn world_to_screen(&self, world: Point, framebuffer: Size) -> Point {
        self.transform(framebuffer) * world
    }

    /// Scale the view by `factor` about `anchor`, which keeps its position.
    ///
    /// `factor < 1` zooms in. Returns the view unchanged if the result
    /// would leave the supported extent range.
    pub fn zoomed_at(&self, anchor: Point, factor: f64) -> ViewRect {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        let width = self.width() * factor;
        if !(MIN_VIEW_EXTENT..=MAX_VIEW_EXTENT).contains(&width) {
            return *self;
        }
        ViewRect::new(
            anchor.x + (self.left - anchor.x) * factor,
            anchor.x + (self.right - anchor.x) * factor,
            anchor.y + (self.bottom - anchor.y) * factor,
            anchor.y + (self.top - anchor.y) * factor,
        )
        .unwrap_or(*self)
    }

    /// Shift the view so the content follows a pointer drag of `delta`
    /// screen pixels.
    pub fn panned_by_pixels(&self, delta: Vec2, framebuffer: Size) -> ViewRect {
        let w = framebuffer.width.max(1.0);
        let h = framebuffer.height.max(1.0);
        let dx = -delta.x / w * self.width();
        let dy = delta.y / h * self.height();
        self.translated(Vec2::new(dx, dy))
    }

    pub fn translated(&self, delta: Vec2) -> ViewRect {
        Self {
            left: self.left + delta.x,
            right: self.right + delta.x,
            bottom: self.bottom + delta.y,
            top: self.top + delta.y,
        }
    }

    /// Grid line spacing adapted to the current width.
    pub fn grid_spacing(&self) -> f64 {
        let width = self.width();
        let mut spacing = BASE_GRID_SPACING;
        while spacing * 10.0 < width {
            spacing *= 2.0;
        }
        while spacing * 2.0 > width {
            spacing /= 2.0;
        }
        spacing
    }

    /// Grid line positions along the x axis.
    pub fn grid_lines_x(&self) -> Vec<f64> {
        grid_lines(self.left, self.right, self.grid_spacing())
    }

    /// Grid line positions along the y axis.
    pub fn grid_lines_y(&self) -> Vec<f64> {
        grid_lines(self.bottom, self.top, self.grid_spacing())
    }
}

fn grid_lines(from: f64, to: f64, spacing: f64) -> Vec<f64> {
    let first = (from / spacing).ceil() as i64;
    let last = (to / spacing).floor() as i64;
    (first..=last).map(|i| i as f64 * spacing).collect()
}

/// Axis tick label: integers without decimals, otherwise up to two decimals
/// with trailing zeros removed.
pub fn format_tick(value: f64) -> String {
    let value = if value.abs() < 1e-9 { 0.0 } else { value };
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
