//! Input events and per-session interaction state.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// An event delivered by the windowing layer. Positions are in screen
/// pixels with the origin at the top-left of the framebuffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove { position: Point },
    PointerDown { button: MouseButton, position: Point },
    PointerUp { button: MouseButton },
    Key { key: String, modifiers: Modifiers },
    /// Positive deltas scroll up (zoom in).
    Scroll { delta: f64 },
    Resize { size: Size },
}

/// A free point being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointDrag {
    /// Index of the dragged point.
    pub index: usize,
    /// Whether the undo snapshot for this drag has been taken.
    pub snapshot_taken: bool,
}

/// What the left button is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Panning the view; holds the last pointer position in screen space.
    Panning { last: Point },
    DraggingPoint(PointDrag),
}

/// Explicit replacement for process-wide cursor and drag state, owned by
/// the canvas and threaded through every event handler.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionContext {
    /// Last pointer position in screen pixels.
    pub pointer: Point,
    /// Framebuffer size in pixels.
    pub framebuffer: Size,
    pub drag: DragState,
    pub modifiers: Modifiers,
}

impl Default for InteractionContext {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 720.0))
    }
}

impl InteractionContext {
    pub fn new(framebuffer: Size) -> Self {
        Self {
            pointer: Point::ZERO,
            framebuffer,
            drag: DragState::Idle,
            modifiers: Modifiers::default(),
        }
    }

    /// Record a new pointer position and return the movement since the last.
    pub fn move_pointer(&mut self, position: Point) -> Vec2 {
        let delta = position - self.pointer;
        self.pointer = position;
        delta
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, DragState::Idle)
    }

    pub fn dragged_point(&self) -> Option<usize> {
        match self.drag {
            DragState::DraggingPoint(drag) => Some(drag.index),
            _ => None,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }
}

/// Parse a key chord such as `ctrl+shift+z` into a key name and modifiers.
pub fn parse_key_chord(chord: &str) -> (String, Modifiers) {
    let mut modifiers = Modifiers::default();
    let mut key = String::new();
    for part in chord.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            _ => key = part.to_string(),
        }
    }
    (key, modifiers)
}
