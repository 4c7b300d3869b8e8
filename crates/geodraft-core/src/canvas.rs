//! Canvas: the document together with everything that edits it.

use crate::document::Document;
use crate::history::History;
use crate::input::{DragState, InputEvent, InteractionContext, Modifiers, MouseButton, PointDrag};
use crate::render::{Frame, Renderer, draw_frame};
use crate::selection::{SelectionState, pick_shape};
use crate::settings::EditorSettings;
use crate::shapes::{HitContext, Rgb, Shape};
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::snap::snap_point;
use crate::storage::{Storage, StorageResult};
use crate::tools::{ClickContext, ToolKind, ToolManager, ToolOutcome, ToolSession};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// What the left button does on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EditorMode {
    /// Select, drag points and pan.
    #[default]
    Navigate,
    /// Clicks feed the current tool.
    Draw,
}

impl EditorMode {
    pub fn name(self) -> &'static str {
        match self {
            EditorMode::Navigate => "navigate",
            EditorMode::Draw => "draw",
        }
    }
}

/// The editor state driven by the frame loop.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub document: Document,
    pub history: History,
    pub tools: ToolManager,
    pub selection: SelectionState,
    pub interaction: InteractionContext,
    pub settings: EditorSettings,
    mode: EditorMode,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            document: Document::with_view(settings.default_view),
            history: History::new(settings.max_undo),
            tools: ToolManager::new(),
            selection: SelectionState::new(),
            interaction: InteractionContext::new(settings.framebuffer),
            settings,
            mode: EditorMode::default(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch modes; the tool session restarts.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode {
            log::info!("Mode: {}", mode.name());
        }
        self.mode = mode;
        self.tools.reset();
        self.interaction.end_drag();
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            EditorMode::Navigate => EditorMode::Draw,
            EditorMode::Draw => EditorMode::Navigate,
        };
        self.set_mode(next);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    /// Hit-test parameters for the current view and framebuffer.
    pub fn hit_context(&self) -> HitContext {
        let view = self.document.view();
        HitContext {
            view,
            world_per_pixel: view.world_per_pixel(self.interaction.framebuffer),
            curve_samples: self.settings.curve_samples,
        }
    }

    /// World position of the pointer.
    pub fn pointer_world(&self) -> Point {
        self.document
            .view()
            .screen_to_world(self.interaction.pointer, self.interaction.framebuffer)
    }

    /// Feed a click at a world position to the current tool and apply the
    /// result. Returns what the tool produced.
    pub fn click_world(&mut self, position: Point) -> ToolOutcome {
        let ctx = ClickContext {
            document: &self.document,
            hit: self.hit_context(),
            snap_threshold_px: self.settings.snap_threshold_px,
            hit_threshold_px: self.settings.hit_threshold_px,
        };
        let outcome = self.tools.click(position, &ctx);
        self.apply(outcome)
    }

    /// Explicit commit for parameter-driven tools.
    pub fn commit(&mut self) -> ToolOutcome {
        let outcome = self.tools.commit();
        self.apply(outcome)
    }

    /// Finish the polyline under construction.
    pub fn finish(&mut self) -> ToolOutcome {
        let outcome = self.tools.finish();
        self.apply(outcome)
    }

    /// Abandon the gesture in progress and any drag.
    pub fn cancel(&mut self) {
        self.tools.cancel();
        self.interaction.end_drag();
    }

    fn apply(&mut self, outcome: ToolOutcome) -> ToolOutcome {
        match &outcome {
            ToolOutcome::Commit(shape) => {
                self.add_shape(shape.clone());
            }
            ToolOutcome::Select(index) => self.selection.select(*index),
            ToolOutcome::None | ToolOutcome::Measured(_) | ToolOutcome::Discarded => {}
        }
        outcome
    }

    /// Append a shape as an undoable action. Returns its index.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        self.history.snapshot(&self.document);
        log::info!("Added {}", shape);
        self.document.push(shape)
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.document) {
            return false;
        }
        log::debug!("Undo, {} shapes", self.document.len());
        self.shapes_replaced();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.document) {
            return false;
        }
        log::debug!("Redo, {} shapes", self.document.len());
        self.shapes_replaced();
        true
    }

    /// Forget every index held outside the document.
    fn shapes_replaced(&mut self) {
        self.selection.invalidate();
        self.tools.invalidate_indices();
        self.interaction.end_drag();
    }

    /// Delete the selected shape. Returns false when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection.selected().filter(|&i| i < self.document.len()) else {
            return false;
        };
        self.history.snapshot(&self.document);
        if let Some(shape) = self.document.remove(index) {
            log::info!("Deleted {}", shape);
        }
        self.shapes_replaced();
        true
    }

    /// Recolor the selected shape as an undoable action.
    pub fn set_selected_color(&mut self, color: Rgb) -> bool {
        let Some(index) = self.selection.selected().filter(|&i| i < self.document.len()) else {
            return false;
        };
        self.history.snapshot(&self.document);
        if let Some(shape) = self.document.get_mut(index) {
            shape.set_color(color);
        }
        true
    }

    /// Color for shapes committed from now on.
    pub fn set_paint_color(&mut self, color: Rgb) {
        self.tools.params.paint_color = color;
    }

    /// Process one input event to completion, returning what the active
    /// tool did with it.
    pub fn handle_event(&mut self, event: &InputEvent) -> ToolOutcome {
        self.selection.revalidate(self.document.len());
        match event {
            InputEvent::PointerMove { position } => self.pointer_moved(*position),
            InputEvent::PointerDown { button, position } => {
                self.interaction.move_pointer(*position);
                return self.pointer_down(*button);
            }
            InputEvent::PointerUp { button } => self.pointer_up(*button),
            InputEvent::Key { key, modifiers } => return self.key_pressed(key, *modifiers),
            InputEvent::Scroll { delta } => self.scrolled(*delta),
            InputEvent::Resize { size } => self.resized(*size),
        }
        ToolOutcome::None
    }

    /// Drain events strictly in arrival order.
    pub fn process_events<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.handle_event(event);
        }
    }

    fn pointer_moved(&mut self, position: Point) {
        self.interaction.move_pointer(position);
        match self.interaction.drag {
            DragState::Panning { last } => {
                let framebuffer = self.interaction.framebuffer;
                let view = self.document.view().panned_by_pixels(position - last, framebuffer);
                self.document.set_view(view);
                self.interaction.drag = DragState::Panning { last: position };
            }
            DragState::DraggingPoint(drag) => self.drag_point(drag),
            DragState::Idle => {
                let hovered = pick_shape(
                    &self.document,
                    self.pointer_world(),
                    &self.hit_context(),
                    self.settings.hit_threshold_px,
                );
                self.selection.set_hovered(hovered.map(|hit| hit.index));
            }
        }
    }

    fn drag_point(&mut self, drag: PointDrag) {
        let target = self.pointer_world();
        if !self.document.get(drag.index).is_some_and(Shape::is_point) {
            log::debug!("Dragged shape {} is gone, ending drag", drag.index);
            self.interaction.end_drag();
            return;
        }
        if !drag.snapshot_taken {
            self.history.snapshot(&self.document);
            self.interaction.drag = DragState::DraggingPoint(PointDrag {
                snapshot_taken: true,
                ..drag
            });
        }
        if let Some(point) = self.document.get_mut(drag.index).and_then(Shape::as_point_mut) {
            point.position = target;
        }
    }

    fn pointer_down(&mut self, button: MouseButton) -> ToolOutcome {
        let pointer = self.interaction.pointer;
        match (button, self.mode) {
            (MouseButton::Left, EditorMode::Draw) => return self.click_world(self.pointer_world()),
            (MouseButton::Left, EditorMode::Navigate) => {
                let hit = pick_shape(
                    &self.document,
                    self.pointer_world(),
                    &self.hit_context(),
                    self.settings.hit_threshold_px,
                );
                match hit {
                    Some(hit) => self.selection.select(hit.index),
                    None => self.selection.clear_selection(),
                }
                let on_point = hit.is_some_and(|hit| self.document.get(hit.index).is_some_and(Shape::is_point));
                self.interaction.drag = match hit {
                    Some(hit) if on_point => DragState::DraggingPoint(PointDrag {
                        index: hit.index,
                        snapshot_taken: false,
                    }),
                    _ => DragState::Panning { last: pointer },
                };
            }
            (MouseButton::Middle, _) => {
                self.interaction.drag = DragState::Panning { last: pointer };
            }
            (MouseButton::Right, EditorMode::Draw) => {
                if matches!(self.tools.session(), ToolSession::Polyline { .. }) {
                    return self.finish();
                }
                self.cancel();
            }
            (MouseButton::Right, EditorMode::Navigate) => {}
        }
        ToolOutcome::None
    }

    fn pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Right {
            return;
        }
        if let DragState::DraggingPoint(PointDrag {
            index,
            snapshot_taken: true,
        }) = self.interaction.drag
        {
            log::info!("Moved point {}", index);
        }
        self.interaction.end_drag();
    }

    fn key_pressed(&mut self, key: &str, modifiers: Modifiers) -> ToolOutcome {
        self.interaction.modifiers = modifiers;
        let Some(command) = ShortcutRegistry::lookup(key, modifiers) else {
            log::debug!("Unbound key {}", key);
            return ToolOutcome::None;
        };
        self.execute(command)
    }

    /// Run an editor command.
    pub fn execute(&mut self, command: Command) -> ToolOutcome {
        match command {
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::Cancel => self.cancel(),
            Command::DeleteSelected => {
                self.delete_selected();
            }
            Command::Confirm => {
                let outcome = self.tools.confirm();
                return self.apply(outcome);
            }
            Command::ToggleMode => self.toggle_mode(),
        }
        ToolOutcome::None
    }

    /// Zoom about the pointer; positive deltas zoom in.
    fn scrolled(&mut self, delta: f64) {
        let step = self.settings.zoom_step;
        let factor = if delta > 0.0 {
            1.0 / step
        } else if delta < 0.0 {
            step
        } else {
            return;
        };
        let view = self.document.view().zoomed_at(self.pointer_world(), factor);
        self.document.set_view(view);
    }

    fn resized(&mut self, size: Size) {
        if size.width >= 1.0 && size.height >= 1.0 {
            self.interaction.framebuffer = size;
        } else {
            log::warn!("Ignoring framebuffer size {}x{}", size.width, size.height);
        }
    }

    /// Issue the draw calls for one frame.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let mut frame = Frame::new(&self.document).with_selection(self.selection);
        if self.mode == EditorMode::Draw {
            let cursor = self.pointer_world();
            let snap = snap_point(
                &self.document,
                cursor,
                &self.hit_context(),
                self.settings.snap_threshold_px,
            );
            frame = frame
                .with_preview(self.tools.preview(snap.point))
                .with_snap_point(snap.target.map(|t| t.point));
        }
        draw_frame(renderer, &frame);
    }

    /// Save the document under `id`.
    pub fn save(&self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        storage.save(id, &self.document)
    }

    /// Replace the document with the one stored under `id`. On failure the
    /// current document is kept.
    pub fn load(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        match storage.load(id) {
            Ok(document) => {
                self.document = document;
                self.history.clear();
                self.tools.reset();
                self.shapes_replaced();
                log::info!("Loaded {} with {} shapes", id, self.document.len());
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingRenderer, SELECT_COLOR};
    use crate::shapes::{Circle, PointShape};
    use crate::storage::{MemoryStorage, StorageError};
    use crate::tools::CircleMode;

    fn screen(canvas: &Canvas, world: Point) -> Point {
        canvas
            .document
            .view()
            .world_to_screen(world, canvas.interaction.framebuffer)
    }

    fn press(canvas: &mut Canvas, button: MouseButton, world: Point) -> ToolOutcome {
        let position = screen(canvas, world);
        canvas.handle_event(&InputEvent::PointerDown { button, position })
    }

    fn key(canvas: &mut Canvas, chord: &str) {
        let (key, modifiers) = crate::input::parse_key_chord(chord);
        canvas.handle_event(&InputEvent::Key { key, modifiers });
    }

    #[test]
    fn test_pointer_events_report_measured_angle() {
        let mut canvas = Canvas::new();
        canvas.add_shape(crate::shapes::Line::segment(Point::new(-1.0, 0.0), Point::new(1.0, 0.0)).into());
        canvas.add_shape(crate::shapes::Line::infinite(Point::new(0.0, -1.0), Point::new(0.0, 1.0)).into());
        canvas.set_mode(EditorMode::Draw);
        canvas.set_tool(ToolKind::Line(crate::tools::LineMode::AngleCalculator));

        assert_eq!(press(&mut canvas, MouseButton::Left, Point::new(0.5, 0.0)), ToolOutcome::None);
        assert_eq!(canvas.tools.session().picked_index(), Some(0));
        let ToolOutcome::Measured(angle) = press(&mut canvas, MouseButton::Left, Point::new(0.0, 0.5)) else {
            panic!("expected a measurement");
        };
        assert!((angle - 90.0).abs() < 1e-9);
        assert_eq!(canvas.document.len(), 2);
    }

    #[test]
    fn test_draw_clicks_commit_with_undo() {
        let mut canvas = Canvas::new();
        canvas.set_mode(EditorMode::Draw);
        press(&mut canvas, MouseButton::Left, Point::new(0.0, 0.0));
        press(&mut canvas, MouseButton::Left, Point::new(1.0, 0.0));
        assert_eq!(canvas.document.len(), 2);
        assert_eq!(canvas.history.undo_len(), 2);

        key(&mut canvas, "ctrl+z");
        assert_eq!(canvas.document.len(), 1);
        key(&mut canvas, "ctrl+y");
        assert_eq!(canvas.document.len(), 2);
    }

    #[test]
    fn test_undo_redo_restores_exact_shapes() {
        let mut canvas = Canvas::new();
        canvas.add_shape(PointShape::new(Point::new(0.25, 0.5)).into());
        let before = canvas.document.shapes().to_vec();
        canvas.add_shape(Circle::new(Point::ZERO, 1.0).into());
        let after = canvas.document.shapes().to_vec();

        assert!(canvas.undo());
        assert_eq!(canvas.document.shapes(), &before[..]);
        assert!(canvas.redo());
        assert_eq!(canvas.document.shapes(), &after[..]);
        assert!(!canvas.redo());
    }

    #[test]
    fn test_navigate_selects_and_deletes() {
        let mut canvas = Canvas::new();
        canvas.add_shape(Circle::new(Point::ZERO, 1.0).into());
        press(&mut canvas, MouseButton::Left, Point::new(1.0, 0.0));
        canvas.handle_event(&InputEvent::PointerUp {
            button: MouseButton::Left,
        });
        assert_eq!(canvas.selection.selected(), Some(0));

        key(&mut canvas, "Delete");
        assert!(canvas.document.is_empty());
        assert_eq!(canvas.selection.selected(), None);
        assert!(canvas.undo());
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_point_drag_takes_one_snapshot() {
        let mut canvas = Canvas::new();
        canvas.add_shape(PointShape::new(Point::new(0.0, 0.0)).into());
        let undo_before = canvas.history.undo_len();

        press(&mut canvas, MouseButton::Left, Point::new(0.0, 0.0));
        assert_eq!(canvas.interaction.dragged_point(), Some(0));
        for x in [0.25, 0.5, 1.0] {
            let position = screen(&canvas, Point::new(x, 0.0));
            canvas.handle_event(&InputEvent::PointerMove { position });
        }
        canvas.handle_event(&InputEvent::PointerUp {
            button: MouseButton::Left,
        });

        let moved = canvas.document.get(0).and_then(Shape::as_point).unwrap().position;
        assert!((moved.x - 1.0).abs() < 1e-9 && moved.y.abs() < 1e-9);
        assert_eq!(canvas.history.undo_len(), undo_before + 1);
        canvas.undo();
        let restored = canvas.document.get(0).and_then(Shape::as_point).unwrap().position;
        assert_eq!(restored, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_press_on_empty_space_pans() {
        let mut canvas = Canvas::new();
        press(&mut canvas, MouseButton::Left, Point::new(0.0, 0.0));
        let start = canvas.interaction.pointer;
        canvas.handle_event(&InputEvent::PointerMove {
            position: start + kurbo::Vec2::new(256.0, 0.0),
        });
        // Dragging right by a quarter of the width moves the view left by 1.
        let view = canvas.document.view();
        assert!((view.left() + 3.0).abs() < 1e-9);
        assert!((view.right() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scroll_zooms_about_pointer() {
        let mut canvas = Canvas::new();
        let anchor = Point::new(1.0, 0.5);
        canvas.handle_event(&InputEvent::PointerMove {
            position: screen(&canvas, anchor),
        });
        let width = canvas.document.view().width();
        canvas.handle_event(&InputEvent::Scroll { delta: 1.0 });
        assert!(canvas.document.view().width() < width);
        let after = canvas.pointer_world();
        assert!((after.x - anchor.x).abs() < 1e-9 && (after.y - anchor.y).abs() < 1e-9);
        canvas.handle_event(&InputEvent::Scroll { delta: -1.0 });
        assert!((canvas.document.view().width() - width).abs() < 1e-9);
    }

    #[test]
    fn test_mode_toggle_resets_tool_session() {
        let mut canvas = Canvas::new();
        key(&mut canvas, "p");
        assert_eq!(canvas.mode(), EditorMode::Draw);
        canvas.set_tool(ToolKind::Circle(CircleMode::CenterThenPoint));
        canvas.click_world(Point::new(0.0, 0.0));
        assert_ne!(canvas.tools.session(), &ToolSession::Idle);
        key(&mut canvas, "P");
        assert_eq!(canvas.mode(), EditorMode::Navigate);
        assert_eq!(canvas.tools.session(), &ToolSession::Idle);
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_right_click_finishes_polyline() {
        let mut canvas = Canvas::new();
        canvas.set_mode(EditorMode::Draw);
        canvas.set_tool(ToolKind::Polyline);
        press(&mut canvas, MouseButton::Left, Point::new(0.0, 0.0));
        press(&mut canvas, MouseButton::Left, Point::new(1.0, 0.5));
        press(&mut canvas, MouseButton::Right, Point::new(1.0, 0.5));
        assert_eq!(canvas.document.len(), 1);
        assert_eq!(canvas.tools.session(), &ToolSession::Idle);
    }

    #[test]
    fn test_selected_color_is_undoable() {
        let mut canvas = Canvas::new();
        assert!(!canvas.set_selected_color(Rgb::WHITE));
        canvas.add_shape(Circle::new(Point::ZERO, 1.0).into());
        canvas.selection.select(0);
        assert!(canvas.set_selected_color(Rgb::WHITE));
        assert_eq!(canvas.document.get(0).map(Shape::color), Some(Rgb::WHITE));
        canvas.undo();
        assert_eq!(canvas.document.get(0).map(Shape::color), Some(Rgb::BLACK));
    }

    #[test]
    fn test_load_failure_keeps_document() {
        let storage = MemoryStorage::new();
        storage.insert_raw("broken", "0 1 0 1\n1\n42 0 0 0\n").unwrap();
        let mut canvas = Canvas::new();
        canvas.add_shape(PointShape::new(Point::ZERO).into());
        let err = canvas.load(&storage, "broken").unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { line: 3, .. }));
        assert_eq!(canvas.document.len(), 1);
        assert!(canvas.history.can_undo());
    }

    #[test]
    fn test_save_then_load_resets_history() {
        let storage = MemoryStorage::new();
        let mut canvas = Canvas::new();
        canvas.add_shape(Circle::new(Point::new(0.5, 0.5), 0.25).into());
        canvas.save(&storage, "drawing").unwrap();

        let mut other = Canvas::new();
        other.add_shape(PointShape::new(Point::ZERO).into());
        other.selection.select(0);
        other.load(&storage, "drawing").unwrap();
        assert_eq!(other.document.shapes(), canvas.document.shapes());
        assert!(!other.history.can_undo());
        assert_eq!(other.selection.selected(), None);
    }

    #[test]
    fn test_draw_highlights_selection() {
        let mut canvas = Canvas::new();
        canvas.add_shape(Circle::new(Point::ZERO, 1.0).into());
        canvas.selection.select(0);
        let mut renderer = RecordingRenderer::new();
        canvas.draw(&mut renderer);
        assert_eq!(renderer.calls_with_color(SELECT_COLOR).count(), 1);
    }
}
