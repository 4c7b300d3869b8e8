//! geodraft Core Library
//!
//! Document model, construction tools, snapping, picking and undo for the
//! geodraft 2D construction canvas. Rendering and windowing stay outside;
//! they talk to the core through [`render::Renderer`] and [`input::InputEvent`].

pub mod camera;
pub mod canvas;
pub mod document;
pub mod geometry;
pub mod history;
pub mod input;
pub mod render;
pub mod selection;
pub mod settings;
pub mod shapes;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod tools;

pub use camera::{ViewError, ViewRect};
pub use canvas::{Canvas, EditorMode};
pub use document::Document;
pub use geometry::GeometryError;
pub use history::History;
pub use input::{InputEvent, InteractionContext, Modifiers, MouseButton};
pub use render::{DrawCall, Frame, RecordingRenderer, Renderer};
pub use selection::{Hit, SelectionState, pick_shape};
pub use settings::{EditorSettings, SettingsError};
pub use shapes::{Rgb, Shape, ShapeKind};
pub use shortcuts::{Command, ShortcutRegistry};
pub use snap::{SnapResult, SnapTarget, SnapTargetKind, snap_point};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager, ToolOutcome, ToolParams};
