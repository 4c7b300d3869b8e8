//! The drawing: an ordered shape collection plus the visible view.

use crate::camera::ViewRect;
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};

/// A construction document.
///
/// Shape order is z-order: later shapes draw on top and win hit-test ties.
/// Other components refer to shapes by index only; any index may go stale
/// after a mutation that resizes or replaces the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    shapes: Vec<Shape>,
    view: ViewRect,
}

impl Document {
    /// Create an empty document showing the default view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(view: ViewRect) -> Self {
        Self {
            shapes: Vec::new(),
            view,
        }
    }

    pub(crate) fn from_parts(shapes: Vec<Shape>, view: ViewRect) -> Self {
        Self { shapes, view }
    }

    pub fn view(&self) -> ViewRect {
        self.view
    }

    pub fn set_view(&mut self, view: ViewRect) {
        self.view = view;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Look up a shape, treating out-of-range indices as absent.
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Append a shape on top and return its index.
    pub fn push(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Swap in a whole new shape collection, returning the old one.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) -> Vec<Shape> {
        std::mem::replace(&mut self.shapes, shapes)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Export the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
