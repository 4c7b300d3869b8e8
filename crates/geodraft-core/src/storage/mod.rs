//! Saving and loading drawings.

mod file;
mod memory;
pub mod text;

pub use file::{FileStorage, default_save_dir};
pub use memory::MemoryStorage;
pub use text::{read_document, write_document};

use crate::document::Document;
use thiserror::Error;

/// Why a drawing could not be saved or loaded.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("drawing not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result of a storage call.
pub type StorageResult<T> = Result<T, StorageError>;

/// A place drawings are kept, addressed by name.
///
/// Every call completes synchronously; the editor runs on a single thread.
pub trait Storage {
    /// Write `document` under `id`, replacing any previous drawing.
    fn save(&self, id: &str, document: &Document) -> StorageResult<()>;

    /// Decode the drawing stored under `id`.
    fn load(&self, id: &str) -> StorageResult<Document>;

    /// Remove the drawing stored under `id`.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Names of every stored drawing, sorted.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Whether a drawing is stored under `id`.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
