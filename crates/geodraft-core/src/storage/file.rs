//! File-based storage.

use super::text::{read_document, write_document};
use super::{Storage, StorageError, StorageResult};
use crate::document::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for saved drawings: `<data_dir>/geodraft/save`.
///
/// Falls back to `./save` when the platform has no data directory.
pub fn default_save_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("geodraft").join("save"))
        .unwrap_or_else(|| PathBuf::from("save"))
}

/// Stores drawings as text files.
///
/// IDs are file names: relative ones resolve under the base directory,
/// absolute ones are used as is.
pub struct FileStorage {
    /// Base directory for relative names.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`.
    ///
    /// The directory is created lazily on the first save.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create file storage in the default save directory.
    pub fn default_location() -> Self {
        Self::new(default_save_dir())
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a drawing name to the file it lives in.
    pub fn resolve_path(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &Document) -> StorageResult<()> {
        let path = self.resolve_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&path, write_document(document))
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Saved {} shapes to {}", document.len(), path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<Document> {
        let path = self.resolve_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        read_document(&text)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.resolve_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.resolve_path(id).exists())
    }
}
