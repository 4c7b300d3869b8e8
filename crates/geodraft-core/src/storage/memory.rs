//! In-memory storage implementation.

use super::text::{read_document, write_document};
use super::{Storage, StorageError, StorageResult};
use crate::document::Document;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Drawings are held in their text encoding, so loads go through the same
/// validation as files on disk.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw encoded text under `id`, bypassing the encoder.
    pub fn insert_raw(&self, id: &str, text: impl Into<String>) -> StorageResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        docs.insert(id.to_string(), text.into());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &Document) -> StorageResult<()> {
        self.insert_raw(id, write_document(document))
    }

    fn load(&self, id: &str) -> StorageResult<Document> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let text = docs
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        read_document(text)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        docs.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let mut ids: Vec<String> = docs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(docs.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::PointShape;
    use kurbo::Point;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut doc = Document::new();
        doc.push(PointShape::new(Point::new(1.0, 2.0)).into());

        storage.save("test", &doc).unwrap();
        assert!(storage.exists("test").unwrap());

        let loaded = storage.load("test").unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.load("nope"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_list() {
        let storage = MemoryStorage::new();
        storage.save("b", &Document::new()).unwrap();
        storage.save("a", &Document::new()).unwrap();
        assert_eq!(storage.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
        storage.delete("a").unwrap();
        assert!(!storage.exists("a").unwrap());
        assert_eq!(storage.list().unwrap().len(), 1);
    }

    #[test]
    fn test_raw_garbage_is_malformed() {
        let storage = MemoryStorage::new();
        storage.insert_raw("bad", "0 1 0 1\n1\n42 0 0 0\n").unwrap();
        assert!(matches!(
            storage.load("bad"),
            Err(StorageError::MalformedRecord { line: 3, .. })
        ));
    }
}
