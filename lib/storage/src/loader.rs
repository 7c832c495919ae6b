//! Data loading pipeline: one JSON file into one collection.

use crate::store::DocumentStore;
use mongoschema_core::{DocumentBatch, Error, Result};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info};

/// Identifiers handed out by the store, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted_ids: Vec<String>,
}

impl InsertReport {
    pub fn count(&self) -> usize {
        self.inserted_ids.len()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.inserted_ids.first().map(String::as_str)
    }
}

pub struct DataLoader<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> DataLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Read and shape a data file. Nothing reaches the store on failure.
    pub fn read_file(path: &Path) -> Result<DocumentBatch> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let batch = DocumentBatch::from_slice(&bytes, path)?;
        debug!("Read {} document(s) from {}", batch.len(), path.display());
        Ok(batch)
    }

    /// Insert a batch: one document via `insert_one`, arrays in bulk
    pub async fn insert(&self, batch: DocumentBatch) -> Result<InsertReport> {
        let inserted_ids = match batch {
            DocumentBatch::Single(document) => vec![self.store.insert_one(document).await?],
            DocumentBatch::Many(documents) => self.store.insert_many(documents).await?,
        };
        info!(
            "Inserted {} document(s) into '{}'",
            inserted_ids.len(),
            self.store.collection_name()
        );
        Ok(InsertReport { inserted_ids })
    }

    pub async fn load_file(&self, path: &Path) -> Result<InsertReport> {
        let result = match Self::read_file(path) {
            Ok(batch) => self.insert(batch).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!("Failed to load {}: {}", path.display(), e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use std::fs;
    use tempfile::TempDir;

    fn write_data(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("data.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_single_object_inserts_one() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"{"a": 1}"#);
        let store = InMemoryStore::new("things");

        let report = DataLoader::new(&store).load_file(&path).await.unwrap();

        assert_eq!(report.count(), 1);
        assert_eq!(report.first_id(), store.ids().first().map(String::as_str));
    }

    #[tokio::test]
    async fn test_array_inserts_in_bulk() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"[{"a": 1}, {"a": 2}]"#);
        let store = InMemoryStore::new("things");

        let report = DataLoader::new(&store).load_file(&path).await.unwrap();

        assert_eq!(report.count(), 2);
        assert_eq!(store.documents().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_data_never_reaches_store() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryStore::new("things");
        store.fail_inserts("store must not be called");

        for contents in ["[]", "{}"] {
            let path = write_data(&dir, contents);
            let result = DataLoader::new(&store).load_file(&path).await;
            assert!(matches!(result, Err(Error::EmptyData)));
        }
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryStore::new("things");

        let result = DataLoader::new(&store)
            .load_file(&dir.path().join("nope.json"))
            .await;

        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_insertion_error() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"{"a": 1}"#);
        let store = InMemoryStore::new("things");
        store.fail_inserts("Document failed validation");

        let result = DataLoader::new(&store).load_file(&path).await;

        assert!(matches!(result, Err(Error::Insertion(_))));
    }
}
