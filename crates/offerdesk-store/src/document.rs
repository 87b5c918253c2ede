//! # Document Store
//!
//! A flat JSON document store: one file per document, grouped in
//! collection directories.
//!
//! ## Layout On Disk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <root>/                                                                │
//! │    config/                                                              │
//! │      catalog.json            ← singleton catalog document               │
//! │    offers/                                                              │
//! │      5e93…c2.json            ← one offer record per file                │
//! │      9a01…77.json                                                       │
//! │                                                                         │
//! │  Writes are atomic: encode → write <id>.json.tmp → rename over          │
//! │  <id>.json. A crash mid-write leaves the old document intact.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads distinguish "absent" (`Ok(None)`) from "present but broken"
//! (`Err(Corrupt)`); repositories decide which of those is an error.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Handle to a document root directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Creates a store rooted at `root`. The directory is created lazily
    /// on first write; a missing root simply reads as empty.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DocumentStore { root: root.into() }
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(collection).join(format!("{}.json", id))
    }

    /// Reads and decodes one document.
    ///
    /// ## Returns
    /// - `Ok(Some(doc))` when present and valid
    /// - `Ok(None)` when the file does not exist
    /// - `Err(Corrupt)` when the file exists but does not decode
    pub async fn read<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let path = self.doc_path(collection, id);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(collection = %collection, id = %id, "Document absent");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| StoreError::corrupt(path.display().to_string(), err.to_string()))
    }

    /// Encodes and writes one document atomically.
    ///
    /// The document is written to a `.tmp` sibling first and renamed into
    /// place, so readers never observe a half-written file.
    pub async fn write<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        doc: &T,
    ) -> StoreResult<()> {
        let path = self.doc_path(collection, id);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).await?;

        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;

        debug!(collection = %collection, id = %id, bytes = bytes.len(), "Document written");
        Ok(())
    }

    /// Removes one document. Returns whether it existed.
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let path = self.doc_path(collection, id);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(collection = %collection, id = %id, "Document deleted");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the document ids of a collection, sorted. A collection that
    /// was never written lists as empty. In-flight `.tmp` files are
    /// invisible here.
    pub async fn list_ids(&self, collection: &str) -> StoreResult<Vec<String>> {
        let dir = self.root.join(collection);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        value: i64,
    }

    fn temp_store() -> DocumentStore {
        let root = std::env::temp_dir().join(format!("offerdesk-store-test-{}", Uuid::new_v4()));
        DocumentStore::new(root)
    }

    async fn cleanup(store: &DocumentStore) {
        let _ = fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let store = temp_store();
        let doc = Doc {
            name: "alpha".to_string(),
            value: 42,
        };

        store.write("things", "a", &doc).await.unwrap();
        let back: Doc = store.read("things", "a").await.unwrap().unwrap();
        assert_eq!(back, doc);

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_none() {
        let store = temp_store();
        let result: Option<Doc> = store.read("things", "nope").await.unwrap();
        assert!(result.is_none());
        cleanup(&store).await;
    }

    #[tokio::test]
    async fn test_corrupt_document_is_distinct_error() {
        let store = temp_store();
        store
            .write("things", "a", &Doc { name: "x".to_string(), value: 1 })
            .await
            .unwrap();

        // Break the file behind the store's back.
        let path = store.root().join("things").join("a.json");
        fs::write(&path, b"{ not json").await.unwrap();

        let err = store.read::<Doc>("things", "a").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn test_delete() {
        let store = temp_store();
        store
            .write("things", "a", &Doc { name: "x".to_string(), value: 1 })
            .await
            .unwrap();

        assert!(store.delete("things", "a").await.unwrap());
        assert!(!store.delete("things", "a").await.unwrap());
        assert!(store.read::<Doc>("things", "a").await.unwrap().is_none());

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn test_list_ids_sorted() {
        let store = temp_store();
        for id in ["charlie", "alpha", "bravo"] {
            store
                .write("things", id, &Doc { name: id.to_string(), value: 0 })
                .await
                .unwrap();
        }

        let ids = store.list_ids("things").await.unwrap();
        assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);

        // An unwritten collection lists as empty.
        assert!(store.list_ids("other").await.unwrap().is_empty());

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn test_write_replaces_existing() {
        let store = temp_store();
        store
            .write("things", "a", &Doc { name: "old".to_string(), value: 1 })
            .await
            .unwrap();
        store
            .write("things", "a", &Doc { name: "new".to_string(), value: 2 })
            .await
            .unwrap();

        let back: Doc = store.read("things", "a").await.unwrap().unwrap();
        assert_eq!(back.name, "new");
        assert_eq!(store.list_ids("things").await.unwrap().len(), 1);

        cleanup(&store).await;
    }
}
