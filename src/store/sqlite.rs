//! SQLite-backed document store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, Mutex};

use super::{
    run_query, validate_collection, ContentStore, DocPath, DocumentQuery, DocumentSnapshot,
    SnapshotHub, StoredDocument, WriteMode,
};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::RevisionInfo;

/// Document store persisting to SQLite through the repository.
pub struct SqliteStore {
    repo: Repository,
    hub: SnapshotHub,
    // Merge is read-modify-write; writers go one at a time.
    write_lock: Mutex<()>,
}

impl SqliteStore {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            hub: SnapshotHub::new(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn get(&self, path: &DocPath) -> Result<Option<StoredDocument>, AppError> {
        self.repo.get_document(path).await
    }

    async fn set(
        &self,
        path: &DocPath,
        data: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<StoredDocument, AppError> {
        let _guard = self.write_lock.lock().await;
        let document = self.repo.write_document(path, data, mode).await?;
        tracing::info!("Stored {} at revision {}", path, document.revision);

        self.hub.publish(document.snapshot());
        Ok(document)
    }

    async fn add(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<StoredDocument, AppError> {
        let path = DocPath::new(collection, &uuid::Uuid::new_v4().simple().to_string())?;
        self.set(&path, data, WriteMode::Replace).await
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, AppError> {
        validate_collection(collection)?;
        let docs = self.repo.list_documents(collection).await?;
        Ok(run_query(docs, query))
    }

    async fn revision(&self) -> Result<RevisionInfo, AppError> {
        self.repo.get_revision_info().await
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentSnapshot> {
        self.hub.subscribe()
    }
}
