//! In-memory document store.
//!
//! Used when the database cannot be opened and as the store behind unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};

use super::{
    combine, run_query, validate_collection, ContentStore, DocPath, DocumentQuery,
    DocumentSnapshot, SnapshotHub, StoredDocument, WriteMode,
};
use crate::errors::AppError;
use crate::models::RevisionInfo;

#[derive(Default)]
struct Inner {
    documents: HashMap<DocPath, StoredDocument>,
    revision_id: i64,
    generated_at: String,
}

/// Process-local store with the same semantics as the SQLite store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    hub: SnapshotHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<StoredDocument>, AppError> {
        Ok(self.inner.read().await.documents.get(path).cloned())
    }

    async fn set(
        &self,
        path: &DocPath,
        data: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<StoredDocument, AppError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now().to_rfc3339();
        inner.revision_id += 1;
        inner.generated_at = now.clone();
        let revision = inner.revision_id;

        let existing = inner.documents.get(path).cloned();
        let created_at = existing
            .as_ref()
            .map(|doc| doc.created_at.clone())
            .unwrap_or_else(|| now.clone());
        let document = StoredDocument {
            collection: path.collection.clone(),
            id: path.id.clone(),
            data: combine(existing.map(|doc| doc.data), data, mode),
            created_at,
            updated_at: now,
            revision,
        };
        inner.documents.insert(path.clone(), document.clone());

        // Publish under the lock so subscribers see revisions in order.
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
        let mut docs: Vec<StoredDocument> = self
            .inner
            .read()
            .await
            .documents
            .values()
            .filter(|doc| doc.collection == collection)
            .cloned()
            .collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(run_query(docs, query))
    }

    async fn revision(&self) -> Result<RevisionInfo, AppError> {
        let inner = self.inner.read().await;
        Ok(RevisionInfo {
            revision_id: inner.revision_id,
            generated_at: inner.generated_at.clone(),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentSnapshot> {
        self.hub.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        let doc = store.get(&DocPath::website("content")).await.unwrap();
        assert!(doc.is_none());

        let snapshot = store.snapshot(&DocPath::website("content")).await.unwrap();
        assert!(!snapshot.exists);
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn test_per_section_merge() {
        let store = MemoryStore::new();
        let path = DocPath::website("content");

        store
            .set(&path, object(json!({"session1": {"title1": "Hi"}})), WriteMode::Merge)
            .await
            .unwrap();
        store
            .set(&path, object(json!({"session2": {"heading": "Services"}})), WriteMode::Merge)
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.data["session1"]["title1"], "Hi");
        assert_eq!(doc.data["session2"]["heading"], "Services");
        assert_eq!(doc.revision, 2);
    }

    #[tokio::test]
    async fn test_subscribers_observe_writes() {
        let store = MemoryStore::new();
        let mut first = store.subscribe();
        let mut second = store.subscribe();

        store
            .set(
                &DocPath::website("settings"),
                object(json!({"show-social": false})),
                WriteMode::Replace,
            )
            .await
            .unwrap();

        for rx in [&mut first, &mut second] {
            let snapshot = rx.recv().await.unwrap();
            assert!(snapshot.is_for(&DocPath::website("settings")));
            assert_eq!(snapshot.data.unwrap()["show-social"], false);
        }
    }

    #[tokio::test]
    async fn test_add_generates_id_and_keeps_created_at() {
        let store = MemoryStore::new();
        let doc = store
            .add("comments", object(json!({"articleId": "mission", "approved": false})))
            .await
            .unwrap();
        assert_eq!(doc.collection, "comments");
        assert!(!doc.id.is_empty());

        let path = DocPath::new("comments", &doc.id).unwrap();
        let updated = store
            .set(&path, object(json!({"approved": false})), WriteMode::Merge)
            .await
            .unwrap();
        assert_eq!(updated.created_at, doc.created_at);
        assert_eq!(updated.data["articleId"], "mission");
    }

    #[tokio::test]
    async fn test_concurrent_writers_publish_in_revision_order() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut rx = store.subscribe();

        let writers: Vec<_> = (0..50)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .set(
                            &DocPath::website("settings"),
                            object(json!({"writer": n})),
                            WriteMode::Replace,
                        )
                        .await
                        .unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let mut revisions = Vec::new();
        for _ in 0..50 {
            revisions.push(rx.recv().await.unwrap().revision);
        }
        assert_eq!(revisions, (1..=50).collect::<Vec<i64>>());
    }
}
