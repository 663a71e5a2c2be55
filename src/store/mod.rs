//! Named JSON document store with live subscriptions.
//!
//! Documents live in collections (`website`, `customPages`, `articles`, ...).
//! Every write bumps a global revision and is pushed to all subscribers.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::cmp::Ordering;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::errors::AppError;
use crate::models::RevisionInfo;

/// Collection holding the site-wide documents.
pub const WEBSITE: &str = "website";

/// Snapshot channel capacity; slower subscribers observe `Lagged` and resync.
const SNAPSHOT_CAPACITY: usize = 256;

static COLLECTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]{0,63}$").unwrap());
static DOCUMENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").unwrap());

/// Address of one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: String,
    pub id: String,
}

impl DocPath {
    /// Build a validated path.
    pub fn new(collection: &str, id: &str) -> Result<Self, AppError> {
        validate_collection(collection)?;
        if !DOCUMENT_ID.is_match(id) {
            return Err(AppError::Validation(format!("Invalid document id: {}", id)));
        }
        Ok(Self {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    /// Path of a document in the `website` collection.
    pub fn website(id: &str) -> Self {
        Self {
            collection: WEBSITE.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

pub fn validate_collection(collection: &str) -> Result<(), AppError> {
    if COLLECTION_NAME.is_match(collection) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid collection name: {}",
            collection
        )))
    }
}

/// A persisted document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub collection: String,
    pub id: String,
    pub data: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
    pub revision: i64,
}

impl StoredDocument {
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            collection: self.collection.clone(),
            id: self.id.clone(),
            exists: true,
            data: Some(self.data.clone()),
            revision: self.revision,
            updated_at: Some(self.updated_at.clone()),
        }
    }
}

/// What readers and subscribers observe for one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub collection: String,
    pub id: String,
    pub exists: bool,
    pub data: Option<Map<String, Value>>,
    pub revision: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl DocumentSnapshot {
    /// Snapshot of a document that does not exist (yet).
    pub fn missing(path: &DocPath, revision: i64) -> Self {
        Self {
            collection: path.collection.clone(),
            id: path.id.clone(),
            exists: false,
            data: None,
            revision,
            updated_at: None,
        }
    }

    pub fn is_for(&self, path: &DocPath) -> bool {
        self.collection == path.collection && self.id == path.id
    }
}

/// How `set` combines the incoming object with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The incoming object becomes the whole document.
    Replace,
    /// Only the incoming top-level keys are overwritten.
    Merge,
}

/// Equality filter plus ordering over one collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub equals: Option<Value>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Get / set-with-merge / subscribe primitives over named JSON documents.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read one document; a miss is `Ok(None)`.
    async fn get(&self, path: &DocPath) -> Result<Option<StoredDocument>, AppError>;

    /// Write one document, creating it if needed.
    async fn set(
        &self,
        path: &DocPath,
        data: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<StoredDocument, AppError>;

    /// Insert a document under a generated id.
    async fn add(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<StoredDocument, AppError>;

    /// Filter and order the documents of a collection.
    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, AppError>;

    /// Current revision of the whole store.
    async fn revision(&self) -> Result<RevisionInfo, AppError>;

    /// Open a subscription receiving a snapshot for every write.
    fn subscribe(&self) -> broadcast::Receiver<DocumentSnapshot>;

    /// Read one document as a snapshot, `exists: false` on a miss.
    async fn snapshot(&self, path: &DocPath) -> Result<DocumentSnapshot, AppError> {
        match self.get(path).await? {
            Some(doc) => Ok(doc.snapshot()),
            None => {
                let revision = self.revision().await?.revision_id;
                Ok(DocumentSnapshot::missing(path, revision))
            }
        }
    }
}

/// Fan-out of write snapshots to every open subscription.
#[derive(Debug, Clone)]
pub struct SnapshotHub {
    tx: broadcast::Sender<DocumentSnapshot>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SNAPSHOT_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, snapshot: DocumentSnapshot) {
        // No receivers is fine: nobody is watching right now.
        let receivers = self.tx.send(snapshot).unwrap_or(0);
        tracing::debug!("Published snapshot to {} subscribers", receivers);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine a stored object with an incoming one according to `mode`.
pub fn combine(
    existing: Option<Map<String, Value>>,
    incoming: Map<String, Value>,
    mode: WriteMode,
) -> Map<String, Value> {
    match (mode, existing) {
        (WriteMode::Merge, Some(mut current)) => {
            for (key, value) in incoming {
                current.insert(key, value);
            }
            current
        }
        _ => incoming,
    }
}

/// Filter, sort and truncate documents the same way for every backend.
pub fn run_query(mut docs: Vec<StoredDocument>, query: &DocumentQuery) -> Vec<StoredDocument> {
    if let (Some(field), Some(expected)) = (&query.field, &query.equals) {
        docs.retain(|doc| doc.data.get(field) == Some(expected));
    }

    if let Some(order_by) = &query.order_by {
        docs.sort_by(|a, b| {
            let ordering = compare_values(&sort_key(a, order_by), &sort_key(b, order_by));
            if query.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    if let Some(limit) = query.limit {
        docs.truncate(limit);
    }
    docs
}

fn sort_key(doc: &StoredDocument, field: &str) -> Value {
    match doc.data.get(field) {
        Some(value) => value.clone(),
        None => match field {
            "createdAt" => Value::String(doc.created_at.clone()),
            "updatedAt" => Value::String(doc.updated_at.clone()),
            _ => Value::Null,
        },
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        // Missing values sort first.
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn doc(id: &str, data: Value, created_at: &str) -> StoredDocument {
        StoredDocument {
            collection: "comments".to_string(),
            id: id.to_string(),
            data: object(data),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
            revision: 1,
        }
    }

    #[test]
    fn test_doc_path_validation() {
        assert!(DocPath::new("website", "settings").is_ok());
        assert!(DocPath::new("customPages", "custom-1700000000000").is_ok());
        assert!(DocPath::new("../etc", "passwd").is_err());
        assert!(DocPath::new("website", "").is_err());
        assert!(DocPath::new("website", "a/b").is_err());
    }

    #[test]
    fn test_merge_only_touches_incoming_keys() {
        let existing = object(json!({"session1": {"title1": "A"}, "session2": {"heading": "B"}}));
        let incoming = object(json!({"session2": {"heading": "C"}}));

        let merged = combine(Some(existing), incoming, WriteMode::Merge);
        assert_eq!(merged["session1"], json!({"title1": "A"}));
        assert_eq!(merged["session2"], json!({"heading": "C"}));
    }

    #[test]
    fn test_replace_drops_absent_keys() {
        let existing = object(json!({"show-social": false, "body-font": "serif"}));
        let incoming = object(json!({"body-font": "Arial"}));

        let replaced = combine(Some(existing), incoming, WriteMode::Replace);
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced["body-font"], "Arial");
    }

    #[test]
    fn test_query_filters_and_orders_descending() {
        let docs = vec![
            doc("a", json!({"articleId": "service1", "name": "first"}), "2025-01-01T00:00:00Z"),
            doc("b", json!({"articleId": "service2", "name": "other"}), "2025-01-02T00:00:00Z"),
            doc("c", json!({"articleId": "service1", "name": "second"}), "2025-01-03T00:00:00Z"),
        ];
        let query = DocumentQuery {
            field: Some("articleId".to_string()),
            equals: Some(json!("service1")),
            order_by: Some("createdAt".to_string()),
            descending: true,
            limit: None,
        };

        let ids: Vec<_> = run_query(docs, &query).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_query_limit_and_numeric_order() {
        let docs = vec![
            doc("x", json!({"order": 2}), "t"),
            doc("y", json!({"order": 0}), "t"),
            doc("z", json!({"order": 1}), "t"),
        ];
        let query = DocumentQuery {
            order_by: Some("order".to_string()),
            limit: Some(2),
            ..Default::default()
        };

        let ids: Vec<_> = run_query(docs, &query).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["y", "z"]);
    }
}
