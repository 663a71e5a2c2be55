//! Document store endpoints.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::broadcast::error::RecvError;

use super::{current_revision, error, success, ApiResult};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::store::{DocPath, DocumentQuery, DocumentSnapshot, StoredDocument, WriteMode};
use crate::AppState;

/// Query string of `GET /api/collections/{collection}/docs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub field: Option<String>,
    /// JSON literal (`true`, `3`, `"x"`); anything else is compared as a string.
    pub equals: Option<String>,
    pub order_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub direction: Option<String>,
    pub limit: Option<usize>,
}

impl QueryParams {
    pub fn into_query(self) -> Result<DocumentQuery, AppError> {
        let descending = match self.direction.as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "Invalid direction {}, expected asc or desc",
                    other
                )))
            }
        };
        if self.equals.is_some() && self.field.is_none() {
            return Err(AppError::Validation(
                "equals requires a field to compare".to_string(),
            ));
        }

        let equals = self
            .equals
            .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)));

        Ok(DocumentQuery {
            field: self.field,
            equals,
            order_by: self.order_by,
            descending,
            limit: self.limit,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WriteParams {
    /// Overwrite only the top-level keys present in the body.
    #[serde(default)]
    pub merge: bool,
}

fn into_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(data) => Ok(data),
        _ => Err(AppError::Validation(
            "Document body must be a JSON object".to_string(),
        )),
    }
}

/// GET /api/collections/{collection}/docs - Filtered, ordered list.
pub async fn query_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Vec<StoredDocument>> {
    let revision_id = current_revision(&state).await;

    let query = match params.into_query() {
        Ok(query) => query,
        Err(e) => return error(e, revision_id),
    };

    match state.store.query(&collection, &query).await {
        Ok(docs) => success(docs, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/collections/{collection}/docs - Insert under a generated id.
pub async fn add_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StoredDocument> {
    let revision_id = current_revision(&state).await;

    let data = match into_object(body) {
        Ok(data) => data,
        Err(e) => return error(e, revision_id),
    };

    match state.store.add(&collection, data).await {
        Ok(doc) => {
            let new_revision = doc.revision;
            success(doc, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/collections/{collection}/docs/{id} - Snapshot, `exists: false` when absent.
pub async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<DocumentSnapshot> {
    let revision_id = current_revision(&state).await;

    let path = match DocPath::new(&collection, &id) {
        Ok(path) => path,
        Err(e) => return error(e, revision_id),
    };

    match state.store.snapshot(&path).await {
        Ok(snapshot) => success(snapshot, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/collections/{collection}/docs/{id}?merge= - Replace or merge.
pub async fn put_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(params): Query<WriteParams>,
    Json(body): Json<Value>,
) -> ApiResult<StoredDocument> {
    let revision_id = current_revision(&state).await;

    let parts = DocPath::new(&collection, &id).and_then(|p| Ok((p, into_object(body)?)));
    let (path, data) = match parts {
        Ok(parts) => parts,
        Err(e) => return error(e, revision_id),
    };
    let mode = if params.merge {
        WriteMode::Merge
    } else {
        WriteMode::Replace
    };

    match state.store.set(&path, data, mode).await {
        Ok(doc) => {
            let new_revision = doc.revision;
            success(doc, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn snapshot_event(name: &str, snapshot: &DocumentSnapshot) -> Result<Event, Infallible> {
    Ok(Event::default()
        .event(name)
        .json_data(snapshot)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string())))
}

/// GET /api/collections/{collection}/docs/{id}/subscribe - Server-sent snapshots.
///
/// Emits the current snapshot first, then one `snapshot` event per write to the
/// document. A subscriber that falls behind gets a `resync` event with a fresh read.
pub async fn subscribe_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppErrorWithRevision> {
    let revision_id = current_revision(&state).await;
    let wrap = |error| AppErrorWithRevision { error, revision_id };

    let path = DocPath::new(&collection, &id).map_err(wrap)?;
    let updates = state.store.subscribe();
    let initial = state.store.snapshot(&path).await.map_err(wrap)?;
    tracing::debug!("Subscriber attached to {}", path);

    let first = stream::once(async move { snapshot_event("snapshot", &initial) });
    let rest = stream::unfold(
        (updates, state.store.clone(), path),
        |(mut updates, store, path)| async move {
            loop {
                match updates.recv().await {
                    Ok(snapshot) if snapshot.is_for(&path) => {
                        let event = snapshot_event("snapshot", &snapshot);
                        return Some((event, (updates, store, path)));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Subscriber of {} lagged by {} snapshots", path, skipped);
                        match store.snapshot(&path).await {
                            Ok(snapshot) => {
                                let event = snapshot_event("resync", &snapshot);
                                return Some((event, (updates, store, path)));
                            }
                            Err(e) => tracing::warn!("Resync of {} failed: {}", path, e),
                        }
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        },
    );

    Ok(Sse::new(first.chain(rest)).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_parse_equals_literals() {
        let query = QueryParams {
            field: Some("articleId".to_string()),
            equals: Some("service1".to_string()),
            order_by: Some("createdAt".to_string()),
            direction: Some("desc".to_string()),
            limit: Some(5),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.equals, Some(Value::String("service1".to_string())));
        assert!(query.descending);

        let query = QueryParams {
            field: Some("approved".to_string()),
            equals: Some("true".to_string()),
            ..Default::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query.equals, Some(Value::Bool(true)));
    }

    #[test]
    fn test_query_params_reject_bad_input() {
        let bad_direction = QueryParams {
            direction: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_direction.into_query(), Err(AppError::Validation(_))));

        let equals_without_field = QueryParams {
            equals: Some("x".to_string()),
            ..Default::default()
        };
        assert!(equals_without_field.into_query().is_err());
    }

    #[test]
    fn test_body_must_be_object() {
        assert!(into_object(serde_json::json!({"a": 1})).is_ok());
        assert!(into_object(serde_json::json!([1, 2])).is_err());
    }
}
