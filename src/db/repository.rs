//! Database repository for document reads and writes.
//!
//! Each write runs in a transaction that also bumps the global revision.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::RevisionInfo;
use crate::store::{combine, DocPath, StoredDocument, WriteMode};

/// Database repository for all document operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Get a document by path.
    pub async fn get_document(&self, path: &DocPath) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query(
            "SELECT collection, id, data, created_at, updated_at, revision FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(&path.collection)
        .bind(&path.id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    /// List every document of a collection, ordered by id.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        let rows = sqlx::query(
            "SELECT collection, id, data, created_at, updated_at, revision FROM documents WHERE collection = ? ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(document_from_row).collect()
    }

    /// Replace or merge a document and bump the revision.
    pub async fn write_document(
        &self,
        path: &DocPath,
        data: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<StoredDocument, AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().to_rfc3339();

        let existing = sqlx::query(
            "SELECT collection, id, data, created_at, updated_at, revision FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(&path.collection)
        .bind(&path.id)
        .fetch_optional(&mut *tx)
        .await?
        .as_ref()
        .map(document_from_row)
        .transpose()?;

        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        let revision: i64 = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?
            .get("revision_id");

        let created_at = existing
            .as_ref()
            .map(|doc| doc.created_at.clone())
            .unwrap_or_else(|| now.clone());
        let merged = combine(existing.map(|doc| doc.data), data, mode);
        let data_json = serde_json::to_string(&merged)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at, revision)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                revision = excluded.revision
            "#,
        )
        .bind(&path.collection)
        .bind(&path.id)
        .bind(&data_json)
        .bind(&created_at)
        .bind(&now)
        .bind(revision)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StoredDocument {
            collection: path.collection.clone(),
            id: path.id.clone(),
            data: merged,
            created_at,
            updated_at: now,
            revision,
        })
    }
}

// ==================== ROW MAPPING ====================

fn document_from_row(row: &SqliteRow) -> Result<StoredDocument, AppError> {
    let raw: String = row.get("data");
    let data = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            let id: String = row.get("id");
            return Err(AppError::Database(format!(
                "Document {} is not a JSON object",
                id
            )));
        }
    };

    Ok(StoredDocument {
        collection: row.get("collection"),
        id: row.get("id"),
        data,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        revision: row.get("revision"),
    })
}
