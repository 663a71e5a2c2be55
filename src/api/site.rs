//! Live site endpoints.

use axum::extract::State;

use super::{current_revision, error, success, ApiResult};
use crate::models::RevisionInfo;
use crate::page::Page;
use crate::AppState;

/// GET /api/revision - Current store revision.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    match state.store.revision().await {
        Ok(info) => {
            let revision_id = info.revision_id;
            success(info, revision_id)
        }
        Err(e) => error(e, 0),
    }
}

/// GET /api/site/page - The public page as currently rendered.
pub async fn get_page(State(state): State<AppState>) -> ApiResult<Page> {
    let revision_id = current_revision(&state).await;
    let page = state.site.read().await.page().clone();
    success(page, revision_id)
}
