//! Admin editor endpoints over the shared editing session.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::SettingsDocument;
use crate::page::settings::{descriptor, SettingKind};
use crate::page::Page;
use crate::AppState;

/// Body of `PUT /api/editor/settings/{key}`: `value` for inputs, `checked` for toggles.
#[derive(Debug, Default, Deserialize)]
pub struct SettingInput {
    pub value: Option<String>,
    pub checked: Option<bool>,
}

/// GET /api/editor/page - The admin form as currently filled.
pub async fn get_editor_page(State(state): State<AppState>) -> ApiResult<Page> {
    let revision_id = current_revision(&state).await;
    let page = state.editor.lock().await.page().clone();
    success(page, revision_id)
}

/// POST /api/editor/reload - Refill the form from the store.
pub async fn reload_editor(State(state): State<AppState>) -> ApiResult<Page> {
    let revision_id = current_revision(&state).await;
    let mut session = state.editor.lock().await;
    match session.load().await {
        Ok(()) => success(session.page().clone(), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/editor/settings/{key} - Change one settings control.
///
/// The settings document is saved once edits have been quiet for the autosave period.
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<SettingInput>,
) -> ApiResult<SettingsDocument> {
    let revision_id = current_revision(&state).await;

    let Some(setting) = descriptor(&key) else {
        return error(AppError::NotFound(format!("Unknown setting {}", key)), revision_id);
    };

    let mut session = state.editor.lock().await;
    let changed = match (setting.kind, input) {
        (SettingKind::Toggle { .. }, SettingInput { checked: Some(checked), .. }) => {
            session.set_checked(setting.key, checked)
        }
        (SettingKind::Toggle { .. }, _) => Err(AppError::Validation(format!(
            "{} is a toggle, send checked",
            key
        ))),
        (_, SettingInput { value: Some(value), .. }) => session.set_input(setting.key, &value),
        (_, _) => Err(AppError::Validation(format!("{} needs a value", key))),
    };
    if let Err(e) = changed {
        return error(e, revision_id);
    }
    let pending = session.collect_settings();
    drop(session);

    state.autosave.notify();
    tracing::debug!("Setting {} changed, auto-save scheduled", key);
    success(pending, revision_id)
}
