//! Site CMS Backend
//!
//! Named-document content store with live subscriptions, the appliers that turn
//! website documents into a rendered page, and the admin editing session.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod page;
pub mod render;
pub mod store;
pub mod sync;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use editor::EditorSession;
use store::ContentStore;
use sync::{Debouncer, SiteController};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub site: Arc<RwLock<SiteController>>,
    pub config: Arc<Config>,
    /// Admin form shared by the editor endpoints.
    pub editor: Arc<Mutex<EditorSession>>,
    /// Saves the editor's settings after `Config::autosave_quiet`.
    pub autosave: Debouncer,
}

/// CORS for the configured origins only; none configured means same-origin only.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ])
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Clone PSK for the write gate
    let psk = state.config.admin_psk.clone();

    // API routes
    let api_routes = Router::new()
        .route("/revision", get(api::get_revision))
        .route("/site/page", get(api::get_page))
        // Admin editor
        .route("/editor/page", get(api::get_editor_page))
        .route("/editor/reload", post(api::reload_editor))
        .route("/editor/settings/{key}", put(api::put_setting))
        // Documents
        .route(
            "/collections/{collection}/docs",
            get(api::query_documents).post(api::add_document),
        )
        .route(
            "/collections/{collection}/docs/{id}",
            get(api::get_document).put(api::put_document),
        )
        .route(
            "/collections/{collection}/docs/{id}/subscribe",
            get(api::subscribe_document),
        )
        // Writes need the admin key
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_write_layer(psk.clone(), req, next)
        }));

    // Public pages and health check (no auth required)
    let public_routes = Router::new()
        .route("/", get(api::show_index))
        .route("/custom", get(api::show_custom_page))
        .route("/detail", get(api::show_article))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.allowed_origins)),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
