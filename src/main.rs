//! Site CMS Backend
//!
//! Serves the live public page and the document store API over SQLite.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitecms_backend::config::Config;
use sitecms_backend::db::{self, Repository};
use sitecms_backend::editor::{spawn_autosave, EditorSession};
use sitecms_backend::store::{ContentStore, MemoryStore, SqliteStore};
use sitecms_backend::sync::{spawn_live_renderer, SiteController};
use sitecms_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Site CMS Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.admin_psk.is_none() {
        tracing::warn!("No admin PSK configured (SITECMS_ADMIN_PSK). Writes are open!");
    }

    // Initialize the store, falling back to memory when the database is unusable
    let store: Arc<dyn ContentStore> = match db::init_database(&config.db_path).await {
        Ok(pool) => Arc::new(SqliteStore::new(Repository::new(pool))),
        Err(e) => {
            tracing::warn!(
                "Database unavailable ({}), using in-memory store; changes will not persist",
                e
            );
            Arc::new(MemoryStore::new())
        }
    };

    // Keep the public page in step with the store
    let site = Arc::new(RwLock::new(SiteController::new()));
    let _renderer = spawn_live_renderer(store.clone(), site.clone());

    // Admin editor with debounced settings saves
    let editor = Arc::new(Mutex::new(EditorSession::open(store.clone()).await));
    let (autosave, _autosave_task) = spawn_autosave(editor.clone(), config.autosave_quiet);
    tracing::info!("Editor auto-save after {:?} of quiet", config.autosave_quiet);

    // Create application state
    let state = AppState {
        store,
        site,
        config: Arc::new(config.clone()),
        editor,
        autosave,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
