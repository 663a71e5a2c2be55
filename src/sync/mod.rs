//! Live synchronization between the store and the rendered public page.
//!
//! The controller owns the current website documents and the page built from
//! them. A background task feeds it every snapshot the store publishes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::models::{
    decode_or_default, ContentDocument, ImagesDocument, MenuDocument, SettingsDocument,
};
use crate::page::{apply_content, apply_images, apply_settings, render_menu, Page, Surface};
use crate::store::{ContentStore, DocPath, DocumentSnapshot, WEBSITE};

/// Website documents the public page is built from.
pub const SETTINGS_DOC: &str = "settings";
pub const CONTENT_DOC: &str = "content";
pub const IMAGES_DOC: &str = "images";
pub const MENU_DOC: &str = "menu";

/// Latest decoded website documents; absent documents are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteState {
    pub content: ContentDocument,
    pub settings: SettingsDocument,
    pub images: ImagesDocument,
    pub menu: MenuDocument,
}

impl SiteState {
    /// Read every website document from the store.
    pub async fn load(store: &dyn ContentStore) -> Result<Self, AppError> {
        let mut state = Self::default();
        for id in [SETTINGS_DOC, CONTENT_DOC, IMAGES_DOC, MENU_DOC] {
            let snapshot = store.snapshot(&DocPath::website(id)).await?;
            state.update(&snapshot);
        }
        Ok(state)
    }

    /// Replace the slot the snapshot belongs to. Returns `false` for other documents.
    fn update(&mut self, snapshot: &DocumentSnapshot) -> bool {
        if snapshot.collection != WEBSITE {
            return false;
        }
        let data = snapshot.data.as_ref();
        match snapshot.id.as_str() {
            SETTINGS_DOC => self.settings = SettingsDocument::from_data(data),
            CONTENT_DOC => self.content = ContentDocument::from_data(data),
            IMAGES_DOC => self.images = ImagesDocument::from_data(data),
            MENU_DOC => self.menu = decode_or_default(data, "menu"),
            _ => return false,
        }
        true
    }
}

/// Owns the site state and the public page rendered from it.
#[derive(Debug, Clone)]
pub struct SiteController {
    state: SiteState,
    page: Page,
}

impl SiteController {
    /// Public page rendered from empty state, i.e. all built-in defaults.
    pub fn new() -> Self {
        Self::with_state(SiteState::default())
    }

    pub fn with_state(state: SiteState) -> Self {
        let mut controller = Self {
            state,
            page: Page::public(),
        };
        controller.render_all();
        controller
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &SiteState {
        &self.state
    }

    /// Swap in freshly loaded state and re-render everything.
    pub fn replace_state(&mut self, state: SiteState) {
        self.state = state;
        self.render_all();
    }

    /// Apply one store snapshot; only the applier for that document runs.
    ///
    /// Returns `false` when the snapshot is not a website document.
    pub fn apply_snapshot(&mut self, snapshot: &DocumentSnapshot) -> bool {
        if !self.state.update(snapshot) {
            return false;
        }
        match snapshot.id.as_str() {
            SETTINGS_DOC => apply_settings(&self.state.settings, &mut self.page),
            CONTENT_DOC => apply_content(&self.state.content, &mut Surface::Public, &mut self.page),
            IMAGES_DOC => apply_images(&self.state.images, &mut self.page),
            MENU_DOC => render_menu(&mut self.page, &self.state.menu),
            _ => {}
        }
        tracing::debug!("Applied {} at revision {}", snapshot.id, snapshot.revision);
        true
    }

    fn render_all(&mut self) {
        apply_content(&self.state.content, &mut Surface::Public, &mut self.page);
        apply_images(&self.state.images, &mut self.page);
        render_menu(&mut self.page, &self.state.menu);
        apply_settings(&self.state.settings, &mut self.page);
    }
}

impl Default for SiteController {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep `site` in step with the store until the store goes away.
///
/// Subscribes before the initial load so no write between the two is missed.
pub fn spawn_live_renderer(
    store: Arc<dyn ContentStore>,
    site: Arc<RwLock<SiteController>>,
) -> JoinHandle<()> {
    let mut updates = store.subscribe();

    tokio::spawn(async move {
        reload(store.as_ref(), &site).await;

        loop {
            match updates.recv().await {
                Ok(snapshot) => {
                    site.write().await.apply_snapshot(&snapshot);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Live renderer lagged by {} snapshots, reloading", skipped);
                    reload(store.as_ref(), &site).await;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Store closed, live renderer stopping");
                    break;
                }
            }
        }
    })
}

async fn reload(store: &dyn ContentStore, site: &RwLock<SiteController>) {
    match SiteState::load(store).await {
        Ok(state) => site.write().await.replace_state(state),
        Err(e) => tracing::warn!("Failed to load website documents, keeping current page: {}", e),
    }
}

/// Coalesces bursts of notifications into one flush after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Start the flushing task. A pending flush still runs when every handle is dropped.
    pub fn spawn<F, Fut>(quiet: Duration, mut flush: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let mut open = true;
                while open {
                    tokio::select! {
                        next = rx.recv() => {
                            if next.is_none() {
                                open = false;
                            }
                        }
                        _ = tokio::time::sleep(quiet) => break,
                    }
                }
                flush().await;
                if !open {
                    break;
                }
            }
        });

        (Self { tx }, task)
    }

    /// Record a change; the flush runs once nothing else arrives for the quiet period.
    pub fn notify(&self) {
        if self.tx.send(()).is_err() {
            tracing::warn!("Debouncer task is gone, change not scheduled");
        }
    }
}
