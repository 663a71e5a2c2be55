//! Admin editor surface.
//!
//! An `EditorSession` owns the admin `Page` (form inputs with `edit-` ids and the
//! settings controls), reads edits back out of it and writes them through the
//! injected store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::models::{ContentDocument, GalleryItem, SectionContent, SettingsDocument};
use crate::page::fields::{self, FieldKind, SectionDescriptor};
use crate::page::gallery::render_gallery_list;
use crate::page::settings::{SettingKind, SETTINGS};
use crate::page::{apply_settings, content::apply_section, Page, Surface};
use crate::store::{ContentStore, DocPath, StoredDocument, WriteMode};
use crate::sync::Debouncer;

/// Rich-text editors mounted on the admin page, addressed by element id.
pub trait RichTextEditorHost: Send + Sync {
    fn has_editor(&self, id: &str) -> bool;

    /// Current markup of the editor, `None` when no editor has that id.
    fn content(&self, id: &str) -> Option<String>;

    /// Replace the editor's markup; returns `false` when no editor has that id.
    fn set_content(&mut self, id: &str, html: &str) -> bool;
}

/// Editor host that keeps each editor's markup in a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEditorHost {
    editors: HashMap<String, String>,
}

impl InMemoryEditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_editors<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            editors: ids.into_iter().map(|id| (id.into(), String::new())).collect(),
        }
    }

    /// Mount one editor per rich-text area of the page.
    pub fn for_page(page: &Page) -> Self {
        Self::with_editors(
            page.elements
                .iter()
                .filter(|el| el.has_class("tinymce-editor"))
                .filter_map(|el| el.id.clone()),
        )
    }
}

impl RichTextEditorHost for InMemoryEditorHost {
    fn has_editor(&self, id: &str) -> bool {
        self.editors.contains_key(id)
    }

    fn content(&self, id: &str) -> Option<String> {
        self.editors.get(id).cloned()
    }

    fn set_content(&mut self, id: &str, html: &str) -> bool {
        match self.editors.get_mut(id) {
            Some(current) => {
                *current = html.to_string();
                true
            }
            None => false,
        }
    }
}

/// Value shown in a settings control when the document has none.
fn control_default(kind: SettingKind) -> Option<&'static str> {
    match kind {
        SettingKind::Color { default }
        | SettingKind::Length { default }
        | SettingKind::Font { default } => Some(default),
        SettingKind::HeroAnimation | SettingKind::CardHover => Some("none"),
        SettingKind::GridLayout => Some("4"),
        SettingKind::Toggle { .. } => None,
    }
}

/// One admin editing session bound to a store.
pub struct EditorSession {
    store: Arc<dyn ContentStore>,
    page: Page,
    editors: Box<dyn RichTextEditorHost>,
    content: ContentDocument,
    settings: SettingsDocument,
}

impl EditorSession {
    pub fn new(store: Arc<dyn ContentStore>, editors: Box<dyn RichTextEditorHost>) -> Self {
        Self {
            store,
            page: Page::admin(),
            editors,
            content: ContentDocument::default(),
            settings: SettingsDocument::default(),
        }
    }

    /// Session with an editor on every rich-text area, filled from the store.
    ///
    /// A failed load leaves the form at its defaults.
    pub async fn open(store: Arc<dyn ContentStore>) -> Self {
        let editors = InMemoryEditorHost::for_page(&Page::admin());
        let mut session = Self::new(store, Box::new(editors));
        if let Err(e) = session.load().await {
            tracing::warn!("Editor form starts from defaults: {}", e);
        }
        session
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn editors(&self) -> &dyn RichTextEditorHost {
        self.editors.as_ref()
    }

    pub fn editors_mut(&mut self) -> &mut dyn RichTextEditorHost {
        self.editors.as_mut()
    }

    pub fn content(&self) -> &ContentDocument {
        &self.content
    }

    /// Read content and settings from the store and fill the form with them.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let content = self.store.get(&DocPath::website("content")).await?;
        let settings = self.store.get(&DocPath::website("settings")).await?;

        self.content = ContentDocument::from_data(content.as_ref().map(|doc| &doc.data));
        self.settings = SettingsDocument::from_data(settings.as_ref().map(|doc| &doc.data));

        for section in fields::SECTIONS {
            self.render_section(section);
        }
        self.populate_settings();
        Ok(())
    }

    /// Type into a text input or pick an option in a select.
    pub fn set_input(&mut self, id: &str, value: &str) -> Result<(), AppError> {
        self.control(id)?.set_attr("value", value);
        Ok(())
    }

    /// Tick or untick a checkbox.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<(), AppError> {
        let control = self.control(id)?;
        if checked {
            control.set_attr("checked", "true");
        } else {
            control.remove_attr("checked");
        }
        Ok(())
    }

    /// Read one section's fields back out of the form.
    ///
    /// Keys the form does not know about are carried over from the loaded content.
    pub fn collect_section(&self, section_key: &str) -> Result<SectionContent, AppError> {
        let section = known_section(section_key)?;
        let mut collected = self.content.section(section_key).cloned().unwrap_or_default();

        for field in section.fields {
            let id = format!("edit-{}-{}", section.key, field.target);
            let element = self.page.get(&id);
            match field.kind {
                FieldKind::Text => {
                    if let Some(value) = element.and_then(|el| el.attr("value")) {
                        collected.set_text(field.name, value);
                    }
                }
                FieldKind::Rich => {
                    let html = self
                        .editors
                        .content(&id)
                        .or_else(|| element.and_then(|el| el.text()).map(str::to_string));
                    if let Some(html) = html {
                        collected.set_text(field.name, html);
                    }
                }
                FieldKind::Flag => {
                    if let Some(element) = element {
                        collected.set_flag(field.name, element.attr("checked").is_some());
                    }
                }
            }
        }

        if section.gallery.is_some() {
            collected.items = Some(collected.gallery().to_vec());
        }
        Ok(collected)
    }

    /// Merge the section into the content document and refresh the form.
    pub async fn save_section(&mut self, section_key: &str) -> Result<StoredDocument, AppError> {
        let section = known_section(section_key)?;
        let collected = self.collect_section(section_key)?;

        let mut update = Map::new();
        update.insert(section_key.to_string(), serde_json::to_value(&collected)?);
        let stored = self
            .store
            .set(&DocPath::website("content"), update, WriteMode::Merge)
            .await?;

        tracing::info!("Saved {} content at revision {}", section_key, stored.revision);
        self.content
            .sections
            .insert(section_key.to_string(), collected);
        self.render_section(section);
        Ok(stored)
    }

    /// Append a gallery entry locally; it is persisted with the next section save.
    pub fn add_gallery_item(&mut self, section_key: &str, url: &str) -> Result<(), AppError> {
        let section = known_section(section_key)?;
        let Some(kind) = section.gallery else {
            return Err(AppError::Validation(format!(
                "Section {} has no gallery",
                section_key
            )));
        };
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("Please enter a URL".to_string()));
        }

        let entry = self
            .content
            .sections
            .entry(section_key.to_string())
            .or_default();
        entry
            .items
            .get_or_insert_with(Vec::new)
            .push(GalleryItem::new(url, kind));
        self.render_gallery_list(section);
        Ok(())
    }

    /// Remove a gallery entry by position and save the section.
    pub async fn remove_gallery_item(
        &mut self,
        section_key: &str,
        index: usize,
    ) -> Result<StoredDocument, AppError> {
        let section = known_section(section_key)?;
        let items = self
            .content
            .sections
            .get_mut(section_key)
            .and_then(|s| s.items.as_mut())
            .filter(|items| index < items.len())
            .ok_or_else(|| {
                AppError::Validation(format!("No gallery item {} in {}", index, section_key))
            })?;
        items.remove(index);

        self.render_gallery_list(section);
        self.save_section(section_key).await
    }

    /// Read every settings control into a flat settings document.
    pub fn collect_settings(&self) -> SettingsDocument {
        let mut collected = Map::new();
        for setting in SETTINGS {
            let Some(control) = self.page.get(setting.key) else {
                continue;
            };
            match setting.kind {
                SettingKind::Toggle { .. } => {
                    collected.insert(
                        setting.key.to_string(),
                        Value::Bool(control.attr("checked").is_some()),
                    );
                }
                _ => {
                    if let Some(value) = control.attr("value") {
                        collected.insert(setting.key.to_string(), Value::String(value.to_string()));
                    }
                }
            }
        }
        SettingsDocument(collected)
    }

    /// Replace the settings document with the form's values.
    pub async fn save_settings(&mut self) -> Result<StoredDocument, AppError> {
        let settings = self.collect_settings();
        let stored = self
            .store
            .set(&DocPath::website("settings"), settings.0.clone(), WriteMode::Replace)
            .await?;

        tracing::info!("Saved settings at revision {}", stored.revision);
        self.settings = settings;
        apply_settings(&self.settings, &mut self.page);
        Ok(stored)
    }

    fn populate_settings(&mut self) {
        for setting in SETTINGS {
            let Some(control) = self.page.get_mut(setting.key) else {
                continue;
            };
            match setting.kind {
                SettingKind::Toggle { .. } => {
                    if self.settings.flag(setting.key).unwrap_or(true) {
                        control.set_attr("checked", "true");
                    } else {
                        control.remove_attr("checked");
                    }
                }
                kind => match self
                    .settings
                    .text(setting.key)
                    .or_else(|| control_default(kind).map(str::to_string))
                {
                    Some(value) => control.set_attr("value", value),
                    None => control.remove_attr("value"),
                },
            }
        }
        apply_settings(&self.settings, &mut self.page);
    }

    fn render_section(&mut self, section: &SectionDescriptor) {
        let mut surface = Surface::Admin {
            editors: self.editors.as_mut(),
        };
        apply_section(
            section,
            self.content.section(section.key),
            &mut surface,
            &mut self.page,
        );
    }

    fn render_gallery_list(&mut self, section: &SectionDescriptor) {
        let items = self
            .content
            .section(section.key)
            .map(SectionContent::gallery)
            .unwrap_or(&[]);
        render_gallery_list(
            &mut self.page,
            &format!("{}-gallery-list", section.key),
            items,
        );
    }

    fn control(&mut self, id: &str) -> Result<&mut crate::page::Element, AppError> {
        self.page
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("No form control #{}", id)))
    }
}

fn known_section(key: &str) -> Result<&'static SectionDescriptor, AppError> {
    fields::section(key).ok_or_else(|| AppError::NotFound(format!("Unknown section {}", key)))
}

/// Save the settings form once edits have been quiet for `quiet`.
///
/// Call `notify` on the returned debouncer after every settings change.
pub fn spawn_autosave(
    session: Arc<Mutex<EditorSession>>,
    quiet: Duration,
) -> (Debouncer, JoinHandle<()>) {
    Debouncer::spawn(quiet, move || {
        let session = session.clone();
        async move {
            if let Err(e) = session.lock().await.save_settings().await {
                tracing::warn!("Auto-save of settings failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GalleryKind;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn object(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    async fn session_with(store: Arc<MemoryStore>) -> EditorSession {
        let page = Page::admin();
        let mut session = EditorSession::new(store, Box::new(InMemoryEditorHost::for_page(&page)));
        session.load().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_load_fills_form_with_defaults_and_stored_values() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &DocPath::website("content"),
                object(json!({"session2": {"heading": "Services", "col1Content": "<p>Web</p>"}})),
                WriteMode::Replace,
            )
            .await
            .unwrap();
        store
            .set(
                &DocPath::website("settings"),
                object(json!({"show-session6": false, "card-hover": "lift"})),
                WriteMode::Replace,
            )
            .await
            .unwrap();

        let session = session_with(store).await;
        let page = session.page();
        assert_eq!(page.get("edit-session2-heading").unwrap().attr("value"), Some("Services"));
        assert_eq!(
            session.editors().content("edit-session2-col1-content").as_deref(),
            Some("<p>Web</p>")
        );
        assert_eq!(
            page.get("edit-session1-title1").unwrap().attr("value"),
            Some("Welcome to Our Professional Website")
        );
        assert!(page.get("show-session6").unwrap().attr("checked").is_none());
        assert_eq!(page.get("show-social").unwrap().attr("checked"), Some("true"));
        assert_eq!(page.get("card-hover").unwrap().attr("value"), Some("lift"));
        assert_eq!(page.get("header-bg-color").unwrap().attr("value"), Some("#2c3e50"));
    }

    #[tokio::test]
    async fn test_save_section_merges_without_touching_others() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &DocPath::website("content"),
                object(json!({"session1": {"title1": "Kept"}, "session2": {"heading": "Old"}})),
                WriteMode::Replace,
            )
            .await
            .unwrap();

        let mut session = session_with(store.clone()).await;
        session.set_input("edit-session2-heading", "New").unwrap();
        session
            .editors_mut()
            .set_content("edit-session2-col1-content", "<p>Edited</p>");
        session.save_section("session2").await.unwrap();

        let stored = store.get(&DocPath::website("content")).await.unwrap().unwrap();
        assert_eq!(stored.data["session1"]["title1"], "Kept");
        assert_eq!(stored.data["session2"]["heading"], "New");
        assert_eq!(stored.data["session2"]["col1Content"], "<p>Edited</p>");
    }

    #[tokio::test]
    async fn test_read_more_checkbox_saved_as_flag() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(store.clone()).await;

        session.set_checked("edit-session3-col3-readmore", true).unwrap();
        session.save_section("session3").await.unwrap();

        let stored = store.get(&DocPath::website("content")).await.unwrap().unwrap();
        assert_eq!(stored.data["session3"]["col3Readmore"], true);
    }

    #[tokio::test]
    async fn test_gallery_add_validate_and_remove() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(store.clone()).await;

        assert!(matches!(
            session.add_gallery_item("session6", "   "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            session.add_gallery_item("session2", "a.jpg"),
            Err(AppError::Validation(_))
        ));

        session.add_gallery_item("session6", "a.jpg").unwrap();
        session.add_gallery_item("session6", "b.jpg").unwrap();
        assert_eq!(session.page().get("session6-gallery-list").unwrap().children().len(), 2);
        // Adding alone does not persist.
        assert!(store.get(&DocPath::website("content")).await.unwrap().is_none());

        session.remove_gallery_item("session6", 0).await.unwrap();
        let stored = store.get(&DocPath::website("content")).await.unwrap().unwrap();
        assert_eq!(stored.data["session6"]["items"], json!([{"url": "b.jpg", "type": "image"}]));
        assert_eq!(
            session.content().section("session6").unwrap().gallery(),
            &[GalleryItem::new("b.jpg", GalleryKind::Image)]
        );

        assert!(session.remove_gallery_item("session6", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_save_settings_replaces_document() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &DocPath::website("settings"),
                object(json!({"legacy-key": "dropped"})),
                WriteMode::Replace,
            )
            .await
            .unwrap();

        let mut session = session_with(store.clone()).await;
        session.set_input("session3-bg-color", "#ff0000").unwrap();
        session.set_checked("show-session7", false).unwrap();
        session.save_settings().await.unwrap();

        let stored = store.get(&DocPath::website("settings")).await.unwrap().unwrap();
        assert_eq!(stored.data["session3-bg-color"], "#ff0000");
        assert_eq!(stored.data["show-session7"], false);
        assert_eq!(stored.data["show-social"], true);
        assert!(stored.data.get("legacy-key").is_none());
        assert_eq!(session.page().root_var("session3-bg-color"), Some("#ff0000"));
    }

    #[tokio::test]
    async fn test_unknown_section_and_control() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(store).await;
        assert!(matches!(session.collect_section("session9"), Err(AppError::NotFound(_))));
        assert!(matches!(session.set_input("nope", "x"), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_autosave_coalesces_bursts() {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(Mutex::new(session_with(store.clone()).await));
        let (debouncer, _task) = spawn_autosave(session.clone(), Duration::from_millis(50));
        let before = store.revision().await.unwrap().revision_id;

        for color in ["#111111", "#222222", "#333333"] {
            session.lock().await.set_input("footer-bg-color", color).unwrap();
            debouncer.notify();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        let stored = store.get(&DocPath::website("settings")).await.unwrap().unwrap();
        assert_eq!(stored.data["footer-bg-color"], "#333333");
        assert_eq!(store.revision().await.unwrap().revision_id, before + 1);
    }
}
