//! In-memory page model and the appliers that reconcile documents into it.
//!
//! A `Page` holds root CSS custom properties and a flat list of addressable
//! elements. Appliers are plain functions of `(document, &mut Page)`; they never
//! read ambient state, so re-running one with the same input yields the same page.

pub mod content;
pub mod fields;
pub mod gallery;
pub mod menu;
pub mod readmore;
pub mod settings;

pub use content::{apply_content, apply_images, Surface};
pub use gallery::{embed_url, render_gallery};
pub use menu::render_menu;
pub use readmore::{apply_read_more, toggle_read_more, ReadMore};
pub use settings::apply_settings;

use std::collections::BTreeMap;

use serde::Serialize;

use fields::{FieldKind, SECTIONS};
use settings::{SettingKind, SETTINGS};

/// What an element currently contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Content {
    #[default]
    Empty,
    /// Plain text (textContent semantics).
    Text(String),
    /// Raw markup (innerHTML semantics).
    Html(String),
    /// Rendered child nodes.
    Children(Vec<Element>),
}

/// One addressable node of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub content: Content,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.content = Content::Html(html.into());
    }

    pub fn clear(&mut self) {
        self.content = Content::Empty;
    }

    pub fn append(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Text as a reader would see it, html included verbatim.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) | Content::Html(text) => Some(text),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn remove_style(&mut self, property: &str) {
        self.style.remove(property);
    }

    /// Show with the stylesheet's display (`''`) or hide (`none`).
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.remove_style("display");
        } else {
            self.set_style("display", "none");
        }
    }

    /// Effective inline display: `None` means the stylesheet default.
    pub fn display(&self) -> Option<&str> {
        self.style.get("display").map(String::as_str)
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.has_class(class),
        }
    }
}

/// `#id` or `.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix('#') {
            Some(Selector::Id(id.to_string()))
        } else {
            raw.strip_prefix('.')
                .map(|class| Selector::Class(class.to_string()))
        }
    }
}

/// Page state the appliers write into.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// CSS custom properties on the document root, keyed without the `--` prefix.
    pub root_vars: BTreeMap<String, String>,
    pub elements: Vec<Element>,
    #[serde(skip)]
    pub read_more: BTreeMap<String, ReadMore>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn root_var(&self, name: &str) -> Option<&str> {
        self.root_vars.get(name).map(String::as_str)
    }

    pub fn set_root_var(&mut self, name: &str, value: impl Into<String>) {
        self.root_vars.insert(name.to_string(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|el| el.id.as_deref() == Some(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|el| el.id.as_deref() == Some(id))
    }

    /// Every top-level element matching the selector.
    pub fn select_mut<'a>(
        &'a mut self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.iter_mut().filter(move |el| el.matches(selector))
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |el| el.matches(selector))
    }

    /// Skeleton of the public site: every id the appliers address.
    pub fn public() -> Self {
        let mut page = Self::new();

        page.push(Element::new("img").with_class("hero-image"));
        page.push(Element::new("div").with_id("header-social").with_class("social-icons"));
        page.push(Element::new("ul").with_id("desktop-menu").with_class("nav-menu"));
        page.push(Element::new("ul").with_id("mobile-menu").with_class("mobile-nav-menu"));

        for id in IMAGE_SLOTS {
            page.push(Element::new("img").with_id(*id));
        }

        for section in SECTIONS {
            page.push(
                Element::new("section")
                    .with_id(section.key)
                    .with_class("session")
                    .with_class(section.key),
            );
            for column in section.columns {
                let mut column_el =
                    Element::new("div").with_id(format!("{}-{}", section.key, column));
                column_el.add_class(if section.carded { "card" } else { "column" });
                page.push(column_el);
            }
            for field in section.fields {
                let id = format!("{}-{}", section.key, field.target);
                let tag = match field.kind {
                    FieldKind::Text => "h2",
                    FieldKind::Rich => "div",
                    FieldKind::Flag => continue,
                };
                page.push(Element::new(tag).with_id(&id).with_text(field.default));
                if field.read_more.is_some() {
                    page.push(
                        Element::new("button")
                            .with_id(format!("{}-toggle", id))
                            .with_class("read-more-btn")
                            .with_text("Read More"),
                    );
                }
            }
            if section.gallery.is_some() {
                page.push(
                    Element::new("div")
                        .with_id(format!("{}-gallery", section.key))
                        .with_class("gallery-grid"),
                );
            }
        }

        page.push(
            Element::new("div")
                .with_id("session5-grid")
                .with_class("four-columns")
                .with_class("grid-4"),
        );
        page.push(Element::new("p").with_id("footer-text"));
        page.push(Element::new("div").with_id("footer-social").with_class("social-icons"));

        page
    }

    /// Skeleton of the admin panel: form inputs, editor mounts and settings controls.
    pub fn admin() -> Self {
        let mut page = Self::new();

        for setting in SETTINGS {
            let input = match setting.kind {
                SettingKind::Toggle { .. } => Element::new("input").with_attr("type", "checkbox"),
                SettingKind::Color { .. } => Element::new("input").with_attr("type", "color"),
                _ => Element::new("select"),
            };
            page.push(input.with_id(setting.key));
        }

        for section in SECTIONS {
            for field in section.fields {
                let id = format!("edit-{}-{}", section.key, field.target);
                let element = match field.kind {
                    FieldKind::Text => Element::new("input").with_attr("type", "text"),
                    FieldKind::Rich => Element::new("textarea").with_class("tinymce-editor"),
                    FieldKind::Flag => Element::new("input").with_attr("type", "checkbox"),
                };
                page.push(element.with_id(id));
            }
            if section.gallery.is_some() {
                page.push(Element::new("div").with_id(format!("{}-gallery-list", section.key)));
            }
        }

        page
    }
}

/// Image elements whose `src` comes from the images document.
pub const IMAGE_SLOTS: &[&str] = &[
    "header-logo",
    "footer-logo",
    "session2-main-image",
    "session2-col1-image",
    "session2-col2-image",
    "session2-col3-image",
    "session3-col1-image",
    "session4-col1-image",
    "session5-col1-image",
    "session5-col2-image",
    "session5-col3-image",
    "session5-col4-image",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_html_replace_each_other() {
        let mut el = Element::new("div").with_child(Element::new("span"));
        el.set_text("plain");
        assert_eq!(el.content, Content::Text("plain".to_string()));
        el.set_html("<b>bold</b>");
        assert_eq!(el.text(), Some("<b>bold</b>"));
        assert!(el.children().is_empty());
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse("#session6"), Some(Selector::Id("session6".to_string())));
        assert_eq!(Selector::parse(".card"), Some(Selector::Class("card".to_string())));
        assert_eq!(Selector::parse("body"), None);
    }

    #[test]
    fn test_public_skeleton_has_addressed_targets() {
        let page = Page::public();
        assert!(page.get("session6").is_some());
        assert!(page.get("session2-col1-heading").is_some());
        assert!(page.get("session3-col3-content-toggle").is_some());
        assert!(page.get("session7-gallery").is_some());
        assert!(page.get("session5-grid").unwrap().has_class("grid-4"));
        assert_eq!(page.select(&Selector::Class("card".to_string())).count(), 7);
        assert_eq!(page.select(&Selector::Class("social-icons".to_string())).count(), 2);
    }

    #[test]
    fn test_admin_skeleton_has_form_controls() {
        let page = Page::admin();
        assert_eq!(page.get("show-social").unwrap().attr("type"), Some("checkbox"));
        assert_eq!(page.get("header-bg-color").unwrap().attr("type"), Some("color"));
        assert!(page.get("edit-session3-col3-readmore").is_some());
        assert!(page.get("edit-session2-col1-content").unwrap().has_class("tinymce-editor"));
        assert!(page.get("session6-gallery-list").is_some());
    }

    #[test]
    fn test_visibility_toggle_is_inline_display() {
        let mut el = Element::new("section");
        el.set_visible(false);
        assert_eq!(el.display(), Some("none"));
        el.set_visible(true);
        assert_eq!(el.display(), None);
    }
}
