//! Content applier: writes section fields into their target elements.

use super::fields::{FieldKind, SectionDescriptor, SECTIONS};
use super::gallery::{render_gallery, render_gallery_list};
use super::readmore::apply_read_more;
use super::Page;
use crate::editor::RichTextEditorHost;
use crate::models::{ContentDocument, ImagesDocument, SectionContent};

/// Which page the content is written to.
pub enum Surface<'a> {
    /// Public site: ids `{section}-{field}`, text and markup written directly.
    Public,
    /// Admin panel: ids `edit-{section}-{field}`, form values and rich-text editors.
    Admin {
        editors: &'a mut dyn RichTextEditorHost,
    },
}

impl Surface<'_> {
    pub fn target_id(&self, section: &str, target: &str) -> String {
        match self {
            Surface::Public => format!("{}-{}", section, target),
            Surface::Admin { .. } => format!("edit-{}-{}", section, target),
        }
    }
}

/// Reconcile every known section of the page with `content`.
///
/// Absent sections and fields fall back to built-in defaults; elements missing
/// from the page are skipped field by field.
pub fn apply_content(content: &ContentDocument, surface: &mut Surface<'_>, page: &mut Page) {
    for section in SECTIONS {
        apply_section(section, content.section(section.key), surface, page);
    }
}

/// Reconcile a single section.
pub fn apply_section(
    section: &SectionDescriptor,
    content: Option<&SectionContent>,
    surface: &mut Surface<'_>,
    page: &mut Page,
) {
    for field in section.fields {
        let id = surface.target_id(section.key, field.target);
        let text = content
            .and_then(|c| c.text(field.name))
            .unwrap_or(field.default);

        match (&mut *surface, field.kind) {
            // Flags only drive other fields on the public page.
            (Surface::Public, FieldKind::Flag) => {}
            (Surface::Admin { .. }, FieldKind::Flag) => {
                let checked = content.and_then(|c| c.flag(field.name)).unwrap_or(false);
                if let Some(element) = target(page, &id) {
                    if checked {
                        element.set_attr("checked", "true");
                    } else {
                        element.remove_attr("checked");
                    }
                }
            }
            (Surface::Public, FieldKind::Text) => {
                if let Some(element) = target(page, &id) {
                    element.set_text(text);
                }
            }
            (Surface::Public, FieldKind::Rich) => match field.read_more {
                Some(flag) => {
                    let enabled = content.and_then(|c| c.flag(flag)).unwrap_or(false);
                    apply_read_more(page, &id, text, enabled);
                }
                None => {
                    if let Some(element) = target(page, &id) {
                        element.set_html(text);
                    }
                }
            },
            (Surface::Admin { .. }, FieldKind::Text) => {
                if let Some(element) = target(page, &id) {
                    element.set_attr("value", text);
                }
            }
            (Surface::Admin { editors }, FieldKind::Rich) => {
                if !editors.set_content(&id, text) {
                    if let Some(element) = target(page, &id) {
                        element.set_html(text);
                    }
                }
            }
        }
    }

    if let Some(kind) = section.gallery {
        let items = content.map(SectionContent::gallery).unwrap_or(&[]);
        match surface {
            Surface::Public => {
                render_gallery(page, &format!("{}-gallery", section.key), items, kind)
            }
            Surface::Admin { .. } => {
                render_gallery_list(page, &format!("{}-gallery-list", section.key), items)
            }
        }
    }
}

/// Point image elements at their assigned URLs.
pub fn apply_images(images: &ImagesDocument, page: &mut Page) {
    for (id, url) in &images.0 {
        if let Some(element) = target(page, id) {
            element.set_attr("src", url);
        }
    }
}

fn target<'p>(page: &'p mut Page, id: &str) -> Option<&'p mut super::Element> {
    let element = page.get_mut(id);
    if element.is_none() {
        tracing::debug!("No #{} on this page, skipping field", id);
    }
    element
}
