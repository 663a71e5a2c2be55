//! Content document: per-section editable text, rich text and galleries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// All sections' content, keyed by section (`session1`..`session7`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument {
    pub sections: BTreeMap<String, SectionContent>,
}

impl ContentDocument {
    /// Decode section by section; a malformed section is dropped and falls back to defaults.
    pub fn from_data(data: Option<&Map<String, Value>>) -> Self {
        let mut sections = BTreeMap::new();
        for (key, value) in data.into_iter().flatten() {
            match serde_json::from_value::<SectionContent>(value.clone()) {
                Ok(section) => {
                    sections.insert(key.clone(), section);
                }
                Err(e) => tracing::warn!("Ignoring malformed content section {}: {}", key, e),
            }
        }
        Self { sections }
    }

    pub fn section(&self, key: &str) -> Option<&SectionContent> {
        self.sections.get(key)
    }
}

/// Flat field map of one section, plus the ordered gallery of galleries sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<GalleryItem>>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl SectionContent {
    /// String value of a field, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Boolean value of a field, if present.
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.fields
            .insert(field.to_string(), Value::String(value.into()));
    }

    pub fn set_flag(&mut self, field: &str, value: bool) {
        self.fields.insert(field.to_string(), Value::Bool(value));
    }

    pub fn gallery(&self) -> &[GalleryItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}

/// Kind of media a gallery holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryKind {
    Image,
    Video,
}

impl GalleryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryKind::Image => "image",
            GalleryKind::Video => "video",
        }
    }
}

/// One image or video entry; position in the list is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: GalleryKind,
}

impl GalleryItem {
    pub fn new(url: impl Into<String>, kind: GalleryKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_fields_and_items_decode() {
        let data = json!({
            "session3": {"heading": "About", "col3Readmore": true},
            "session6": {"heading": "Photos", "items": [{"url": "a.jpg", "type": "image"}]}
        });
        let content = ContentDocument::from_data(data.as_object());

        let about = content.section("session3").unwrap();
        assert_eq!(about.text("heading"), Some("About"));
        assert_eq!(about.flag("col3Readmore"), Some(true));
        assert!(about.items.is_none());

        let photos = content.section("session6").unwrap();
        assert_eq!(photos.gallery(), &[GalleryItem::new("a.jpg", GalleryKind::Image)]);
    }

    #[test]
    fn test_malformed_section_is_dropped() {
        let data = json!({
            "session1": {"title1": "Hello"},
            "session7": {"items": [{"url": "x", "type": "audio"}]},
            "session2": "not an object"
        });
        let content = ContentDocument::from_data(data.as_object());
        assert_eq!(content.sections.len(), 1);
        assert!(content.section("session1").is_some());
    }

    #[test]
    fn test_section_serializes_flat() {
        let mut section = SectionContent::default();
        section.set_text("heading", "Videos");
        section.items = Some(vec![GalleryItem::new("https://youtu.be/abc", GalleryKind::Video)]);

        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(
            value,
            json!({
                "heading": "Videos",
                "items": [{"url": "https://youtu.be/abc", "type": "video"}]
            })
        );
    }
}
