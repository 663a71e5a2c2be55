//! Data models for the website documents.
//!
//! Documents are plain JSON by convention; these types decode them leniently so a
//! malformed document degrades to defaults instead of breaking the page.

mod articles;
mod content;
mod menu;
mod pages;
mod settings;

pub use articles::*;
pub use content::*;
pub use menu::*;
pub use pages::*;
pub use settings::*;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

/// Element id to image URL; last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagesDocument(pub BTreeMap<String, String>);

impl ImagesDocument {
    /// Keep every string-valued entry, drop the rest.
    pub fn from_data(data: Option<&Map<String, Value>>) -> Self {
        let entries = data
            .into_iter()
            .flatten()
            .filter_map(|(id, url)| url.as_str().map(|url| (id.clone(), url.to_string())))
            .collect();
        Self(entries)
    }
}

/// Decode a document body, falling back to the type's default when it does not fit.
pub fn decode_or_default<T>(data: Option<&Map<String, Value>>, what: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(data) = data else {
        return T::default();
    };

    match serde_json::from_value(Value::Object(data.clone())) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("Ignoring malformed {} document: {}", what, e);
            T::default()
        }
    }
}
