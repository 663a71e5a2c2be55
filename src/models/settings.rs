//! Settings document: flat map of style, layout and visibility switches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat settings map; unknown keys are carried but never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument(pub Map<String, Value>);

impl SettingsDocument {
    pub fn from_data(data: Option<&Map<String, Value>>) -> Self {
        Self(data.cloned().unwrap_or_default())
    }

    /// Scalar value rendered as text; null, empty and non-scalar values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Boolean switch; `"true"`/`"false"` strings are accepted too.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_treats_null_and_blank_as_absent() {
        let settings = SettingsDocument::from_data(
            json!({
                "body-font": null,
                "hero-animation": "  ",
                "session5-layout": 3,
                "header-bg-color": "#123456"
            })
            .as_object(),
        );
        assert_eq!(settings.text("body-font"), None);
        assert_eq!(settings.text("hero-animation"), None);
        assert_eq!(settings.text("session5-layout").as_deref(), Some("3"));
        assert_eq!(settings.text("header-bg-color").as_deref(), Some("#123456"));
        assert_eq!(settings.text("missing"), None);
    }

    #[test]
    fn test_flag_accepts_bool_and_string() {
        let settings = SettingsDocument::from_data(
            json!({"show-social": false, "show-session6": "true", "show-session7": 1}).as_object(),
        );
        assert_eq!(settings.flag("show-social"), Some(false));
        assert_eq!(settings.flag("show-session6"), Some(true));
        assert_eq!(settings.flag("show-session7"), None);
    }
}
