//! Navigation menu document.

use serde::{Deserialize, Serialize};

/// Menu items in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuDocument {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Position recorded at creation time; rendering follows list order instead.
    #[serde(default)]
    pub order: i64,
}
