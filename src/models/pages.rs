//! Standalone pages reachable by `?id=` routes.

use serde::{Deserialize, Serialize};

/// A generated custom page (`customPages/{id}`): one complete HTML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// An article shown on the detail route (`articles/{id}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A reader comment (`comments/{id}`) attached to an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub name: String,
    /// Collected with the comment; never shown on the page.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: String,
    /// RFC 3339 time the comment was written.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Written `false` on submission; not consulted when displaying.
    #[serde(default)]
    pub approved: Option<bool>,
}
