//! Public HTML routes.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Html,
};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::models::{builtin_article, decode_or_default, Article, Comment, CustomPage};
use crate::render::{self, ArticleComments, ArticleView};
use crate::store::{ContentStore, DocPath, DocumentQuery, StoredDocument};
use crate::AppState;

const SITE_TITLE: &str = "Professional Website";

/// `?id=` of the standalone page routes.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub id: Option<String>,
}

impl PageParams {
    fn id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// GET / - The live public page.
pub async fn show_index(State(state): State<AppState>) -> Html<String> {
    let site = state.site.read().await;
    Html(render::page_document(site.page(), SITE_TITLE))
}

/// GET /custom?id= - A stored custom page, or an in-page error.
pub async fn show_custom_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let Some(id) = params.id() else {
        return Html(render::error_page("Custom Page", "Page not found"));
    };
    let Ok(path) = DocPath::new("customPages", id) else {
        return Html(render::error_page("Custom Page", "Custom page not found"));
    };

    match state.store.get(&path).await {
        Ok(Some(doc)) => {
            let page: CustomPage = decode_or_default(Some(&doc.data), "custom page");
            Html(render::custom_page(&page.content))
        }
        Ok(None) => Html(render::error_page("Custom Page", "Custom page not found")),
        Err(e) => {
            tracing::warn!("Failed to load custom page {}: {}", id, e);
            Html(render::error_page("Custom Page", "Failed to load custom page"))
        }
    }
}

/// GET /detail?id= - An article with related articles and comments, or an in-page error.
///
/// A stored `articles/{id}` wins; otherwise a built-in article with that id is shown.
pub async fn show_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let not_found = || Html(render::error_page(SITE_TITLE, "Article not found"));
    let Some(id) = params.id() else {
        return not_found();
    };
    let Ok(path) = DocPath::new("articles", id) else {
        return not_found();
    };

    let article: Article = match state.store.get(&path).await {
        Ok(Some(doc)) => decode_or_default(Some(&doc.data), "article"),
        Ok(None) => match builtin_article(id) {
            Some(article) => article,
            None => return not_found(),
        },
        Err(e) => {
            tracing::warn!("Failed to load article {}: {}", id, e);
            match builtin_article(id) {
                Some(article) => article,
                None => {
                    return Html(render::error_page(
                        SITE_TITLE,
                        "Failed to load article content",
                    ))
                }
            }
        }
    };

    let url = detail_url(&state.config, &headers, id);
    let comments = load_comments(state.store.as_ref(), id).await;
    let view = ArticleView {
        id,
        article: &article,
        url: &url,
        comments: match &comments {
            Some(comments) => ArticleComments::Loaded(comments),
            None => ArticleComments::Unavailable,
        },
    };
    Html(render::article_page(view))
}

/// Absolute address of an article's detail page.
///
/// Uses the configured public URL, else the request's `Host`.
fn detail_url(config: &Config, headers: &HeaderMap, id: &str) -> String {
    let base = match &config.public_url {
        Some(base) => base.clone(),
        None => headers
            .get(header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(|host| format!("http://{}", host))
            .unwrap_or_default(),
    };
    format!("{}/detail?id={}", base, urlencoding::encode(id))
}

/// Comments on `article_id`, newest first; `None` when they could not be read.
async fn load_comments(store: &dyn ContentStore, article_id: &str) -> Option<Vec<Comment>> {
    let query = DocumentQuery {
        field: Some("articleId".to_string()),
        equals: Some(Value::String(article_id.to_string())),
        order_by: Some("createdAt".to_string()),
        descending: true,
        limit: None,
    };
    match store.query("comments", &query).await {
        Ok(docs) => Some(docs.iter().map(stored_comment).collect()),
        Err(e) => {
            tracing::warn!("Failed to load comments for {}: {}", article_id, e);
            None
        }
    }
}

/// Decode a comment, dating it by its document when it carries no `createdAt`.
fn stored_comment(doc: &StoredDocument) -> Comment {
    let mut comment: Comment = decode_or_default(Some(&doc.data), "comment");
    if comment.created_at.is_none() {
        comment.created_at = Some(doc.created_at.clone());
    }
    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use tokio::sync::broadcast;

    use crate::errors::AppError;
    use crate::models::RevisionInfo;
    use crate::store::{DocumentSnapshot, MemoryStore, WriteMode};

    /// Memory store whose queries always fail.
    struct QueryFailsStore(MemoryStore);

    #[async_trait]
    impl ContentStore for QueryFailsStore {
        async fn get(&self, path: &DocPath) -> Result<Option<StoredDocument>, AppError> {
            self.0.get(path).await
        }

        async fn set(
            &self,
            path: &DocPath,
            data: Map<String, Value>,
            mode: WriteMode,
        ) -> Result<StoredDocument, AppError> {
            self.0.set(path, data, mode).await
        }

        async fn add(
            &self,
            collection: &str,
            data: Map<String, Value>,
        ) -> Result<StoredDocument, AppError> {
            self.0.add(collection, data).await
        }

        async fn query(
            &self,
            _collection: &str,
            _query: &DocumentQuery,
        ) -> Result<Vec<StoredDocument>, AppError> {
            Err(AppError::StoreUnavailable("connection lost".to_string()))
        }

        async fn revision(&self) -> Result<RevisionInfo, AppError> {
            self.0.revision().await
        }

        fn subscribe(&self) -> broadcast::Receiver<DocumentSnapshot> {
            self.0.subscribe()
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_comment_failure_is_not_an_empty_list() {
        let store = MemoryStore::new();
        let empty = load_comments(&store, "mission").await;
        assert_eq!(empty.map(|c| c.len()), Some(0));

        let failing = QueryFailsStore(MemoryStore::new());
        assert!(load_comments(&failing, "mission").await.is_none());
    }

    #[tokio::test]
    async fn test_comment_dated_by_document_when_unset() {
        let store = MemoryStore::new();
        let doc = store
            .add(
                "comments",
                object(json!({"articleId": "mission", "name": "Ann", "email": "a@b.c"})),
            )
            .await
            .unwrap();

        let comments = load_comments(&store, "mission").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].email.as_deref(), Some("a@b.c"));
        assert_eq!(comments[0].created_at.as_deref(), Some(doc.created_at.as_str()));
    }

    #[test]
    fn test_detail_url_prefers_configured_base() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "localhost:8080".parse().unwrap());

        let mut config = Config {
            admin_psk: None,
            db_path: "site.sqlite".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            log_json: false,
            autosave_quiet: std::time::Duration::from_millis(1000),
            allowed_origins: Vec::new(),
            public_url: None,
        };
        assert_eq!(
            detail_url(&config, &headers, "a b"),
            "http://localhost:8080/detail?id=a%20b"
        );

        config.public_url = Some("https://example.com".to_string());
        assert_eq!(
            detail_url(&config, &headers, "mission"),
            "https://example.com/detail?id=mission"
        );
    }
}
