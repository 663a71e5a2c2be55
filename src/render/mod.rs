//! HTML serialization of pages, custom pages and article details.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{related_articles, Article, Comment};
use crate::page::readmore::plain_text;
use crate::page::{Content, Element, Page};

/// Characters of the first paragraph used as the article's meta description.
const DESCRIPTION_CHARS: usize = 160;

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap());
static BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").unwrap());
static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Strip characters that would end a declaration or the style element.
fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

fn render_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    if let Some(id) = &element.id {
        out.push_str(&format!(" id=\"{}\"", escape_html(id)));
    }
    if !element.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape_html(&element.classes.join(" "))));
    }
    if !element.style.is_empty() {
        let style: Vec<String> = element
            .style
            .iter()
            .map(|(property, value)| format!("{}: {}", property, css_value(value)))
            .collect();
        out.push_str(&format!(" style=\"{}\"", escape_html(&style.join("; "))));
    }
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag.as_str()) {
        return;
    }

    match &element.content {
        Content::Empty => {}
        Content::Text(text) => out.push_str(&escape_html(text)),
        Content::Html(html) => out.push_str(html),
        Content::Children(children) => {
            for child in children {
                render_element(child, out);
            }
        }
    }
    out.push_str(&format!("</{}>", element.tag));
}

fn document(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        head,
        body
    )
}

/// Serialize a page: root custom properties in a `:root` rule, then every element.
pub fn page_document(page: &Page, title: &str) -> String {
    let vars: String = page
        .root_vars
        .iter()
        .map(|(name, value)| format!("--{}: {};", name, css_value(value)))
        .collect();
    let head = format!("<style>:root {{ {} }}</style>\n", vars);

    let mut body = String::new();
    for element in &page.elements {
        render_element(element, &mut body);
        body.push('\n');
    }
    document(title, &head, &body)
}

/// In-page error state for the standalone routes.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<div id=\"custom-content\"><div class=\"container error-state\">\
         <h2>Error</h2><p class=\"error-message\">{}</p>\
         <a href=\"/\" class=\"btn\">Go Back Home</a></div></div>",
        escape_html(message)
    );
    document(title, "", &body)
}

/// Pieces of a stored custom page document.
#[derive(Debug, PartialEq)]
pub struct CustomPageParts<'a> {
    pub title: Option<String>,
    pub styles: Vec<&'a str>,
    pub body: &'a str,
    /// Scripts outside the body; those inside stay in place.
    pub scripts: Vec<&'a str>,
}

/// Split a stored page into title, styles, body and scripts.
///
/// Content without a `<body>` is used whole as the body.
pub fn split_custom_page(content: &str) -> CustomPageParts<'_> {
    let title = TITLE
        .captures(content)
        .map(|caps| plain_text(&caps[1]))
        .filter(|title| !title.is_empty());

    let body_match = BODY
        .captures(content)
        .and_then(|caps| caps.get(0).zip(caps.get(1)));
    let (body, outside) = match body_match {
        Some((all, inner)) => (inner.as_str(), [&content[..all.start()], &content[all.end()..]]),
        None => (content, ["", ""]),
    };

    CustomPageParts {
        title,
        styles: matches_in(&outside, &STYLE, 1),
        body,
        scripts: matches_in(&outside, &SCRIPT, 0),
    }
}

fn matches_in<'a>(parts: &[&'a str], re: &Regex, group: usize) -> Vec<&'a str> {
    parts
        .iter()
        .copied()
        .flat_map(|part| re.captures_iter(part))
        .filter_map(|caps| caps.get(group).map(|m| m.as_str()))
        .collect()
}

pub fn custom_page(content: &str) -> String {
    let parts = split_custom_page(content);
    let head: String = parts
        .styles
        .iter()
        .map(|style| format!("<style>{}</style>\n", style))
        .collect();
    let scripts: String = parts.scripts.concat();
    let body = format!("<div id=\"custom-content\">{}</div>{}", parts.body, scripts);
    document(parts.title.as_deref().unwrap_or("Custom Page"), &head, &body)
}

/// First paragraph as plain text, cut to 160 characters; the title when there is none.
pub fn meta_description(article: &Article) -> String {
    match PARAGRAPH.captures(&article.content) {
        Some(caps) => {
            let text: String = plain_text(&caps[1]).chars().take(DESCRIPTION_CHARS).collect();
            format!("{}...", text)
        }
        None => article.title.clone(),
    }
}

/// Render a stored date (RFC 3339 or `YYYY-MM-DD`) as e.g. `5 March 2024`.
pub fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%-d %B %Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%-d %B %Y").to_string();
    }
    raw.to_string()
}

fn tag_anchor(tag: &str) -> String {
    format!("#tag-{}", WHITESPACE.replace_all(&tag.to_lowercase(), "-"))
}

/// Comments of an article as read from the store.
#[derive(Debug, Clone, Copy)]
pub enum ArticleComments<'a> {
    /// Newest first.
    Loaded(&'a [Comment]),
    Unavailable,
}

/// An article and what its detail page shows around it.
#[derive(Debug, Clone, Copy)]
pub struct ArticleView<'a> {
    pub id: &'a str,
    pub article: &'a Article,
    /// Absolute address of the detail page, for `og:url` and the share links.
    pub url: &'a str,
    pub comments: ArticleComments<'a>,
}

/// Share targets as (label, href).
pub fn share_links(url: &str, title: &str) -> [(&'static str, String); 4] {
    let url = urlencoding::encode(url);
    let title = urlencoding::encode(title);
    [
        (
            "Facebook",
            format!("https://www.facebook.com/sharer/sharer.php?u={}&t={}", url, title),
        ),
        (
            "Twitter",
            format!("https://twitter.com/intent/tweet?url={}&text={}", url, title),
        ),
        (
            "LinkedIn",
            format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}&title={}",
                url, title
            ),
        ),
        ("WhatsApp", format!("https://wa.me/?text={}%20{}", title, url)),
    ]
}

fn push_comments(body: &mut String, comments: ArticleComments<'_>) {
    body.push_str("<section id=\"comments-list\">");
    match comments {
        ArticleComments::Unavailable => {
            body.push_str("<p>Unable to load comments at this time.</p>");
        }
        ArticleComments::Loaded([]) => {
            body.push_str("<p>No comments yet. Be the first to comment!</p>");
        }
        ArticleComments::Loaded(comments) => {
            for comment in comments {
                let date = comment.created_at.as_deref().map(format_date).unwrap_or_default();
                body.push_str(&format!(
                    "<div class=\"comment\"><div class=\"comment-header\">\
                     <span class=\"comment-author\">{}</span>\
                     <span class=\"comment-date\">{}</span></div>\
                     <div class=\"comment-content\">{}</div></div>",
                    escape_html(&comment.name),
                    escape_html(&date),
                    escape_html(&comment.message)
                ));
            }
        }
    }
    body.push_str("</section>");
}

fn push_related(body: &mut String, current: &str) {
    body.push_str("<div id=\"related-articles\">");
    for related in related_articles(current) {
        body.push_str(&format!(
            "<div class=\"related-article\"><img src=\"{}\" alt=\"{}\">\
             <div class=\"related-article-content\"><h4>{}</h4><p>{}</p>\
             <a href=\"/detail?id={}\" class=\"read-more\">Read More</a></div></div>",
            escape_html(related.image),
            escape_html(related.title),
            escape_html(related.title),
            escape_html(related.excerpt),
            urlencoding::encode(related.id)
        ));
    }
    body.push_str("</div>");
}

pub fn article_page(view: ArticleView<'_>) -> String {
    let article = view.article;
    let description = meta_description(article);
    let image = article.image.as_deref().unwrap_or("");
    let mut head = String::new();
    for (attribute, key, value) in [
        ("name", "description", description.as_str()),
        ("property", "og:title", article.title.as_str()),
        ("property", "og:description", description.as_str()),
        ("property", "og:image", image),
        ("property", "og:url", view.url),
        ("property", "og:type", "article"),
        ("name", "twitter:card", "summary_large_image"),
        ("name", "twitter:title", article.title.as_str()),
        ("name", "twitter:description", description.as_str()),
        ("name", "twitter:image", image),
    ] {
        head.push_str(&format!(
            "<meta {}=\"{}\" content=\"{}\">\n",
            attribute,
            key,
            escape_html(value)
        ));
    }

    let mut body = format!(
        "<nav class=\"breadcrumb\"><a href=\"/\">Home</a> / \
         <span id=\"breadcrumb-current\">{}</span></nav>",
        escape_html(&article.title)
    );
    body.push_str("<article class=\"detail\">");
    body.push_str(&format!(
        "<h1 id=\"detail-title\">{}</h1>",
        escape_html(&article.title)
    ));
    body.push_str("<div class=\"detail-meta\">");
    if let Some(date) = &article.date {
        body.push_str(&format!(
            "<span id=\"detail-date\">{}</span>",
            escape_html(&format_date(date))
        ));
    }
    if let Some(category) = &article.category {
        body.push_str(&format!(
            "<span id=\"detail-category\">{}</span>",
            escape_html(category)
        ));
    }
    body.push_str("</div>");
    if let Some(image) = &article.image {
        body.push_str(&format!(
            "<img id=\"detail-image\" src=\"{}\" alt=\"{}\">",
            escape_html(image),
            escape_html(&article.title)
        ));
    }
    if let Some(video) = &article.video {
        body.push_str(&format!(
            "<div id=\"detail-video-container\"><iframe id=\"detail-video\" src=\"{}\" \
             frameborder=\"0\" allowfullscreen></iframe></div>",
            escape_html(video)
        ));
    }
    body.push_str(&format!("<div id=\"detail-content\">{}</div>", article.content));

    body.push_str("<div id=\"detail-tags\">");
    for tag in &article.tags {
        body.push_str(&format!(
            "<a href=\"{}\" class=\"tag\">{}</a>",
            escape_html(&tag_anchor(tag)),
            escape_html(tag)
        ));
    }
    body.push_str("</div>");

    body.push_str("<div class=\"share-buttons\">");
    for (label, href) in share_links(view.url, &article.title) {
        body.push_str(&format!(
            "<a class=\"share-{}\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            label.to_lowercase(),
            escape_html(&href),
            label
        ));
    }
    body.push_str("</div></article>");

    push_related(&mut body, view.id);
    push_comments(&mut body, view.comments);

    document(&format!("{} - Professional Website", article.title), &head, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_page_document_serializes_vars_and_elements() {
        let mut page = Page::new();
        page.set_root_var("body-font", "'Segoe UI', sans-serif");
        page.push(
            Element::new("h2")
                .with_id("session2-heading")
                .with_class("title")
                .with_text("Fish & Chips"),
        );
        page.push(Element::new("div").with_id("rich").with_attr("data-x", "1"));
        page.get_mut("rich").unwrap().set_html("<b>bold</b>");
        page.push(Element::new("img").with_id("header-logo").with_attr("src", "a.png"));
        page.get_mut("session2-heading").unwrap().set_visible(false);

        let html = page_document(&page, "Home");
        assert!(html.contains(":root { --body-font: 'Segoe UI', sans-serif; }"));
        assert!(html.contains(
            "<h2 id=\"session2-heading\" class=\"title\" style=\"display: none\">Fish &amp; Chips</h2>"
        ));
        assert!(html.contains("<div id=\"rich\" data-x=\"1\"><b>bold</b></div>"));
        assert!(html.contains("<img id=\"header-logo\" src=\"a.png\">"));
        assert!(!html.contains("</img>"));
    }

    #[test]
    fn test_css_values_cannot_break_out() {
        let mut page = Page::new();
        page.set_root_var("header-bg-color", "red; } </style><script>");
        let html = page_document(&page, "x");
        assert!(!html.contains("</style><script>"));
    }

    #[test]
    fn test_custom_page_split() {
        let stored = "<html><head><title>Promo</title><style>h1{color:red}</style>\
                      <script src=\"a.js\"></script></head>\
                      <body><h1>Sale</h1><script>go()</script></body></html>";
        let parts = split_custom_page(stored);
        assert_eq!(parts.title.as_deref(), Some("Promo"));
        assert_eq!(parts.styles, vec!["h1{color:red}"]);
        assert_eq!(parts.body, "<h1>Sale</h1><script>go()</script>");
        assert_eq!(parts.scripts, vec!["<script src=\"a.js\"></script>"]);

        let html = custom_page(stored);
        assert!(html.contains("<title>Promo</title>"));
        assert!(html.contains("<div id=\"custom-content\"><h1>Sale</h1>"));
    }

    #[test]
    fn test_custom_page_without_body_is_used_whole() {
        let parts = split_custom_page("<p>Just a fragment</p>");
        assert_eq!(parts.body, "<p>Just a fragment</p>");
        assert!(parts.title.is_none());
        assert!(custom_page("<p>Just a fragment</p>").contains("<title>Custom Page</title>"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("Custom Page", "Page <not> found");
        assert!(html.contains("Page &lt;not&gt; found"));
        assert!(html.contains("Go Back Home"));
    }

    #[test]
    fn test_meta_description() {
        let article = Article {
            title: "Title".to_string(),
            content: format!("<h2>Intro</h2><p>{}</p><p>second</p>", "a".repeat(200)),
            ..Default::default()
        };
        let description = meta_description(&article);
        assert_eq!(description, format!("{}...", "a".repeat(160)));

        let short = Article {
            title: "Title".to_string(),
            content: "<p>Short <b>one</b></p>".to_string(),
            ..Default::default()
        };
        assert_eq!(meta_description(&short), "Short one...");

        let no_paragraph = Article {
            title: "Only title".to_string(),
            content: "<div>text</div>".to_string(),
            ..Default::default()
        };
        assert_eq!(meta_description(&no_paragraph), "Only title");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05"), "5 March 2024");
        assert_eq!(format_date("2024-03-05T10:00:00+00:00"), "5 March 2024");
        assert_eq!(format_date("someday"), "someday");
    }

    fn article() -> Article {
        Article {
            title: "Launch".to_string(),
            content: "<p>We launched.</p>".to_string(),
            tags: vec!["Big News".to_string()],
            category: Some("News".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_article_page() {
        let article = article();
        let comments = vec![Comment {
            article_id: "launch".to_string(),
            name: "<Ann>".to_string(),
            email: Some("ann@example.com".to_string()),
            message: "Nice".to_string(),
            created_at: Some("2024-01-02".to_string()),
            approved: Some(true),
        }];
        let view = ArticleView {
            id: "launch",
            article: &article,
            url: "https://example.com/detail?id=launch",
            comments: ArticleComments::Loaded(&comments),
        };

        let html = article_page(view);
        assert!(html.contains("<title>Launch - Professional Website</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"We launched....\">"));
        assert!(html.contains(
            "<meta property=\"og:url\" content=\"https://example.com/detail?id=launch\">"
        ));
        assert!(html.contains("<span id=\"breadcrumb-current\">Launch</span>"));
        assert!(html.contains("<a href=\"#tag-big-news\" class=\"tag\">Big News</a>"));
        assert!(html.contains("&lt;Ann&gt;"));
        assert!(html.contains("2 January 2024"));
        assert!(!html.contains("ann@example.com"));

        let empty = article_page(ArticleView {
            comments: ArticleComments::Loaded(&[]),
            ..view
        });
        assert!(empty.contains("No comments yet. Be the first to comment!"));

        let failed = article_page(ArticleView {
            comments: ArticleComments::Unavailable,
            ..view
        });
        assert!(failed.contains("Unable to load comments at this time."));
        assert!(!failed.contains("No comments yet"));
    }

    #[test]
    fn test_share_links_encode_url_and_title() {
        let links = share_links("https://example.com/detail?id=a b", "Fish & Chips");
        assert_eq!(
            links[0].1,
            "https://www.facebook.com/sharer/sharer.php\
             ?u=https%3A%2F%2Fexample.com%2Fdetail%3Fid%3Da%20b&t=Fish%20%26%20Chips"
        );
        assert!(links[1].1.starts_with("https://twitter.com/intent/tweet?url=https%3A%2F%2F"));
        assert!(links[2].1.ends_with("&title=Fish%20%26%20Chips"));
        assert_eq!(
            links[3].1,
            "https://wa.me/?text=Fish%20%26%20Chips%20https%3A%2F%2Fexample.com%2Fdetail%3Fid%3Da%20b"
        );

        let article = article();
        let html = article_page(ArticleView {
            id: "launch",
            article: &article,
            url: "https://example.com/detail?id=launch",
            comments: ArticleComments::Loaded(&[]),
        });
        assert!(html.contains("class=\"share-whatsapp\""));
        assert!(html.contains(
            "sharer.php?u=https%3A%2F%2Fexample.com%2Fdetail%3Fid%3Dlaunch&amp;t=Launch"
        ));
    }

    #[test]
    fn test_related_articles_skip_current() {
        let article = article();
        let html = article_page(ArticleView {
            id: "service2",
            article: &article,
            url: "https://example.com/detail?id=service2",
            comments: ArticleComments::Loaded(&[]),
        });
        assert_eq!(html.matches("class=\"related-article\"").count(), 2);
        assert!(html.contains("<a href=\"/detail?id=service1\" class=\"read-more\">"));
        assert!(html.contains("<a href=\"/detail?id=mission\" class=\"read-more\">"));
        assert!(!html.contains("href=\"/detail?id=service2\""));
    }
}
