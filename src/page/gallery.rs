//! Gallery rendering for the photo and video sections.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Element, Page};
use crate::models::{GalleryItem, GalleryKind};

static YOUTUBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]+)")
        .unwrap()
});
static VIMEO: Lazy<Regex> = Lazy::new(|| Regex::new(r"vimeo\.com/(?:video/)?(\d+)").unwrap());

/// Turn a known video page URL into its embeddable form; other URLs pass through.
pub fn embed_url(url: &str) -> String {
    if let Some(caps) = YOUTUBE.captures(url) {
        return format!("https://www.youtube.com/embed/{}", &caps[1]);
    }
    if let Some(caps) = VIMEO.captures(url) {
        return format!("https://player.vimeo.com/video/{}", &caps[1]);
    }
    url.to_string()
}

/// Replace the container's children with one node per item, in order.
pub fn render_gallery(
    page: &mut Page,
    container_id: &str,
    items: &[GalleryItem],
    kind: GalleryKind,
) {
    let Some(container) = page.get_mut(container_id) else {
        tracing::debug!("No #{} on this page, skipping gallery", container_id);
        return;
    };

    container.clear();
    for (index, item) in items.iter().enumerate() {
        let node = match item.kind {
            GalleryKind::Image => Element::new("img")
                .with_attr("src", &item.url)
                .with_attr("alt", format!("Gallery image {}", index + 1))
                .with_attr("loading", "lazy"),
            GalleryKind::Video => Element::new("iframe")
                .with_attr("src", embed_url(&item.url))
                .with_attr("frameborder", "0")
                .with_attr("allowfullscreen", "true"),
        };
        container.append(
            node.with_class("gallery-item")
                .with_class(&format!("{}-gallery-item", kind.as_str())),
        );
    }
}

/// Admin listing: one row per item with its URL, type and a remove control.
pub fn render_gallery_list(page: &mut Page, container_id: &str, items: &[GalleryItem]) {
    let Some(container) = page.get_mut(container_id) else {
        tracing::debug!("No #{} on this page, skipping gallery list", container_id);
        return;
    };

    container.clear();
    for (index, item) in items.iter().enumerate() {
        let row = Element::new("div")
            .with_class("gallery-item")
            .with_child(
                Element::new("span").with_text(format!("{} ({})", item.url, item.kind.as_str())),
            )
            .with_child(
                Element::new("button")
                    .with_class("btn")
                    .with_class("btn-danger")
                    .with_class("btn-small")
                    .with_attr("data-index", index.to_string())
                    .with_text("Remove"),
            );
        container.append(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(container: &str) -> Page {
        let mut page = Page::new();
        page.push(Element::new("div").with_id(container));
        page
    }

    #[test]
    fn test_youtube_watch_url() {
        let url = embed_url("https://www.youtube.com/watch?v=abc123");
        assert!(url.contains("/embed/abc123"));
        assert_eq!(
            embed_url("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=3"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_vimeo_and_passthrough() {
        assert_eq!(
            embed_url("https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            embed_url("https://cdn.example.com/clip.mp4"),
            "https://cdn.example.com/clip.mp4"
        );
    }

    #[test]
    fn test_images_render_in_order_and_rerender_after_removal() {
        let mut page = page_with("session6-gallery");
        let mut items = vec![
            GalleryItem::new("a.jpg", GalleryKind::Image),
            GalleryItem::new("b.jpg", GalleryKind::Image),
        ];

        render_gallery(&mut page, "session6-gallery", &items, GalleryKind::Image);
        let srcs: Vec<_> = page
            .get("session6-gallery")
            .unwrap()
            .children()
            .iter()
            .map(|img| (img.tag.as_str(), img.attr("src").unwrap()))
            .collect();
        assert_eq!(srcs, vec![("img", "a.jpg"), ("img", "b.jpg")]);

        items.remove(0);
        render_gallery(&mut page, "session6-gallery", &items, GalleryKind::Image);
        let children = page.get("session6-gallery").unwrap().children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attr("src"), Some("b.jpg"));
    }

    #[test]
    fn test_videos_render_as_embeds() {
        let mut page = page_with("session7-gallery");
        let items = vec![GalleryItem::new(
            "https://www.youtube.com/watch?v=abc123",
            GalleryKind::Video,
        )];

        render_gallery(&mut page, "session7-gallery", &items, GalleryKind::Video);
        let frame = &page.get("session7-gallery").unwrap().children()[0];
        assert_eq!(frame.tag, "iframe");
        assert_eq!(frame.attr("src"), Some("https://www.youtube.com/embed/abc123"));
    }

    #[test]
    fn test_empty_items_clear_container() {
        let mut page = page_with("session6-gallery");
        render_gallery(
            &mut page,
            "session6-gallery",
            &[GalleryItem::new("a.jpg", GalleryKind::Image)],
            GalleryKind::Image,
        );
        render_gallery(&mut page, "session6-gallery", &[], GalleryKind::Image);
        assert!(page.get("session6-gallery").unwrap().children().is_empty());
    }

    #[test]
    fn test_admin_list_rows_carry_index() {
        let mut page = page_with("session6-gallery-list");
        let items = vec![
            GalleryItem::new("a.jpg", GalleryKind::Image),
            GalleryItem::new("b.jpg", GalleryKind::Image),
        ];
        render_gallery_list(&mut page, "session6-gallery-list", &items);

        let rows = page.get("session6-gallery-list").unwrap().children();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].children()[0].text(), Some("b.jpg (image)"));
        assert_eq!(rows[1].children()[1].attr("data-index"), Some("1"));
    }
}
