//! Navigation menu rendering.

use super::{Element, Page};
use crate::models::MenuDocument;

/// Containers that receive the menu.
pub const MENU_CONTAINERS: &[&str] = &["desktop-menu", "mobile-menu"];

/// Render one `li > a` per item, in list order, into every menu container.
pub fn render_menu(page: &mut Page, menu: &MenuDocument) {
    for container_id in MENU_CONTAINERS {
        let Some(container) = page.get_mut(container_id) else {
            tracing::debug!("No #{} on this page, skipping menu", container_id);
            continue;
        };

        container.clear();
        for item in &menu.items {
            container.append(
                Element::new("li").with_child(
                    Element::new("a")
                        .with_attr("href", &item.url)
                        .with_attr("data-menu-id", &item.id)
                        .with_text(&item.name),
                ),
            );
        }
    }
}
