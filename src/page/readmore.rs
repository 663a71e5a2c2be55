//! Read-more behavior for long rich-text fields.
//!
//! The full content is kept beside the page, so collapsing and expanding never
//! reads back from the possibly truncated element.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Page;

/// Plain-text length above which a field can collapse.
pub const READ_MORE_THRESHOLD: usize = 200;

const ELLIPSIS: &str = "...";
const LABEL_COLLAPSED: &str = "Read More";
const LABEL_EXPANDED: &str = "Read Less";

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Collapsible state of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMore {
    pub full: String,
    pub expanded: bool,
}

/// Markup with tags removed and entities decoded, as a reader sees it.
pub fn plain_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    html_escape::decode_html_entities(&stripped).trim().to_string()
}

fn preview(full: &str) -> String {
    let text: String = plain_text(full).chars().take(READ_MORE_THRESHOLD).collect();
    format!("{}{}", text.trim_end(), ELLIPSIS)
}

fn toggle_id(field_id: &str) -> String {
    format!("{}-toggle", field_id)
}

/// Show `full` in `field_id`, collapsed when enabled and long enough.
///
/// Always starts from the initial state for the given input; an earlier
/// expand/collapse choice is not preserved.
pub fn apply_read_more(page: &mut Page, field_id: &str, full: &str, enabled: bool) {
    let collapsible = enabled && plain_text(full).chars().count() > READ_MORE_THRESHOLD;

    if collapsible {
        page.read_more.insert(
            field_id.to_string(),
            ReadMore {
                full: full.to_string(),
                expanded: false,
            },
        );
        render(page, field_id);
        return;
    }

    page.read_more.remove(field_id);
    match page.get_mut(field_id) {
        Some(element) => element.set_html(full),
        None => tracing::debug!("No #{} on this page, skipping field", field_id),
    }
    if let Some(button) = page.get_mut(&toggle_id(field_id)) {
        button.set_visible(false);
    }
}

/// Flip a collapsible field between collapsed and expanded.
///
/// Returns the new expanded state, or `None` when the field has no read-more control.
pub fn toggle_read_more(page: &mut Page, field_id: &str) -> Option<bool> {
    let state = page.read_more.get_mut(field_id)?;
    state.expanded = !state.expanded;
    let expanded = state.expanded;
    render(page, field_id);
    Some(expanded)
}

fn render(page: &mut Page, field_id: &str) {
    let Some(state) = page.read_more.get(field_id).cloned() else {
        return;
    };

    match page.get_mut(field_id) {
        Some(element) if state.expanded => element.set_html(state.full),
        Some(element) => element.set_text(preview(&state.full)),
        None => tracing::debug!("No #{} on this page, skipping field", field_id),
    }

    if let Some(button) = page.get_mut(&toggle_id(field_id)) {
        button.set_visible(true);
        button.set_text(if state.expanded {
            LABEL_EXPANDED
        } else {
            LABEL_COLLAPSED
        });
    }
}
