//! Settings applier: CSS custom properties, inline effects, layout and visibility.

use super::{Page, Selector};
use crate::models::SettingsDocument;

/// Duration and easing appended to the configured hero animation name.
const HERO_ANIMATION_TIMING: &str = "1s ease-out";

const NEUTRAL_TRANSFORM: &str = "none";

const GRID_LAYOUTS: &[&str] = &["2", "3", "4"];

/// What a setting controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// Color written to `--{key}`.
    Color { default: &'static str },
    /// CSS length written to `--{key}`.
    Length { default: &'static str },
    /// Font stack written to `--{key}`.
    Font { default: &'static str },
    /// Animation name applied inline to `.hero-image`.
    HeroAnimation,
    /// Named transform applied inline to every `.card`.
    CardHover,
    /// Column count class on `#session5-grid`.
    GridLayout,
    /// Shows or hides everything matching the selector.
    Toggle { selector: &'static str },
}

#[derive(Debug)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub kind: SettingKind,
}

const fn color(key: &'static str, default: &'static str) -> SettingDescriptor {
    SettingDescriptor {
        key,
        kind: SettingKind::Color { default },
    }
}

const fn toggle(key: &'static str, selector: &'static str) -> SettingDescriptor {
    SettingDescriptor {
        key,
        kind: SettingKind::Toggle { selector },
    }
}

pub static SETTINGS: &[SettingDescriptor] = &[
    color("header-bg-color", "#2c3e50"),
    color("footer-bg-color", "#2c3e50"),
    color("session1-bg-color", "#f8f9fa"),
    color("session2-bg-color", "#ffffff"),
    color("session3-bg-color", "#f8f9fa"),
    color("session4-bg-color", "#ffffff"),
    color("session5-bg-color", "#f8f9fa"),
    color("session6-bg-color", "#ffffff"),
    color("session7-bg-color", "#f8f9fa"),
    SettingDescriptor {
        key: "main-title-size",
        kind: SettingKind::Length { default: "3rem" },
    },
    SettingDescriptor {
        key: "section-heading-size",
        kind: SettingKind::Length { default: "2.5rem" },
    },
    SettingDescriptor {
        key: "body-font",
        kind: SettingKind::Font {
            default: "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif",
        },
    },
    SettingDescriptor {
        key: "hero-animation",
        kind: SettingKind::HeroAnimation,
    },
    SettingDescriptor {
        key: "card-hover",
        kind: SettingKind::CardHover,
    },
    SettingDescriptor {
        key: "session5-layout",
        kind: SettingKind::GridLayout,
    },
    toggle("show-social", ".social-icons"),
    toggle("show-session6", "#session6"),
    toggle("show-session7", "#session7"),
    toggle("show-session6-gallery", "#session6-gallery"),
    toggle("show-session7-gallery", "#session7-gallery"),
    toggle("show-session2-col1", "#session2-col1"),
    toggle("show-session2-col2", "#session2-col2"),
    toggle("show-session2-col3", "#session2-col3"),
    toggle("show-session3-col1", "#session3-col1"),
    toggle("show-session3-col2", "#session3-col2"),
    toggle("show-session3-col3", "#session3-col3"),
    toggle("show-session4-col1", "#session4-col1"),
    toggle("show-session4-col2", "#session4-col2"),
    toggle("show-session4-col3", "#session4-col3"),
    toggle("show-session5-col1", "#session5-col1"),
    toggle("show-session5-col2", "#session5-col2"),
    toggle("show-session5-col3", "#session5-col3"),
    toggle("show-session5-col4", "#session5-col4"),
];

pub fn descriptor(key: &str) -> Option<&'static SettingDescriptor> {
    SETTINGS.iter().find(|s| s.key == key)
}

/// Reconcile the page with a settings document.
///
/// Every known setting is written on every call, falling back to its default,
/// so the result depends only on `settings` and never on what was applied before.
/// Unknown keys are ignored.
pub fn apply_settings(settings: &SettingsDocument, page: &mut Page) {
    for setting in SETTINGS {
        let value = settings.text(setting.key);
        match setting.kind {
            SettingKind::Color { default }
            | SettingKind::Length { default }
            | SettingKind::Font { default } => {
                page.set_root_var(setting.key, value.unwrap_or_else(|| default.to_string()));
            }
            SettingKind::HeroAnimation => apply_hero_animation(page, value.as_deref()),
            SettingKind::CardHover => apply_card_hover(page, value.as_deref()),
            SettingKind::GridLayout => apply_grid_layout(page, value.as_deref()),
            SettingKind::Toggle { selector } => {
                let visible = settings.flag(setting.key).unwrap_or(true);
                apply_toggle(page, selector, visible);
            }
        }
    }

    let ignored = settings
        .0
        .keys()
        .filter(|key| descriptor(key).is_none())
        .count();
    if ignored > 0 {
        tracing::debug!("Ignored {} unknown settings keys", ignored);
    }
}

fn apply_hero_animation(page: &mut Page, animation: Option<&str>) {
    let selector = Selector::Class("hero-image".to_string());
    for hero in page.select_mut(&selector) {
        match animation {
            None | Some("none") => hero.remove_style("animation"),
            Some(name) => {
                hero.set_style("animation", format!("{} {}", name, HERO_ANIMATION_TIMING))
            }
        }
    }
}

/// Inline transform for a named hover effect.
pub fn card_transform(effect: Option<&str>) -> &'static str {
    match effect {
        Some("lift") => "translateY(-10px)",
        Some("scale") => "scale(1.05)",
        Some("rotate") => "rotate(2deg)",
        None | Some("none") => NEUTRAL_TRANSFORM,
        Some(other) => {
            tracing::debug!("Unknown card hover effect {:?}, using neutral transform", other);
            NEUTRAL_TRANSFORM
        }
    }
}

fn apply_card_hover(page: &mut Page, effect: Option<&str>) {
    let transform = card_transform(effect);
    let selector = Selector::Class("card".to_string());
    for card in page.select_mut(&selector) {
        card.set_style("transform", transform);
    }
}

fn apply_grid_layout(page: &mut Page, columns: Option<&str>) {
    let Some(columns) = columns.filter(|c| GRID_LAYOUTS.contains(c)) else {
        return;
    };
    let Some(grid) = page.get_mut("session5-grid") else {
        tracing::debug!("No #session5-grid on this page, skipping layout");
        return;
    };
    for layout in GRID_LAYOUTS {
        grid.remove_class(&format!("grid-{}", layout));
    }
    grid.add_class(&format!("grid-{}", columns));
}

fn apply_toggle(page: &mut Page, selector: &str, visible: bool) {
    let Some(selector) = Selector::parse(selector) else {
        return;
    };
    let mut matched = 0;
    for element in page.select_mut(&selector) {
        element.set_visible(visible);
        matched += 1;
    }
    if matched == 0 {
        tracing::debug!("No element matches {:?}, skipping visibility toggle", selector);
    }
}
