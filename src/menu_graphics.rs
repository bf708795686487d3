use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::asset::SiteAsset;
use crate::styles::{StyleSheet, StyleSlot, MENU_GRAPHICS_SLOT};

/// Compiled menu graphics for one page view.
#[derive(Debug, Clone, Default)]
pub struct MenuGraphics {
    /// class name -> image url, one entry per distinct normalized label
    rules: BTreeMap<String, String>,
    size_px: u32,
}

/// How a navigation entry is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NavRenderMode {
    /// Image-only link carrying the menu graphic class.
    Graphic { class: String },
    /// Graphics mode is on but this entry has no image.
    Placeholder { initial: char },
    Text,
}

/// Lowercase, collapse whitespace runs into single hyphens and drop
/// characters that are not valid in a bare class name.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn menu_class(label: &str) -> Option<String> {
    let token = normalize_label(label);
    if token.is_empty() {
        None
    } else {
        Some(format!("menu-{}", token))
    }
}

impl MenuGraphics {
    /// Build rules from every active menu-graphic asset. Later assets win when
    /// two labels normalize to the same class.
    pub fn compile(assets: &[SiteAsset], size_px: u32) -> Self {
        let mut rules = BTreeMap::new();
        let mut labels: BTreeMap<String, String> = BTreeMap::new();

        for asset in assets.iter().filter(|a| a.is_menu_graphic() && a.active) {
            let class = match menu_class(&asset.menu_item) {
                Some(c) => c,
                None => {
                    log::warn!(
                        "[menu] menu graphic {} has no usable menu_item label, skipping",
                        asset.id
                    );
                    continue;
                }
            };
            if asset.image_url.trim().is_empty() {
                log::warn!("[menu] menu graphic {} has no image_url, skipping", asset.id);
                continue;
            }
            if let Some(other) = collapsed_label(&mut labels, &class, &asset.menu_item) {
                log::warn!(
                    "[menu] labels '{}' and '{}' both normalize to {}",
                    other,
                    asset.menu_item.trim(),
                    class
                );
            }
            if let Some(previous) = rules.insert(class.clone(), asset.image_url.clone()) {
                log::warn!(
                    "[menu] {} defined more than once, {} replaces {}",
                    class,
                    asset.image_url,
                    previous
                );
            }
        }

        MenuGraphics { rules, size_px }
    }

    /// Whether `label` has a graphic. Uses the same normalization as the
    /// class derivation, so anything that gets a CSS rule also matches here.
    pub fn has_graphic(&self, label: &str) -> bool {
        menu_class(label)
            .map(|c| self.rules.contains_key(&c))
            .unwrap_or(false)
    }

    #[cfg(test)]
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn css_text(&self) -> String {
        let size = self.size_px;
        let mut css = String::new();
        for (class, url) in &self.rules {
            css.push_str(&format!(
                r#".{class} {{
    background-image: url("{url}");
    background-size: contain;
    background-position: center;
    background-repeat: no-repeat;
    width: {size}px;
    height: {size}px;
    transition: transform 0.2s ease, box-shadow 0.2s ease;
}}
.{class}:hover {{
    transform: scale(1.08) rotate(-2deg);
    box-shadow: 0 6px 16px rgba(0, 0, 0, 0.2);
}}
"#,
                class = class,
                url = css_url_escape(url),
                size = size,
            ));
        }
        css
    }

    /// Inject into the sheet's menu-graphics slot, replacing earlier output.
    pub fn apply(&self, sheet: &StyleSheet) -> StyleSlot {
        log::debug!("[menu] injecting {} graphic rule(s)", self.rules.len());
        sheet.inject(MENU_GRAPHICS_SLOT, self.css_text())
    }

    pub fn render_mode(&self, label: &str, graphics_enabled: bool) -> NavRenderMode {
        if !graphics_enabled {
            return NavRenderMode::Text;
        }
        if self.has_graphic(label) {
            if let Some(class) = menu_class(label) {
                return NavRenderMode::Graphic { class };
            }
        }
        NavRenderMode::Placeholder {
            initial: label
                .trim()
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('?'),
        }
    }
}

/// Record `raw` under `class`; returns the earlier label when a different
/// spelling already claimed the same class. Whitespace and case variants of
/// one label do not count.
fn collapsed_label(seen: &mut BTreeMap<String, String>, class: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    match seen.get(class) {
        Some(first) if !same_spelling(first, raw) => Some(first.clone()),
        Some(_) => None,
        None => {
            seen.insert(class.to_string(), raw.to_string());
            None
        }
    }
}

fn same_spelling(a: &str, b: &str) -> bool {
    let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    squash(a) == squash(b)
}

fn css_url_escape(url: &str) -> String {
    url.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| match c {
            '"' => "%22".to_string(),
            '\\' => "%5C".to_string(),
            '<' => "%3C".to_string(),
            '>' => "%3E".to_string(),
            other => other.to_string(),
        })
        .collect()
}
