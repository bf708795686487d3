use serde::Serialize;

use crate::models::page::Page;
use crate::models::settings::SiteSettings;
use crate::styles::{StyleSheet, StyleSlot, THEME_SLOT};

/// Background used when a page has no color configured.
pub const DEFAULT_BACKGROUND: &str = "#2196F3";
/// The one background that would clash with a blue accent.
pub const BRAND_BLUE: &str = "#1E88E5";
pub const BRAND_YELLOW: &str = "#FFD600";
pub const WHITE: &str = "#FFFFFF";
pub const NEAR_BLACK: &str = "#1A1A1A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeTokens {
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
}

/// Derive the page palette from its configured background color.
///
/// Text is white on everything except pure white, where it turns near-black.
/// Accent is brand yellow except on brand blue, where it becomes brand blue.
/// Both comparisons are plain hex string matches, not luminance checks.
pub fn compile(page: Page, settings: &SiteSettings) -> ThemeTokens {
    let background = settings
        .background_color(page)
        .unwrap_or(DEFAULT_BACKGROUND)
        .to_string();

    let text_color = if background.eq_ignore_ascii_case(WHITE) {
        NEAR_BLACK
    } else {
        WHITE
    };

    let accent_color = if background.eq_ignore_ascii_case(BRAND_BLUE) {
        BRAND_BLUE
    } else {
        BRAND_YELLOW
    };

    ThemeTokens {
        background_color: background,
        text_color: text_color.to_string(),
        accent_color: accent_color.to_string(),
    }
}

/// Compile and inject into the sheet's theme slot, replacing whatever the
/// slot held before.
pub fn apply(page: Page, settings: &SiteSettings, sheet: &StyleSheet) -> (ThemeTokens, StyleSlot) {
    let tokens = compile(page, settings);
    log::debug!(
        "[theme] {} -> bg {} text {} accent {}",
        page,
        tokens.background_color,
        tokens.text_color,
        tokens.accent_color
    );
    let slot = sheet.inject(THEME_SLOT, tokens.css());
    (tokens, slot)
}

impl ThemeTokens {
    pub fn css(&self) -> String {
        format!(
            r#":root {{
    --page-bg-color: {bg};
    --page-text-color: {text};
    --page-accent-color: {accent};
}}
.themed-bg {{ background-color: var(--page-bg-color); }}
.themed-text {{ color: var(--page-text-color); }}
.themed-accent {{ color: var(--page-accent-color); }}
.themed-border {{ border-color: var(--page-accent-color); }}"#,
            bg = self.background_color,
            text = self.text_color,
            accent = self.accent_color,
        )
    }
}
