use rusqlite::Row;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::null_as_default;
use super::page::Page;

/// Value kind recorded alongside each setting row. Purely advisory: values
/// are always stored and transported as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    Text,
    Number,
    Color,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Text => "text",
            SettingType::Number => "number",
            SettingType::Color => "color",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "number" => SettingType::Number,
            "color" => SettingType::Color,
            _ => SettingType::Text,
        }
    }
}

/// Null or unrecognised kinds read as `Text`.
fn lenient_setting_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SettingType, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| SettingType::parse(&s)).unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_setting_type")]
    pub setting_type: SettingType,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingForm {
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub setting_type: SettingType,
    #[serde(default)]
    pub description: Option<String>,
}

impl Setting {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get("type")?;
        Ok(Setting {
            key: row.get("key")?,
            value: row.get("value")?,
            setting_type: SettingType::parse(&kind),
            description: row.get("description")?,
        })
    }

    /// Flatten a fetched settings table into the key/value map the accessors expose.
    pub fn into_map(settings: Vec<Setting>) -> HashMap<String, String> {
        settings.into_iter().map(|s| (s.key, s.value)).collect()
    }
}

// ── Typed snapshot ──────────────────────────────────────

pub const DEFAULT_SITE_NAME: &str = "Bounce & Play Hire";
pub const DEFAULT_GRAPHIC_SIZE: u32 = 64;

const GLOBAL_KEYS: &[&str] = &[
    "site_name",
    "site_tagline",
    "contact_phone",
    "contact_email",
    "footer_text",
    "menu_graphics_enabled",
    "menu_graphic_size",
];

/// Every setting the site understands, with defaults applied.
/// Built fresh from the raw key/value map on each page view.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_tagline: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub footer_text: String,
    pub menu_graphics_enabled: bool,
    pub menu_graphic_size: u32,
    background_colors: HashMap<Page, String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_tagline: "Bouncy castles, soft play and party fun delivered to your door".to_string(),
            contact_phone: String::new(),
            contact_email: String::new(),
            footer_text: String::new(),
            menu_graphics_enabled: false,
            menu_graphic_size: DEFAULT_GRAPHIC_SIZE,
            background_colors: HashMap::new(),
        }
    }
}

impl SiteSettings {
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let mut out = SiteSettings::default();

        let text = |key: &str, default: &str| -> String {
            match map.get(key) {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => default.to_string(),
            }
        };

        out.site_name = text("site_name", &out.site_name);
        out.site_tagline = text("site_tagline", &out.site_tagline);
        out.contact_phone = text("contact_phone", "");
        out.contact_email = text("contact_email", "");
        out.footer_text = text("footer_text", "");
        if let Some(raw) = map.get("menu_graphics_enabled") {
            match parse_flag(raw) {
                Some(on) => out.menu_graphics_enabled = on,
                None => log::warn!(
                    "[settings] menu_graphics_enabled '{}' is not a yes/no value, graphics stay off",
                    raw
                ),
            }
        }

        if let Some(raw) = map.get("menu_graphic_size") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => out.menu_graphic_size = n,
                _ => log::warn!(
                    "[settings] menu_graphic_size '{}' is not a positive number, using {}",
                    raw,
                    DEFAULT_GRAPHIC_SIZE
                ),
            }
        }

        for page in Page::ALL {
            if let Some(raw) = map.get(&page.background_key()) {
                let value = raw.trim();
                if value.is_empty() {
                    continue;
                }
                if is_safe_css_value(value) {
                    out.background_colors.insert(page, value.to_string());
                } else {
                    log::warn!(
                        "[settings] ignoring unsafe color value for {}",
                        page.background_key()
                    );
                }
            }
        }

        for key in map.keys() {
            if !is_known_key(key) {
                log::warn!("[settings] unrecognized setting key '{}'", key);
            }
        }

        out
    }

    /// Configured background color for `page`, if any.
    pub fn background_color(&self, page: Page) -> Option<&str> {
        self.background_colors.get(&page).map(|s| s.as_str())
    }
}

/// `true/false`, `1/0`, `yes/no`, `on/off`, any case, surrounding space ignored.
/// Empty reads as off.
fn parse_flag(raw: &str) -> Option<bool> {
    let v = raw.trim();
    if v.is_empty() {
        return Some(false);
    }
    ["true", "1", "yes", "on"]
        .iter()
        .any(|t| v.eq_ignore_ascii_case(t))
        .then_some(true)
        .or_else(|| {
            ["false", "0", "no", "off"]
                .iter()
                .any(|f| v.eq_ignore_ascii_case(f))
                .then_some(false)
        })
}

fn is_known_key(key: &str) -> bool {
    GLOBAL_KEYS.contains(&key) || Page::ALL.iter().any(|p| p.background_key() == key)
}

/// Rejects anything that could escape a single CSS declaration.
pub(crate) fn is_safe_css_value(value: &str) -> bool {
    !value
        .chars()
        .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\' | '\n' | '\r'))
}
