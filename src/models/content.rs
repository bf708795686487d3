use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{id_as_string, null_as_default};

/// One persisted content block, scoped to a single page collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContentBlock {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content_text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_position: i32,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
}

/// Admin payload for creating or updating a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockForm {
    pub section_key: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content_text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default)]
    pub order_position: i32,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl PageContentBlock {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let active_raw: i64 = row.get("active")?;
        let metadata_raw: Option<String> = row.get("metadata")?;
        Ok(PageContentBlock {
            id: row.get("id")?,
            section_key: row.get("section_key")?,
            content_type: row.get("content_type")?,
            title: row.get("title")?,
            subtitle: row.get("subtitle")?,
            content_text: row.get("content_text")?,
            image_url: row.get("image_url")?,
            button_text: row.get("button_text")?,
            button_link: row.get("button_link")?,
            order_position: row.get("order_position")?,
            metadata: metadata_raw.and_then(|m| serde_json::from_str(&m).ok()),
            active: active_raw != 0,
        })
    }
}

/// Compiled-in fallback for one section. Same renderable shape as a stored
/// block, without identity or lifecycle fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultContentBlock {
    pub section_key: String,
    pub content_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content_text: Option<String>,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub metadata: Option<Value>,
}

impl DefaultContentBlock {
    pub fn new(section_key: &str, content_type: &str) -> Self {
        DefaultContentBlock {
            section_key: section_key.to_string(),
            content_type: content_type.to_string(),
            ..Default::default()
        }
    }

    pub fn title(mut self, v: &str) -> Self {
        self.title = Some(v.to_string());
        self
    }

    pub fn subtitle(mut self, v: &str) -> Self {
        self.subtitle = Some(v.to_string());
        self
    }

    pub fn text(mut self, v: &str) -> Self {
        self.content_text = Some(v.to_string());
        self
    }

    pub fn image(mut self, v: &str) -> Self {
        self.image_url = Some(v.to_string());
        self
    }

    pub fn button(mut self, text: &str, link: &str) -> Self {
        self.button_text = Some(text.to_string());
        self.button_link = Some(link.to_string());
        self
    }

    pub fn metadata(mut self, v: Value) -> Self {
        self.metadata = Some(v);
        self
    }
}

/// What a section actually renders with. Always considered active.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedContent {
    pub section_key: String,
    pub content_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content_text: Option<String>,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub metadata: Option<Value>,
}

impl From<&DefaultContentBlock> for ResolvedContent {
    fn from(d: &DefaultContentBlock) -> Self {
        ResolvedContent {
            section_key: d.section_key.clone(),
            content_type: d.content_type.clone(),
            title: d.title.clone(),
            subtitle: d.subtitle.clone(),
            content_text: d.content_text.clone(),
            image_url: d.image_url.clone(),
            button_text: d.button_text.clone(),
            button_link: d.button_link.clone(),
            metadata: d.metadata.clone(),
        }
    }
}
