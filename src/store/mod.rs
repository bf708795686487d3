use crate::models::asset::{AssetForm, AssetType, SiteAsset};
use crate::models::content::{ContentBlockForm, PageContentBlock};
use crate::models::page::Page;
use crate::models::settings::{Setting, SettingForm};

pub mod rest;
pub mod sqlite;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Endpoint or credentials absent from configuration.
    NotConfigured,
    /// Transport-level failure talking to the backend.
    Request(String),
    /// Backend answered with a non-success status.
    Status(u16, String),
    /// Backend answered with something we could not decode.
    Decode(String),
    Database(String),
    NotFound,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotConfigured => write!(f, "backend not configured"),
            StoreError::Request(e) => write!(f, "backend request failed: {}", e),
            StoreError::Status(code, body) => write!(f, "backend returned {}: {}", code, body),
            StoreError::Decode(e) => write!(f, "backend response could not be decoded: {}", e),
            StoreError::Database(e) => write!(f, "database error: {}", e),
            StoreError::NotFound => write!(f, "record not found"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Unified data-access trait for the three content sources.
/// Implementations: `RestStore` (hosted backend), `SqliteStore` (local file),
/// `UnconfiguredStore` (no credentials).
///
/// Public reads only ever see active rows; the `_all` variants are for admin.
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), StoreError> {
        Ok(())
    }
    fn seed_defaults(&self) -> Result<(), StoreError> {
        Ok(())
    }
    fn backend_name(&self) -> &str;

    // ── Settings ────────────────────────────────────────────────────
    fn setting_all(&self) -> Result<Vec<Setting>, StoreError>;
    fn setting_set(&self, form: &SettingForm) -> Result<(), StoreError>;
    fn setting_delete(&self, key: &str) -> Result<(), StoreError>;

    // ── Site assets ─────────────────────────────────────────────────
    fn asset_list_active(&self, asset_type: Option<&AssetType>) -> Result<Vec<SiteAsset>, StoreError>;
    fn asset_list_all(&self) -> Result<Vec<SiteAsset>, StoreError>;
    fn asset_find(&self, id: &str) -> Result<Option<SiteAsset>, StoreError>;
    fn asset_create(&self, form: &AssetForm) -> Result<String, StoreError>;
    fn asset_delete(&self, id: &str) -> Result<(), StoreError>;

    // ── Page content ────────────────────────────────────────────────
    fn content_list_active(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError>;
    fn content_list_all(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError>;
    fn content_create(&self, page: Page, form: &ContentBlockForm) -> Result<String, StoreError>;
    fn content_update(&self, page: Page, id: &str, form: &ContentBlockForm) -> Result<(), StoreError>;
    fn content_delete(&self, page: Page, id: &str) -> Result<(), StoreError>;
}

/// Stand-in used when the backend endpoint or key is missing. Every call
/// fails with `NotConfigured`, which the accessors turn into empty data.
pub struct UnconfiguredStore;

impl Store for UnconfiguredStore {
    fn backend_name(&self) -> &str {
        "unconfigured"
    }

    fn setting_all(&self) -> Result<Vec<Setting>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn setting_set(&self, _form: &SettingForm) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn setting_delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn asset_list_active(&self, _asset_type: Option<&AssetType>) -> Result<Vec<SiteAsset>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn asset_list_all(&self) -> Result<Vec<SiteAsset>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn asset_find(&self, _id: &str) -> Result<Option<SiteAsset>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn asset_create(&self, _form: &AssetForm) -> Result<String, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn asset_delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn content_list_active(&self, _page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn content_list_all(&self, _page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn content_create(&self, _page: Page, _form: &ContentBlockForm) -> Result<String, StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn content_update(&self, _page: Page, _id: &str, _form: &ContentBlockForm) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }
    fn content_delete(&self, _page: Page, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }
}
