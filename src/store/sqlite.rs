use rusqlite::params;

use crate::db::DbPool;
use crate::models::asset::{AssetForm, AssetType, SiteAsset};
use crate::models::content::{ContentBlockForm, PageContentBlock};
use crate::models::page::Page;
use crate::models::settings::{Setting, SettingForm};

use super::{Store, StoreError};

/// SQLite-backed implementation of the Store trait, for local installs.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str) -> Result<Self, StoreError> {
        let pool = crate::db::init_pool_at(path).map_err(StoreError::Database)?;
        Ok(Self::new(pool))
    }

    fn blocks(&self, page: Page, active_only: bool) -> Result<Vec<PageContentBlock>, StoreError> {
        let conn = self.pool.get()?;
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} {} ORDER BY order_position ASC, created_at ASC",
            page.collection(),
            filter
        ))?;
        let rows = stmt.query_map([], PageContentBlock::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn metadata_text(form: &ContentBlockForm) -> Option<String> {
    form.metadata.as_ref().map(|m| m.to_string())
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), StoreError> {
        crate::db::run_migrations(&self.pool).map_err(|e| StoreError::Database(e.to_string()))
    }

    fn seed_defaults(&self) -> Result<(), StoreError> {
        crate::db::seed_defaults(&self.pool).map_err(|e| StoreError::Database(e.to_string()))
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }

    // ── Settings ────────────────────────────────────────────────────

    fn setting_all(&self) -> Result<Vec<Setting>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT key, value, type, description FROM site_settings")?;
        let rows = stmt.query_map([], Setting::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn setting_set(&self, form: &SettingForm) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO site_settings (key, value, type, description) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET value = ?2, type = ?3,
                description = COALESCE(?4, description), updated_at = CURRENT_TIMESTAMP",
            params![
                form.key,
                form.value,
                form.setting_type.as_str(),
                form.description
            ],
        )?;
        Ok(())
    }

    fn setting_delete(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM site_settings WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ── Site assets ─────────────────────────────────────────────────

    fn asset_list_active(&self, asset_type: Option<&AssetType>) -> Result<Vec<SiteAsset>, StoreError> {
        let conn = self.pool.get()?;
        let assets = match asset_type {
            Some(t) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM site_assets WHERE active = 1 AND asset_type = ?1
                     ORDER BY z_index ASC, created_at ASC",
                )?;
                let rows = stmt.query_map(params![t.as_str()], SiteAsset::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM site_assets WHERE active = 1 ORDER BY z_index ASC, created_at ASC",
                )?;
                let rows = stmt.query_map([], SiteAsset::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(assets)
    }

    fn asset_list_all(&self) -> Result<Vec<SiteAsset>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT * FROM site_assets ORDER BY asset_type, z_index ASC, created_at ASC")?;
        let rows = stmt.query_map([], SiteAsset::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn asset_find(&self, id: &str) -> Result<Option<SiteAsset>, StoreError> {
        let conn = self.pool.get()?;
        match conn.query_row(
            "SELECT * FROM site_assets WHERE id = ?1",
            params![id],
            SiteAsset::from_row,
        ) {
            Ok(a) => Ok(Some(a)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn asset_create(&self, form: &AssetForm) -> Result<String, StoreError> {
        let conn = self.pool.get()?;
        let id = uuid::Uuid::new_v4().to_string();
        let menu_item = if form.menu_item.is_empty() {
            None
        } else {
            Some(form.menu_item.as_str())
        };
        conn.execute(
            "INSERT INTO site_assets (id, asset_type, image_url, placement_hint, menu_item,
                position_x, position_y, width, height, z_index, active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                form.asset_type.as_str(),
                form.image_url,
                form.placement_hint,
                menu_item,
                form.position_x,
                form.position_y,
                form.width,
                form.height,
                form.z_index,
                form.active as i32,
            ],
        )?;
        Ok(id)
    }

    fn asset_delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let n = conn.execute("DELETE FROM site_assets WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ── Page content ────────────────────────────────────────────────

    fn content_list_active(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        self.blocks(page, true)
    }

    fn content_list_all(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        self.blocks(page, false)
    }

    fn content_create(&self, page: Page, form: &ContentBlockForm) -> Result<String, StoreError> {
        let conn = self.pool.get()?;
        let id = uuid::Uuid::new_v4().to_string();
        conn.execute(
            &format!(
                "INSERT INTO {} (id, section_key, content_type, title, subtitle, content_text,
                    image_url, button_text, button_link, order_position, metadata, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                page.collection()
            ),
            params![
                id,
                form.section_key,
                form.content_type,
                form.title,
                form.subtitle,
                form.content_text,
                form.image_url,
                form.button_text,
                form.button_link,
                form.order_position,
                metadata_text(form),
                form.active as i32,
            ],
        )?;
        Ok(id)
    }

    fn content_update(&self, page: Page, id: &str, form: &ContentBlockForm) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let n = conn.execute(
            &format!(
                "UPDATE {} SET section_key = ?1, content_type = ?2, title = ?3, subtitle = ?4,
                    content_text = ?5, image_url = ?6, button_text = ?7, button_link = ?8,
                    order_position = ?9, metadata = ?10, active = ?11,
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?12",
                page.collection()
            ),
            params![
                form.section_key,
                form.content_type,
                form.title,
                form.subtitle,
                form.content_text,
                form.image_url,
                form.button_text,
                form.button_link,
                form.order_position,
                metadata_text(form),
                form.active as i32,
                id,
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn content_delete(&self, page: Page, id: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        let n = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", page.collection()),
            params![id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
