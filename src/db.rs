use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::page::Page;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool_at(path: &str) -> Result<DbPool, String> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(10)
        .build(manager)
        .map_err(|e| e.to_string())?;

    // WAL for concurrent readers while the admin writes
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .map_err(|e| e.to_string())?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Global site settings (key-value)
        CREATE TABLE IF NOT EXISTS site_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'text',
            description TEXT,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Uploaded logos, menu graphics, footer images
        CREATE TABLE IF NOT EXISTS site_assets (
            id TEXT PRIMARY KEY,
            asset_type TEXT NOT NULL,
            image_url TEXT NOT NULL,
            placement_hint TEXT NOT NULL DEFAULT '',
            menu_item TEXT,
            position_x INTEGER NOT NULL DEFAULT 0,
            position_y INTEGER NOT NULL DEFAULT 0,
            width INTEGER,
            height INTEGER,
            z_index INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_assets_type ON site_assets(asset_type, active);
        ",
    )?;

    // One content collection per page
    for page in Page::ALL {
        let table = page.collection();
        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                section_key TEXT NOT NULL,
                content_type TEXT NOT NULL DEFAULT '',
                title TEXT,
                subtitle TEXT,
                content_text TEXT,
                image_url TEXT,
                button_text TEXT,
                button_link TEXT,
                order_position INTEGER NOT NULL DEFAULT 0,
                metadata TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_order ON {table}(active, order_position);
            ",
            table = table
        ))?;
    }

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        ("site_name", "Bounce & Play Hire", "text", "Shown in the header and page titles"),
        ("site_tagline", "", "text", "Short line under the site name"),
        ("contact_phone", "", "text", "Phone number in header and footer"),
        ("contact_email", "", "text", "Email address in the footer"),
        ("footer_text", "", "text", "Extra footer copy"),
        ("menu_graphics_enabled", "false", "text", "Render navigation as uploaded graphics"),
        ("menu_graphic_size", "64", "number", "Menu graphic width and height in pixels"),
    ];

    for (key, value, kind, description) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO site_settings (key, value, type, description) VALUES (?1, ?2, ?3, ?4)",
            params![key, value, kind, description],
        )?;
    }

    Ok(())
}
