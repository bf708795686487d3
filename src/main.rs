#[macro_use]
extern crate rocket;

use rocket::fs::{FileServer, Options};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use serde_json::{json, Value};
use std::sync::Arc;

mod accessor;
mod auth;
mod boot;
mod config;
mod content;
mod db;
mod menu_graphics;
mod models;
mod render;
mod routes;
mod storage;
mod store;
mod styles;
mod theme;
mod view;

#[cfg(test)]
mod tests;

use config::{BackendKind, SiteConfig};
use storage::{LocalStorage, ObjectStorage, RestStorage};
use store::rest::RestStore;
use store::sqlite::SqliteStore;
use store::{Store, StoreError, UnconfiguredStore};

pub const STATIC_DIR: &str = "website/static";

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(default)]
fn admin_error(status: rocket::http::Status, _req: &Request) -> Json<Value> {
    let error = match status.code {
        401 => "Missing or invalid admin token",
        403 => "Admin API is disabled",
        404 => "Not found",
        422 | 400 => "Malformed request body",
        _ => "Request failed",
    };
    Json(json!({"success": false, "error": error}))
}

/// Pick the persistence backend from configuration. Never fails: anything
/// unusable degrades to a store whose reads report missing configuration.
fn open_store(config: &SiteConfig) -> Arc<dyn Store> {
    match config.backend.kind {
        BackendKind::Sqlite => {
            let opened = SqliteStore::new_at(&config.backend.sqlite_path).and_then(|s| {
                s.run_migrations()?;
                s.seed_defaults()?;
                Ok(s)
            });
            match opened {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    log::error!("[store] could not open {}: {}", config.backend.sqlite_path, e);
                    Arc::new(UnconfiguredStore)
                }
            }
        }
        BackendKind::Rest => match RestStore::new(&config.backend) {
            Ok(s) => Arc::new(s),
            Err(StoreError::NotConfigured) => Arc::new(UnconfiguredStore),
            Err(e) => {
                log::error!("[store] hosted backend unusable: {}", e);
                Arc::new(UnconfiguredStore)
            }
        },
    }
}

fn open_storage(config: &SiteConfig) -> Arc<dyn ObjectStorage> {
    if config.backend.kind == BackendKind::Rest && config.backend.is_configured() {
        match RestStorage::new(&config.backend, &config.storage) {
            Ok(s) => return Arc::new(s),
            Err(e) => log::error!("[storage] falling back to local uploads: {}", e),
        }
    }
    Arc::new(LocalStorage::new(&config.storage))
}

/// Assemble the server around an already-chosen store and object storage.
pub fn build(config: SiteConfig, store: Arc<dyn Store>, storage: Arc<dyn ObjectStorage>) -> Rocket<Build> {
    log::info!("[boot] serving content from the {} backend", store.backend_name());

    rocket::build()
        .manage(store)
        .manage(storage)
        .manage(config.admin.clone())
        .mount(
            "/",
            routes![
                routes::public::home,
                routes::public::home_alias,
                routes::public::page,
            ],
        )
        .mount("/api", routes![routes::api::page_view])
        .mount("/admin/api", routes::admin::routes())
        .mount("/static", FileServer::new(STATIC_DIR, Options::Missing | Options::NormalizeDirs))
        .mount(
            "/uploads",
            FileServer::new(&config.storage.uploads_dir, Options::Missing | Options::NormalizeDirs),
        )
        .register("/", catchers![not_found, server_error])
        .register("/admin/api", catchers![admin_error])
}

fn main() {
    env_logger::init();

    let config = SiteConfig::load();
    boot::run(&config);

    // the hosted backend client is blocking and must be built outside the runtime
    let store = open_store(&config);
    let storage = open_storage(&config);

    if let Err(e) = rocket::execute(build(config, store, storage).launch()) {
        log::error!("[boot] server failed: {}", e);
        std::process::exit(1);
    }
}
