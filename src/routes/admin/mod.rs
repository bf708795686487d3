use rocket::serde::json::Json;
use serde_json::{json, Value};

use crate::models::page::Page;
use crate::store::StoreError;

pub mod assets;
pub mod content;
pub mod settings;

pub fn routes() -> Vec<rocket::Route> {
    routes![
        settings::list,
        settings::set,
        settings::delete,
        assets::list,
        assets::upload,
        assets::delete,
        content::list,
        content::create,
        content::update,
        content::delete,
    ]
}

/// `{success: true, ...extra}` or `{success: false, error}`.
pub(crate) fn respond(result: Result<Value, StoreError>) -> Json<Value> {
    match result {
        Ok(Value::Object(mut extra)) => {
            extra.insert("success".to_string(), Value::Bool(true));
            Json(Value::Object(extra))
        }
        Ok(Value::Null) => Json(json!({"success": true})),
        Ok(data) => Json(json!({"success": true, "data": data})),
        Err(e) => {
            log::warn!("[admin] {}", e);
            Json(json!({"success": false, "error": e.to_string()}))
        }
    }
}

pub(crate) fn fail(msg: &str) -> Json<Value> {
    Json(json!({"success": false, "error": msg}))
}

pub(crate) fn page_or_fail(slug: &str) -> Result<Page, Json<Value>> {
    Page::from_slug(slug).ok_or_else(|| fail("Unknown page"))
}
