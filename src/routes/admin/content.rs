use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{fail, page_or_fail, respond};
use crate::auth::AdminToken;
use crate::models::content::ContentBlockForm;
use crate::routes::with_store;
use crate::store::Store;

// ── Page content blocks, one collection per page ──

#[get("/content/<slug>")]
pub async fn list(_admin: AdminToken, store: &State<Arc<dyn Store>>, slug: &str) -> Json<Value> {
    let page = match page_or_fail(slug) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let result = with_store(store.inner(), move |s| s.content_list_all(page)).await;
    respond(result.map(|blocks| json!({ "page": page, "blocks": blocks })))
}

#[post("/content/<slug>", format = "json", data = "<form>")]
pub async fn create(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    slug: &str,
    form: Json<ContentBlockForm>,
) -> Json<Value> {
    let page = match page_or_fail(slug) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let form = form.into_inner();
    if let Err(msg) = validate(&form) {
        return fail(msg);
    }
    let result = with_store(store.inner(), move |s| s.content_create(page, &form)).await;
    respond(result.map(|id| json!({ "id": id })))
}

#[put("/content/<slug>/<id>", format = "json", data = "<form>")]
pub async fn update(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    slug: &str,
    id: String,
    form: Json<ContentBlockForm>,
) -> Json<Value> {
    let page = match page_or_fail(slug) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let form = form.into_inner();
    if let Err(msg) = validate(&form) {
        return fail(msg);
    }
    let result = with_store(store.inner(), move |s| s.content_update(page, &id, &form)).await;
    respond(result.map(|_| Value::Null))
}

#[delete("/content/<slug>/<id>")]
pub async fn delete(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    slug: &str,
    id: String,
) -> Json<Value> {
    let page = match page_or_fail(slug) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let result = with_store(store.inner(), move |s| s.content_delete(page, &id)).await;
    respond(result.map(|_| Value::Null))
}

fn validate(form: &ContentBlockForm) -> Result<(), &'static str> {
    if form.section_key.trim().is_empty() {
        return Err("section_key is required");
    }
    if let Some(meta) = &form.metadata {
        if !(meta.is_object() || meta.is_null()) {
            return Err("metadata must be a JSON object");
        }
    }
    Ok(())
}
