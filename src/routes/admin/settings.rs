use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{fail, respond};
use crate::auth::AdminToken;
use crate::models::settings::{is_safe_css_value, SettingForm, SettingType};
use crate::routes::with_store;
use crate::store::Store;

#[get("/settings")]
pub async fn list(_admin: AdminToken, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let result = with_store(store.inner(), |s| s.setting_all()).await;
    respond(result.map(|settings| json!({ "settings": settings })))
}

#[post("/settings", format = "json", data = "<form>")]
pub async fn set(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    form: Json<SettingForm>,
) -> Json<Value> {
    let form = form.into_inner();
    if let Err(msg) = validate(&form) {
        return fail(msg);
    }
    let key = form.key.clone();
    let result = with_store(store.inner(), move |s| s.setting_set(&form)).await;
    if result.is_ok() {
        log::info!("[admin] setting {} updated", key);
    }
    respond(result.map(|_| Value::Null))
}

#[delete("/settings/<key>")]
pub async fn delete(_admin: AdminToken, store: &State<Arc<dyn Store>>, key: String) -> Json<Value> {
    let result = with_store(store.inner(), move |s| s.setting_delete(&key)).await;
    respond(result.map(|_| Value::Null))
}

fn validate(form: &SettingForm) -> Result<(), &'static str> {
    if form.key.trim().is_empty() {
        return Err("Setting key is required");
    }
    let is_color = form.setting_type == SettingType::Color || form.key.ends_with("_background_color");
    if is_color && !is_safe_css_value(&form.value) {
        return Err("Color value contains characters not allowed in CSS");
    }
    if form.key == "menu_graphic_size" && form.value.trim().parse::<u32>().map_or(true, |n| n == 0) {
        return Err("menu_graphic_size must be a positive whole number");
    }
    Ok(())
}
