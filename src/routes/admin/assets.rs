use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::tokio::io::AsyncReadExt;
use rocket::tokio::task;
use rocket::State;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{fail, respond};
use crate::auth::AdminToken;
use crate::models::asset::{AssetForm, AssetType};
use crate::routes::with_store;
use crate::storage::{image_dimensions, upload_extension, ObjectStorage};
use crate::store::{Store, StoreError};

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[get("/assets")]
pub async fn list(_admin: AdminToken, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let result = with_store(store.inner(), |s| s.asset_list_all()).await;
    respond(result.map(|assets| json!({ "assets": assets })))
}

#[derive(FromForm)]
pub struct AssetUploadForm<'f> {
    pub file: TempFile<'f>,
    pub asset_type: String,
    pub menu_item: Option<String>,
    pub placement_hint: Option<String>,
    pub position_x: Option<i32>,
    pub position_y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub z_index: Option<i32>,
    pub active: Option<bool>,
}

#[post("/assets", data = "<form>")]
pub async fn upload(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    storage: &State<Arc<dyn ObjectStorage>>,
    form: Form<AssetUploadForm<'_>>,
) -> Json<Value> {
    let asset_type = AssetType::parse(form.asset_type.trim());
    if asset_type.as_str().is_empty() {
        return fail("asset_type is required");
    }
    let menu_item = form.menu_item.clone().unwrap_or_default().trim().to_string();
    if asset_type == AssetType::MenuGraphic && menu_item.is_empty() {
        return fail("Menu graphics need the navigation label they replace");
    }

    let content_type = form
        .file
        .content_type()
        .map(|ct| format!("{}/{}", ct.top(), ct.sub()));
    let raw_name = form
        .file
        .raw_name()
        .map(|rn| rn.dangerous_unsafe_unsanitized_raw().as_str().to_string());
    let ext = upload_extension(content_type.as_deref(), raw_name.as_deref());
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return fail("Only image uploads are accepted");
    }

    let bytes = match read_upload(&form.file).await {
        Ok(b) if !b.is_empty() => b,
        Ok(_) => return fail("Uploaded file is empty"),
        Err(e) => {
            log::error!("[admin] could not read upload: {}", e);
            return fail("Upload failed");
        }
    };

    let (width, height) = match (form.width, form.height) {
        (Some(w), Some(h)) => (Some(w), Some(h)),
        _ if ext == "svg" => (form.width, form.height),
        _ => match image_dimensions(&bytes) {
            Some((w, h)) => (Some(w), Some(h)),
            None => (form.width, form.height),
        },
    };

    let name = format!("{}_{}.{}", asset_type.as_str(), uuid::Uuid::new_v4(), ext);
    let mime = content_type.unwrap_or_else(|| format!("image/{}", ext));
    let storage_handle = storage.inner().clone();
    let upload_name = name.clone();
    let uploaded = task::spawn_blocking(move || storage_handle.upload(&upload_name, &bytes, &mime))
        .await
        .unwrap_or_else(|e| Err(StoreError::Request(e.to_string())));
    let image_url = match uploaded {
        Ok(url) => url,
        Err(e) => return respond(Err(e)),
    };

    let record = AssetForm {
        asset_type,
        image_url: image_url.clone(),
        placement_hint: form.placement_hint.clone().unwrap_or_default(),
        menu_item,
        position_x: form.position_x.unwrap_or(0),
        position_y: form.position_y.unwrap_or(0),
        width,
        height,
        z_index: form.z_index.unwrap_or(0),
        active: form.active.unwrap_or(true),
    };
    let created = with_store(store.inner(), move |s| s.asset_create(&record)).await;

    match created {
        Ok(id) => {
            log::info!("[admin] uploaded {} as asset {}", name, id);
            respond(Ok(json!({ "id": id, "image_url": image_url })))
        }
        Err(e) => {
            // orphaned object; the record is what the site reads
            let storage_handle = storage.inner().clone();
            let url = image_url.clone();
            let _ = task::spawn_blocking(move || {
                if let Err(err) = storage_handle.delete(&url) {
                    log::warn!("[admin] could not remove orphaned upload {}: {}", url, err);
                }
            })
            .await;
            respond(Err(e))
        }
    }
}

/// Best-effort removal from object storage, then the record delete regardless.
#[delete("/assets/<id>")]
pub async fn delete(
    _admin: AdminToken,
    store: &State<Arc<dyn Store>>,
    storage: &State<Arc<dyn ObjectStorage>>,
    id: String,
) -> Json<Value> {
    let lookup_id = id.clone();
    let asset = match with_store(store.inner(), move |s| s.asset_find(&lookup_id)).await {
        Ok(Some(a)) => a,
        Ok(None) => return respond(Err(StoreError::NotFound)),
        Err(e) => return respond(Err(e)),
    };

    let storage_handle = storage.inner().clone();
    let url = asset.image_url.clone();
    let removed = task::spawn_blocking(move || storage_handle.delete(&url))
        .await
        .unwrap_or_else(|e| Err(StoreError::Request(e.to_string())));
    if let Err(e) = removed {
        log::warn!("[admin] storage delete failed for {}: {}", asset.image_url, e);
    }

    let result = with_store(store.inner(), move |s| s.asset_delete(&id)).await;
    respond(result.map(|_| Value::Null))
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let mut reader = Box::pin(file.open().await?);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}
