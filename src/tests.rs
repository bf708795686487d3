#![cfg(test)]

use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::SiteConfig;
use crate::models::asset::{AssetForm, AssetType, SiteAsset};
use crate::models::content::{ContentBlockForm, PageContentBlock};
use crate::models::page::Page;
use crate::models::settings::{Setting, SettingForm, SettingType};
use crate::render;
use crate::storage::{LocalStorage, ObjectStorage};
use crate::store::sqlite::tests::{asset_form, block_form, test_store};
use crate::store::{Store, StoreError};
use crate::styles::MENU_GRAPHICS_SLOT;
use crate::theme::{BRAND_YELLOW, DEFAULT_BACKGROUND, WHITE};
use crate::view::PageView;

const TOKEN: &str = "test-admin-token";

fn set(store: &dyn Store, key: &str, value: &str) {
    store
        .setting_set(&SettingForm {
            key: key.to_string(),
            value: value.to_string(),
            setting_type: SettingType::Text,
            description: None,
        })
        .unwrap();
}

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("playhire-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A backend that is configured but failing on every call.
struct FailingStore;

impl Store for FailingStore {
    fn backend_name(&self) -> &str {
        "failing"
    }
    fn setting_all(&self) -> Result<Vec<Setting>, StoreError> {
        Err(StoreError::Status(503, "unavailable".into()))
    }
    fn setting_set(&self, _form: &SettingForm) -> Result<(), StoreError> {
        Err(StoreError::Status(503, "unavailable".into()))
    }
    fn setting_delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Status(503, "unavailable".into()))
    }
    fn asset_list_active(&self, _t: Option<&AssetType>) -> Result<Vec<SiteAsset>, StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }
    fn asset_list_all(&self) -> Result<Vec<SiteAsset>, StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }
    fn asset_find(&self, _id: &str) -> Result<Option<SiteAsset>, StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }
    fn asset_create(&self, _form: &AssetForm) -> Result<String, StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }
    fn asset_delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }
    fn content_list_active(&self, _page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        Err(StoreError::Decode("expected array".into()))
    }
    fn content_list_all(&self, _page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        Err(StoreError::Decode("expected array".into()))
    }
    fn content_create(&self, _page: Page, _form: &ContentBlockForm) -> Result<String, StoreError> {
        Err(StoreError::Decode("expected array".into()))
    }
    fn content_update(&self, _page: Page, _id: &str, _form: &ContentBlockForm) -> Result<(), StoreError> {
        Err(StoreError::Decode("expected array".into()))
    }
    fn content_delete(&self, _page: Page, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Decode("expected array".into()))
    }
}

/// Object storage whose deletes always fail; records what it was asked.
#[derive(Default)]
struct BrokenDeleteStorage {
    deletes: Mutex<Vec<String>>,
}

impl ObjectStorage for BrokenDeleteStorage {
    fn upload(&self, name: &str, _bytes: &[u8], _content_type: &str) -> Result<String, StoreError> {
        Ok(format!("https://cdn.example/{}", name))
    }

    fn delete(&self, public_url: &str) -> Result<(), StoreError> {
        if let Ok(mut d) = self.deletes.lock() {
            d.push(public_url.to_string());
        }
        Err(StoreError::Status(500, "bucket offline".into()))
    }
}

fn client_with(store: Arc<dyn Store>, storage: Arc<dyn ObjectStorage>, token: &str) -> Client {
    let mut config = SiteConfig::default();
    config.admin.token = token.to_string();
    config.storage.uploads_dir = temp_dir().to_string_lossy().to_string();
    Client::tracked(crate::build(config, store, storage)).expect("valid rocket instance")
}

fn client(store: Arc<dyn Store>) -> Client {
    let storage = LocalStorage { dir: temp_dir() };
    client_with(store, Arc::new(storage), TOKEN)
}

fn bearer() -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", TOKEN))
}

// ═══════════════════════════════════════════════════════════
// Page view scenarios
// ═══════════════════════════════════════════════════════════

#[rocket::async_test]
async fn hero_override_merges_with_compiled_default() {
    let store = test_store();
    let mut form = block_form("hero", 0);
    form.content_type = "hero".into();
    form.title = Some("Summer Specials".into());
    store.content_create(Page::Home, &form).unwrap();

    let mut view = PageView::new(Page::Home, Arc::new(store));
    view.load().await;
    let hero = view.section("hero");
    let fallback = crate::content::defaults::for_section(Page::Home, "hero");
    assert_eq!(hero.title.as_deref(), Some("Summer Specials"));
    assert_eq!(hero.subtitle, fallback.subtitle);
    assert_eq!(hero.button_text, fallback.button_text);

    let html = render::render_page(&mut view);
    assert!(html.contains("<h1>Summer Specials</h1>"));
    assert!(html.contains("href=\"/contact\""));
}

#[rocket::async_test]
async fn empty_settings_give_default_palette() {
    let store = test_store();
    for s in store.setting_all().unwrap() {
        store.setting_delete(&s.key).unwrap();
    }
    let mut view = PageView::new(Page::Gallery, Arc::new(store));
    view.load().await;
    let (tokens, _) = view.compile_styles();
    assert_eq!(tokens.background_color, DEFAULT_BACKGROUND);
    assert_eq!(tokens.text_color, WHITE);
    assert_eq!(tokens.accent_color, BRAND_YELLOW);
    assert_eq!(view.site_settings().site_name, "Bounce & Play Hire");
}

#[rocket::async_test]
async fn about_us_graphic_replaces_placeholder() {
    let store = test_store();
    set(&store, "menu_graphics_enabled", "true");
    store
        .asset_create(&asset_form(AssetType::MenuGraphic, "About Us", "/uploads/about.png"))
        .unwrap();

    let mut view = PageView::new(Page::Home, Arc::new(store));
    view.load().await;
    let graphics = view.menu_graphics();
    assert!(graphics.has_graphic("About Us"));

    let html = render::render_page(&mut view);
    let css = view.sheet().get(MENU_GRAPHICS_SLOT).unwrap();
    assert!(css.contains(".menu-about-us"));
    assert!(css.contains("/uploads/about.png"));
    assert!(html.contains("nav-graphic menu-about-us"));
    assert!(!html.contains("title=\"About Us\">A</a>"));
    assert!(html.contains("title=\"FAQ\">F</a>"), "labels without graphics keep placeholders");
}

#[rocket::async_test]
async fn failing_backend_renders_defaults_with_notices() {
    let mut view = PageView::new(Page::Faq, Arc::new(FailingStore));
    view.load().await;
    assert!(view.blocks().is_empty());
    assert!(view.assets_of(&AssetType::Logo).is_empty());
    assert!(view.raw_settings().is_empty());
    assert_eq!(view.notices().len(), 3);

    let sections = view.sections();
    let expected: Vec<_> = crate::content::defaults::sections(Page::Faq)
        .iter()
        .map(|key| {
            crate::models::content::ResolvedContent::from(&crate::content::defaults::for_section(
                Page::Faq, key,
            ))
        })
        .collect();
    assert_eq!(sections, expected);

    let html = render::render_page(&mut view);
    assert!(html.contains("class=\"notice\""));
}

#[rocket::async_test]
async fn inactive_blocks_never_override() {
    let store = test_store();
    let mut form = block_form("hero", 0);
    form.title = Some("Hidden".into());
    form.active = false;
    store.content_create(Page::About, &form).unwrap();

    let view = PageView::new(Page::About, Arc::new(store));
    view.load().await;
    assert_ne!(view.section("hero").title.as_deref(), Some("Hidden"));
}

// ═══════════════════════════════════════════════════════════
// Public HTTP surface
// ═══════════════════════════════════════════════════════════

#[test]
fn home_and_pages_render() {
    let client = client(Arc::new(test_store()));

    let resp = client.get("/").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(resp.content_type(), Some(ContentType::HTML));
    let body = resp.into_string().unwrap();
    assert!(body.contains("Bounce &amp; Play Hire"));
    assert!(body.contains("id=\"theme-styles\""));

    let resp = client.get("/about").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert!(resp.into_string().unwrap().contains("About Us"));

    assert_eq!(client.get("/birthday-parties").dispatch().status(), Status::NotFound);
    assert_eq!(client.get("/home").dispatch().status(), Status::PermanentRedirect);
}

#[test]
fn unconfigured_backend_still_serves_pages() {
    let client = client(Arc::new(crate::store::UnconfiguredStore));
    let resp = client.get("/contact").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let body = resp.into_string().unwrap();
    assert!(body.contains("Contact Us"));
    assert!(!body.contains("class=\"notice\""));
}

#[test]
fn page_api_returns_resolved_view() {
    let store = test_store();
    set(&store, "faq_background_color", "#FFFFFF");
    let client = client(Arc::new(store));

    let resp = client.get("/api/page/faq").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["page"], "faq");
    assert_eq!(v["path"], "/faq");
    assert_eq!(v["loading"], false);
    assert_eq!(v["theme"]["background_color"], "#FFFFFF");
    assert_eq!(v["theme"]["text_color"], "#1A1A1A");
    assert_eq!(v["styles"].as_array().unwrap().len(), 2);
    assert_eq!(v["nav"].as_array().unwrap().len(), Page::ALL.len());
    assert_eq!(v["nav"][4]["current"], true);
    assert_eq!(v["nav"][4]["mode"], "text");

    assert_eq!(client.get("/api/page/nowhere").dispatch().status(), Status::NotFound);
}

// ═══════════════════════════════════════════════════════════
// Admin API
// ═══════════════════════════════════════════════════════════

#[test]
fn admin_requires_token() {
    let client = client(Arc::new(test_store()));

    let resp = client.get("/admin/api/settings").dispatch();
    assert_eq!(resp.status(), Status::Unauthorized);
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], false);

    let resp = client
        .get("/admin/api/settings")
        .header(Header::new("Authorization", "Bearer wrong"))
        .dispatch();
    assert_eq!(resp.status(), Status::Unauthorized);

    let resp = client.get("/admin/api/settings").header(bearer()).dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true);
    assert!(v["settings"].as_array().unwrap().len() >= 7);
}

#[test]
fn admin_disabled_without_configured_token() {
    let storage = LocalStorage { dir: temp_dir() };
    let client = client_with(Arc::new(test_store()), Arc::new(storage), "");
    let resp = client
        .get("/admin/api/settings")
        .header(Header::new("Authorization", "Bearer "))
        .dispatch();
    assert_eq!(resp.status(), Status::Forbidden);
}

#[test]
fn admin_setting_changes_page_theme() {
    let client = client(Arc::new(test_store()));

    let resp = client
        .post("/admin/api/settings")
        .header(bearer())
        .header(ContentType::JSON)
        .body(json!({"key": "home_background_color", "value": "#1E88E5", "type": "color"}).to_string())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true, "{}", v);

    let v: Value = client.get("/api/page/home").dispatch().into_json().unwrap();
    assert_eq!(v["theme"]["accent_color"], "#1E88E5");

    let resp = client
        .post("/admin/api/settings")
        .header(bearer())
        .header(ContentType::JSON)
        .body(json!({"key": "home_background_color", "value": "red;}body{", "type": "color"}).to_string())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], false);
}

#[test]
fn admin_content_crud_reaches_the_page() {
    let client = client(Arc::new(test_store()));

    let resp = client
        .post("/admin/api/content/equipment")
        .header(bearer())
        .header(ContentType::JSON)
        .body(json!({"section_key": "hero", "content_type": "hero", "title": "Giant Slides", "order_position": 0}).to_string())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true, "{}", v);
    let id = v["id"].as_str().unwrap().to_string();

    let body = client.get("/equipment").dispatch().into_string().unwrap();
    assert!(body.contains("Giant Slides"));

    let resp = client
        .put(format!("/admin/api/content/equipment/{}", id))
        .header(bearer())
        .header(ContentType::JSON)
        .body(json!({"section_key": "hero", "content_type": "hero", "title": "Giant Slides", "active": false}).to_string())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true, "{}", v);
    let body = client.get("/equipment").dispatch().into_string().unwrap();
    assert!(!body.contains("Giant Slides"));

    let resp = client
        .delete(format!("/admin/api/content/equipment/{}", id))
        .header(bearer())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true);

    let v: Value = client
        .get("/admin/api/content/castles")
        .header(bearer())
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(v["success"], false);
}

#[test]
fn asset_delete_survives_storage_failure() {
    let store = Arc::new(test_store());
    let id = store
        .asset_create(&asset_form(AssetType::FooterImage, "", "https://cdn.example/f.png"))
        .unwrap();
    let storage = Arc::new(BrokenDeleteStorage::default());
    let client = client_with(store.clone(), storage.clone(), TOKEN);

    let resp = client
        .delete(format!("/admin/api/assets/{}", id))
        .header(bearer())
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true, "{}", v);
    assert!(store.asset_find(&id).unwrap().is_none());
    assert_eq!(
        storage.deletes.lock().unwrap().as_slice(),
        ["https://cdn.example/f.png".to_string()]
    );

    let v: Value = client
        .delete(format!("/admin/api/assets/{}", id))
        .header(bearer())
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(v["success"], false);
}

#[test]
fn menu_graphic_upload_reads_dimensions() {
    use std::io::Cursor;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(3, 2))
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let boundary = "PLAYHIREBOUNDARY";
    let mut body = Vec::new();
    for (name, value) in [("asset_type", "menu_graphic"), ("menu_item", "About Us")] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"about.png\"\r\nContent-Type: image/png\r\n\r\n",
            boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let store = Arc::new(test_store());
    let uploads = temp_dir();
    let client = client_with(store.clone(), Arc::new(LocalStorage { dir: uploads.clone() }), TOKEN);

    let resp = client
        .post("/admin/api/assets")
        .header(bearer())
        .header(Header::new(
            "Content-Type",
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .body(body)
        .dispatch();
    let v: Value = resp.into_json().unwrap();
    assert_eq!(v["success"], true, "{}", v);

    let url = v["image_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/menu_graphic_"));
    assert!(url.ends_with(".png"));
    let file_name = url.trim_start_matches("/uploads/");
    assert!(uploads.join(file_name).exists());

    let asset = store.asset_find(v["id"].as_str().unwrap()).unwrap().unwrap();
    assert_eq!(asset.menu_item, "About Us");
    assert_eq!((asset.width, asset.height), (Some(3), Some(2)));
    assert!(asset.active);
}
