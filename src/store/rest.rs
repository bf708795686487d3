use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::config::BackendConfig;
use crate::models::asset::{AssetForm, AssetType, SiteAsset};
use crate::models::content::{ContentBlockForm, PageContentBlock};
use crate::models::page::Page;
use crate::models::settings::{Setting, SettingForm};

use super::{Store, StoreError};

const SETTINGS_TABLE: &str = "site_settings";
const ASSETS_TABLE: &str = "site_assets";

/// Store backed by the hosted row API (`/rest/v1/<table>` with
/// `column=eq.value` filters and `order=column.asc`).
pub struct RestStore {
    base: Url,
    key: String,
    client: Client,
}

impl RestStore {
    pub fn new(cfg: &BackendConfig) -> Result<Self, StoreError> {
        if !cfg.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        let mut base = Url::parse(cfg.url.trim())
            .map_err(|e| StoreError::Request(format!("invalid backend url: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| StoreError::Request(format!("HTTP client error: {}", e)))?;
        Ok(RestStore {
            base,
            key: cfg.key.trim().to_string(),
            client,
        })
    }

    /// `<base>/rest/v1/<table>?<filters>`
    pub(crate) fn table_url(&self, table: &str, query: &[(&str, String)]) -> Result<Url, StoreError> {
        table_url(&self.base, table, query)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Content-Type", "application/json")
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self
            .authed(req)
            .send()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(StoreError::Status(status, body));
        }
        Ok(resp)
    }

    fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, query)?;
        log::debug!("[store] GET {}", url);
        let resp = self.send(self.client.get(url))?;
        resp.json::<Vec<T>>()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Insert and return the generated `id` from the echoed row.
    fn insert(&self, table: &str, body: &Value) -> Result<String, StoreError> {
        let url = self.table_url(table, &[("select", "id".into())])?;
        let resp = self.send(
            self.client
                .post(url)
                .header("Prefer", "return=representation")
                .json(body),
        )?;
        let rows: Vec<Value> = resp.json().map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.first()
            .and_then(|r| r.get("id"))
            .map(id_to_string)
            .ok_or_else(|| StoreError::Decode("insert returned no id".into()))
    }

    /// Update or delete by id; `NotFound` when nothing matched.
    fn mutate_by_id(&self, table: &str, id: &str, body: Option<&Value>) -> Result<(), StoreError> {
        let url = self.table_url(table, &[("id", eq(id)), ("select", "id".into())])?;
        let req = match body {
            Some(b) => self.client.patch(url).json(b),
            None => self.client.delete(url),
        };
        let resp = self.send(req.header("Prefer", "return=representation"))?;
        let rows: Vec<Value> = resp.json().map_err(|e| StoreError::Decode(e.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn table_url(base: &Url, table: &str, query: &[(&str, String)]) -> Result<Url, StoreError> {
    let mut url = base
        .join(&format!("rest/v1/{}", table))
        .map_err(|e| StoreError::Request(e.to_string()))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

fn eq(v: &str) -> String {
    format!("eq.{}", v)
}

fn id_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn active_assets_query(asset_type: Option<&AssetType>) -> Vec<(&'static str, String)> {
    let mut q = vec![("select", "*".to_string()), ("active", "eq.true".to_string())];
    if let Some(t) = asset_type {
        q.push(("asset_type", eq(t.as_str())));
    }
    q.push(("order", "z_index.asc".to_string()));
    q
}

fn content_query(active_only: bool) -> Vec<(&'static str, String)> {
    let mut q = vec![("select", "*".to_string())];
    if active_only {
        q.push(("active", "eq.true".to_string()));
    }
    q.push(("order", "order_position.asc".to_string()));
    q
}

fn content_body(form: &ContentBlockForm) -> Value {
    json!({
        "section_key": form.section_key,
        "content_type": form.content_type,
        "title": form.title,
        "subtitle": form.subtitle,
        "content_text": form.content_text,
        "image_url": form.image_url,
        "button_text": form.button_text,
        "button_link": form.button_link,
        "order_position": form.order_position,
        "metadata": form.metadata,
        "active": form.active,
    })
}

impl Store for RestStore {
    fn backend_name(&self) -> &str {
        "rest"
    }

    // ── Settings ────────────────────────────────────────────────────

    fn setting_all(&self) -> Result<Vec<Setting>, StoreError> {
        self.select(SETTINGS_TABLE, &[("select", "key,value,type,description".into())])
    }

    fn setting_set(&self, form: &SettingForm) -> Result<(), StoreError> {
        let url = self.table_url(SETTINGS_TABLE, &[("on_conflict", "key".into())])?;
        let mut body = json!({
            "key": form.key,
            "value": form.value,
            "type": form.setting_type.as_str(),
        });
        if let Some(d) = &form.description {
            body["description"] = json!(d);
        }
        self.send(
            self.client
                .post(url)
                .header("Prefer", "resolution=merge-duplicates")
                .json(&body),
        )?;
        Ok(())
    }

    fn setting_delete(&self, key: &str) -> Result<(), StoreError> {
        let url = self.table_url(SETTINGS_TABLE, &[("key", eq(key))])?;
        self.send(self.client.delete(url))?;
        Ok(())
    }

    // ── Site assets ─────────────────────────────────────────────────

    fn asset_list_active(&self, asset_type: Option<&AssetType>) -> Result<Vec<SiteAsset>, StoreError> {
        self.select(ASSETS_TABLE, &active_assets_query(asset_type))
    }

    fn asset_list_all(&self) -> Result<Vec<SiteAsset>, StoreError> {
        self.select(
            ASSETS_TABLE,
            &[("select", "*".into()), ("order", "asset_type.asc,z_index.asc".into())],
        )
    }

    fn asset_find(&self, id: &str) -> Result<Option<SiteAsset>, StoreError> {
        let mut rows: Vec<SiteAsset> =
            self.select(ASSETS_TABLE, &[("select", "*".into()), ("id", eq(id))])?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    fn asset_create(&self, form: &AssetForm) -> Result<String, StoreError> {
        let body = serde_json::to_value(form).map_err(|e| StoreError::Decode(e.to_string()))?;
        self.insert(ASSETS_TABLE, &body)
    }

    fn asset_delete(&self, id: &str) -> Result<(), StoreError> {
        self.mutate_by_id(ASSETS_TABLE, id, None)
    }

    // ── Page content ────────────────────────────────────────────────

    fn content_list_active(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        self.select(&page.collection(), &content_query(true))
    }

    fn content_list_all(&self, page: Page) -> Result<Vec<PageContentBlock>, StoreError> {
        self.select(&page.collection(), &content_query(false))
    }

    fn content_create(&self, page: Page, form: &ContentBlockForm) -> Result<String, StoreError> {
        self.insert(&page.collection(), &content_body(form))
    }

    fn content_update(&self, page: Page, id: &str, form: &ContentBlockForm) -> Result<(), StoreError> {
        self.mutate_by_id(&page.collection(), id, Some(&content_body(form)))
    }

    fn content_delete(&self, page: Page, id: &str) -> Result<(), StoreError> {
        self.mutate_by_id(&page.collection(), id, None)
    }
}
