use reqwest::blocking::Client;
use std::path::PathBuf;
use url::Url;

use crate::config::{BackendConfig, StorageConfig};
use crate::store::StoreError;

/// Where uploaded images live. `upload` hands back the public URL that gets
/// written into the asset record; `delete` takes that same URL.
pub trait ObjectStorage: Send + Sync {
    fn upload(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError>;
    fn delete(&self, public_url: &str) -> Result<(), StoreError>;
}

/// Files under the uploads directory, served by Rocket at `/uploads`.
pub struct LocalStorage {
    pub dir: PathBuf,
}

impl LocalStorage {
    pub fn new(cfg: &StorageConfig) -> Self {
        LocalStorage {
            dir: PathBuf::from(&cfg.uploads_dir),
        }
    }

    fn file_for(&self, public_url: &str) -> Option<PathBuf> {
        let name = public_url.strip_prefix("/uploads/")?;
        if name.is_empty() || name.contains("..") || name.contains('/') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

impl ObjectStorage for LocalStorage {
    fn upload(&self, name: &str, bytes: &[u8], _content_type: &str) -> Result<String, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Request(e.to_string()))?;
        std::fs::write(self.dir.join(name), bytes).map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(format!("/uploads/{}", name))
    }

    fn delete(&self, public_url: &str) -> Result<(), StoreError> {
        let path = self.file_for(public_url).ok_or(StoreError::NotFound)?;
        std::fs::remove_file(path).map_err(|e| StoreError::Request(e.to_string()))
    }
}

/// Bucket on the hosted backend (`/storage/v1/object/<bucket>/<name>`).
pub struct RestStorage {
    base: Url,
    key: String,
    bucket: String,
    client: Client,
}

impl RestStorage {
    pub fn new(backend: &BackendConfig, cfg: &StorageConfig) -> Result<Self, StoreError> {
        if !backend.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        let mut base = Url::parse(backend.url.trim())
            .map_err(|e| StoreError::Request(format!("invalid backend url: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| StoreError::Request(format!("HTTP client error: {}", e)))?;
        Ok(RestStorage {
            base,
            key: backend.key.trim().to_string(),
            bucket: cfg.bucket.clone(),
            client,
        })
    }

    fn object_url(&self, name: &str) -> Result<Url, StoreError> {
        self.base
            .join(&format!("storage/v1/object/{}/{}", self.bucket, name))
            .map_err(|e| StoreError::Request(e.to_string()))
    }

    pub(crate) fn public_url(&self, name: &str) -> Result<Url, StoreError> {
        self.base
            .join(&format!("storage/v1/object/public/{}/{}", self.bucket, name))
            .map_err(|e| StoreError::Request(e.to_string()))
    }

    /// Object name inside our bucket for a URL we issued, if it is one.
    pub(crate) fn object_name(&self, public_url: &str) -> Option<String> {
        let prefix = self.public_url("").ok()?;
        let name = public_url.strip_prefix(prefix.as_str())?;
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

impl ObjectStorage for RestStorage {
    fn upload(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError> {
        let url = self.object_url(name)?;
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Content-Type", content_type)
            .body(bytes.to_vec())
            .send()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(StoreError::Status(status, resp.text().unwrap_or_default()));
        }
        Ok(self.public_url(name)?.to_string())
    }

    fn delete(&self, public_url: &str) -> Result<(), StoreError> {
        let name = self.object_name(public_url).ok_or(StoreError::NotFound)?;
        let resp = self
            .client
            .delete(self.object_url(&name)?)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .send()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(StoreError::Status(status, resp.text().unwrap_or_default()));
        }
        Ok(())
    }
}

/// Lowercased extension from a content type or filename, defaulting to png.
pub fn upload_extension(content_type: Option<&str>, filename: Option<&str>) -> String {
    let from_type = content_type.and_then(|ct| match ct {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    });
    if let Some(ext) = from_type {
        return ext.to_string();
    }
    filename
        .and_then(|n| n.rsplit_once('.').map(|(_, e)| e.to_lowercase()))
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "png".to_string())
}

/// Pixel dimensions of an uploaded raster image, when it can be decoded.
pub fn image_dimensions(bytes: &[u8]) -> Option<(i32, i32)> {
    use image::GenericImageView;
    let img = image::load_from_memory(bytes).ok()?;
    let (w, h) = img.dimensions();
    Some((w as i32, h as i32))
}
