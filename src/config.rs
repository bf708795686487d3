use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "playhire.toml";
pub const ENV_BACKEND_URL: &str = "PLAYHIRE_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "PLAYHIRE_BACKEND_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Rest,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: String,
    pub key: String,
    pub sqlite_path: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            kind: BackendKind::Rest,
            url: String::new(),
            key: String::new(),
            sqlite_path: "website/db/playhire.db".to_string(),
            timeout_secs: 15,
        }
    }
}

impl BackendConfig {
    /// Both the endpoint and the credential are present.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket name on the hosted backend; ignored for local storage.
    pub bucket: String,
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket: "site-assets".to_string(),
            uploads_dir: "website/uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token for `/admin/api`. Empty disables the admin API.
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
}

impl SiteConfig {
    /// Read `playhire.toml` (if present) and apply environment overrides.
    /// Never fails: a missing or broken file yields defaults, which leave the
    /// backend unconfigured.
    pub fn load() -> Self {
        let mut cfg = Self::from_file(Path::new(CONFIG_FILE));
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg
    }

    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::parse(&s).unwrap_or_else(|e| {
                log::error!("[config] {} is invalid, using defaults: {}", path.display(), e);
                SiteConfig::default()
            }),
            Err(_) => SiteConfig::default(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| e.to_string())
    }

    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, get: F) {
        if let Some(url) = get(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = get(ENV_BACKEND_KEY).filter(|v| !v.trim().is_empty()) {
            self.backend.key = key;
        }
    }
}
