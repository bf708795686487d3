use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::{BackendKind, SiteConfig, CONFIG_FILE, ENV_BACKEND_KEY, ENV_BACKEND_URL};

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories and reports configuration gaps. Only a
/// local database that cannot be written aborts startup; everything else
/// degrades to default content.
pub fn run(config: &SiteConfig) {
    info!("[boot] check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    let mut dirs = vec![crate::STATIC_DIR.to_string(), config.storage.uploads_dir.clone()];
    if config.backend.kind == BackendKind::Sqlite {
        if let Some(parent) = Path::new(&config.backend.sqlite_path).parent() {
            if !parent.as_os_str().is_empty() {
                dirs.push(parent.to_string_lossy().to_string());
            }
        }
    }
    for dir in &dirs {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    warn!("  Could not create directory {}: {}", dir, e);
                    warnings += 1;
                }
            }
        }
    }

    // ── 2. Backend configuration ───────────────────────
    match config.backend.kind {
        BackendKind::Rest if !config.backend.is_configured() => {
            warn!(
                "  Backend not configured (set [backend] url/key in {} or {} / {}); pages will show default content",
                CONFIG_FILE, ENV_BACKEND_URL, ENV_BACKEND_KEY
            );
            warnings += 1;
        }
        BackendKind::Rest => info!("  Backend: hosted REST at {}", config.backend.url.trim()),
        BackendKind::Sqlite => {
            info!("  Backend: local SQLite at {}", config.backend.sqlite_path);
            if let Some(parent) = Path::new(&config.backend.sqlite_path).parent() {
                if parent.exists() && !is_writable(parent) {
                    error!("  Database directory not writable: {}", parent.display());
                    errors += 1;
                }
            }
        }
    }

    // ── 3. Uploads directory writable ──────────────────
    let uploads_dir = Path::new(&config.storage.uploads_dir);
    if uploads_dir.exists() && !is_writable(uploads_dir) {
        warn!("  Uploads directory not writable: {} (local uploads will fail)", uploads_dir.display());
        warnings += 1;
    }

    // ── 4. Admin API ───────────────────────────────────
    if config.admin.token.trim().is_empty() {
        warn!("  No admin token configured; /admin/api is disabled");
        warnings += 1;
    }

    // ── 5. Rocket.toml exists ──────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default server config");
        warnings += 1;
    }

    // ── Summary ────────────────────────────────────────
    if errors > 0 {
        error!(
            "[boot] check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!("[boot] check passed with {} warning(s).", warnings);
    } else {
        info!("[boot] check passed.");
    }
}

fn is_writable(dir: &Path) -> bool {
    let marker = dir.join(".write_test");
    match fs::write(&marker, "test") {
        Ok(_) => {
            let _ = fs::remove_file(&marker);
            true
        }
        Err(_) => false,
    }
}
