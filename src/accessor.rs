use rocket::tokio::task;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::models::asset::{AssetType, SiteAsset};
use crate::models::content::PageContentBlock;
use crate::models::page::Page;
use crate::models::settings::Setting;
use crate::store::{Store, StoreError};

/// Cancellation token tied to one page view. Accessors check it before
/// committing a result so a fetch that outlives its view writes nothing.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    cancelled: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// What a consumer sees: data is always present, empty on failure.
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

type Fetcher<T> = Arc<dyn Fn() -> Result<T, StoreError> + Send + Sync>;

/// Fetch-on-load wrapper around one store read. No caching, no retry.
pub struct Accessor<T> {
    name: &'static str,
    fetcher: Fetcher<T>,
    scope: ViewScope,
    state: Arc<RwLock<Fetched<T>>>,
}

impl<T> Accessor<T>
where
    T: Default + Clone + Send + Sync + 'static,
{
    pub fn new<F>(name: &'static str, scope: ViewScope, fetcher: F) -> Self
    where
        F: Fn() -> Result<T, StoreError> + Send + Sync + 'static,
    {
        Accessor {
            name,
            fetcher: Arc::new(fetcher),
            scope,
            state: Arc::new(RwLock::new(Fetched {
                data: T::default(),
                loading: true,
                error: None,
            })),
        }
    }

    /// Run the fetch on the blocking pool and publish the outcome, unless
    /// the view was torn down in the meantime.
    pub async fn load(&self) {
        let fetcher = self.fetcher.clone();
        let outcome = match task::spawn_blocking(move || (*fetcher)()).await {
            Ok(r) => r,
            Err(e) => Err(StoreError::Request(format!("fetch task failed: {}", e))),
        };

        if self.scope.is_cancelled() {
            log::debug!("[accessor] {} finished after view teardown, discarded", self.name);
            return;
        }

        let next = match outcome {
            Ok(data) => Fetched {
                data,
                loading: false,
                error: None,
            },
            Err(StoreError::NotConfigured) => Fetched {
                data: T::default(),
                loading: false,
                error: Some(StoreError::NotConfigured.to_string()),
            },
            Err(e) => {
                log::warn!("[accessor] {} fetch failed: {}", self.name, e);
                Fetched {
                    data: T::default(),
                    loading: false,
                    error: Some(e.to_string()),
                }
            }
        };
        self.publish(next);
    }

    /// Full reload: back to loading, then fetch again. Over HTTP every GET
    /// builds a fresh view, so only in-process navigation needs this.
    #[cfg(test)]
    pub async fn refetch(&self) {
        if self.scope.is_cancelled() {
            return;
        }
        {
            let mut state = self.write();
            state.loading = true;
        }
        self.load().await;
    }

    pub fn snapshot(&self) -> Fetched<T> {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn publish(&self, next: Fetched<T>) {
        *self.write() = next;
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Fetched<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ── The three site accessors ─────────────────────────────────

pub fn settings(store: Arc<dyn Store>, scope: ViewScope) -> Accessor<HashMap<String, String>> {
    Accessor::new("settings", scope, move || {
        store.setting_all().map(Setting::into_map)
    })
}

pub fn assets(
    store: Arc<dyn Store>,
    scope: ViewScope,
    asset_type: Option<AssetType>,
) -> Accessor<Vec<SiteAsset>> {
    Accessor::new("assets", scope, move || {
        store.asset_list_active(asset_type.as_ref())
    })
}

pub fn page_content(store: Arc<dyn Store>, scope: ViewScope, page: Page) -> Accessor<Vec<PageContentBlock>> {
    Accessor::new("page_content", scope, move || {
        let blocks = store.content_list_active(page)?;
        // the resolver trusts its input to be active-only
        Ok(blocks.into_iter().filter(|b| b.active).collect())
    })
}
