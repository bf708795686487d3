use rocket::tokio::task;
use std::sync::Arc;

use crate::store::{Store, StoreError};

pub mod admin;
pub mod api;
pub mod public;

/// Run a store call on the blocking pool. The hosted backend client is
/// synchronous and must stay off the async workers.
pub(crate) async fn with_store<T, F>(store: &Arc<dyn Store>, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn Store) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    task::spawn_blocking(move || f(&*store))
        .await
        .unwrap_or_else(|e| Err(StoreError::Request(format!("store task failed: {}", e))))
}
