//! Shared application state handed to every handler.

use std::{future::Future, sync::Arc, time::Duration};

use roster_core::{collection::Collection, error::StoreResult, store::DocumentStore};

use crate::{
    config::Config,
    error::{ApiError, Operation},
};

/// Everything a handler needs: the store handle plus the settings that shape
/// store calls. Cloning is cheap; the store itself is shared, not copied.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<DocumentStore>,
    collection: Arc<str>,
    list_cap: usize,
    store_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, config: &Config) -> Self {
        Self {
            store,
            collection: Arc::from(config.store.collection.as_str()),
            list_cap: config.limits.list_cap,
            store_timeout: config.limits.store_timeout(),
        }
    }

    pub fn students(&self) -> Collection<'_> {
        self.store.collection(&self.collection)
    }

    pub fn list_cap(&self) -> usize {
        self.list_cap
    }

    /// Awaits a store call under the per-request timeout, converting both
    /// the store's own failure and an elapsed timeout into [`ApiError`]s.
    pub async fn bounded<T, F>(&self, operation: Operation, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(|source| ApiError::store(operation, source)),
            Err(_) => Err(ApiError::Timeout { operation, after: self.store_timeout }),
        }
    }
}
