use std::sync::Arc;

use roster::{
    config::{BackendKind, Config, ConfigError},
    routes, server,
    state::AppState,
    telemetry,
};
use roster_core::{backend::StoreBackendBuilder, error::StoreError, store::DocumentStore};
use roster_memory::InMemoryStore;
use thiserror::Error;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize store: {0}")]
    Store(#[from] StoreError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::load()?;
    telemetry::init_tracing(&config.log_level);

    tracing::info!(
        backend = %config.store.backend,
        store = ?config.store,
        prefix = %config.server.prefix,
        list_cap = config.limits.list_cap,
        "configuration loaded"
    );

    let store = Arc::new(build_store(&config).await?);

    // The service still starts when the store is down; requests report it.
    match store.ping().await {
        Ok(()) => tracing::info!(backend = %config.store.backend, "store reachable"),
        Err(err) => tracing::warn!(error = %err, "store ping failed"),
    }

    let app = routes::router(AppState::new(Arc::clone(&store), &config), &config.server.prefix);
    server::serve(app, &config.bind_address()).await?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.shutdown().await?,
        Err(_) => tracing::warn!("store still shared at shutdown, skipping close"),
    }

    Ok(())
}

async fn build_store(config: &Config) -> Result<DocumentStore, StartupError> {
    match config.store.backend {
        BackendKind::Memory => Ok(DocumentStore::new(InMemoryStore::builder().build().await?)),
        #[cfg(feature = "mongodb")]
        BackendKind::MongoDb => {
            let uri = config.store.uri.as_deref().unwrap_or_default();
            let backend = roster_mongodb::MongoDbStore::builder(uri, &config.store.database)
                .build()
                .await?;

            Ok(DocumentStore::new(backend))
        }
        #[cfg(not(feature = "mongodb"))]
        BackendKind::MongoDb => Err(ConfigError::Invalid(
            "the mongodb backend is not compiled in; rebuild with the `mongodb` feature".to_string(),
        )
        .into()),
    }
}
