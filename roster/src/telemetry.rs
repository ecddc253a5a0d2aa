//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a JSON subscriber on stdout.
///
/// `RUST_LOG` wins when set and valid; otherwise `level` is used, and an
/// unparseable `level` falls back to `info`. Calling this twice is harmless.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(service = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), "tracing initialized");
    }
}
