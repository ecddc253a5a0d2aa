//! Student records HTTP service.
//!
//! `roster` exposes create, get, list, partial update and delete for student
//! records over JSON, persisting them in a document store. The store is
//! MongoDB in production (`mongodb` feature, on by default) or an in-process
//! store for development and tests; both sit behind
//! [`roster_core::backend::StoreBackend`].
//!
//! # Layout
//!
//! - [`config`] - layered settings (defaults, `roster.toml`, environment)
//! - [`model`] - request and response bodies
//! - [`id`] - the public student identifier
//! - [`mapper`] - conversion between bodies and stored documents
//! - [`filter`] - listing query parameters to store filters
//! - [`handlers`] and [`routes`] - the HTTP surface
//! - [`error`] - status codes and `{"detail": ...}` bodies
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use roster::{config::Config, routes, state::AppState};
//! use roster_core::store::DocumentStore;
//! use roster_memory::InMemoryStore;
//!
//! let config = Config::default();
//! let store = Arc::new(DocumentStore::new(InMemoryStore::new()));
//! let app = routes::router(AppState::new(store, &config), &config.server.prefix);
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod id;
pub mod mapper;
pub mod model;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;
