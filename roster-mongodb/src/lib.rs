//! MongoDB backend implementation for roster.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! used by the service in production. It is compiled into the service binary through
//! the `mongodb` feature (enabled by default):
//!
//! ```toml
//! [dependencies]
//! roster = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Native filtering** - Filter expressions are translated to MongoDB query documents
//! - **Async/await** - Fully asynchronous API built on MongoDB's async driver
//! - **Connection checks** - `ping` runs the admin `ping` command
//!
//! # Example
//!
//! ```ignore
//! use roster_core::backend::StoreBackendBuilder;
//! use roster_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "Students")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as roster_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
