//! In-memory document storage backend for roster.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs the service
//! during development and in tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Schemaless storage** - Stores documents as BSON for flexibility
//! - **Filtering** - Evaluates filter expressions, including dotted paths into embedded documents
//! - **Limits and projections** - Honours the query's result cap and field list
//!
//! # Quick Start
//!
//! ```ignore
//! use roster_core::{store::DocumentStore, query::Filter};
//! use roster_memory::InMemoryStore;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let students = store.collection("student_detail");
//!
//!     let id = students.insert_one(doc! { "name": "Ann", "age": 22 }).await?;
//!     assert!(students.find_one(Filter::id(id)).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as roster_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
