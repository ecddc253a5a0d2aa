//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations,
//! allowing the service to run against MongoDB in production and an in-process
//! store in development and tests.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use roster_core::{backend::StoreBackend, query::Filter};
//! use bson::doc;
//!
//! let id = backend.insert_one(doc! { "name": "Ann", "age": 22 }, "students").await?;
//! let found = backend.find_one(Filter::id(id), "students").await?;
//! assert!(found.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::StoreResult,
    query::{Expr, Query},
};

/// Abstract interface for document storage backends.
///
/// Every operation touches at most one document, except [`find`](StoreBackend::find),
/// and is expected to be atomic per document. Implementations must be safe to
/// share between concurrent async tasks; the service applies no locking of its own.
///
/// # Error Handling
///
/// A store that cannot be reached reports
/// [`StoreError::NotConnected`](crate::error::StoreError::NotConnected); any other
/// persistence failure is reported as [`StoreError::Backend`](crate::error::StoreError::Backend).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document and returns the identifier the store assigned to it.
    ///
    /// Any `_id` already present in `document` is replaced by a fresh identifier.
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<ObjectId>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>>;

    /// Returns the documents matching the query, honouring its limit and projection.
    ///
    /// A missing collection yields an empty result rather than an error.
    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>>;

    /// Sets the given top-level fields on the first document matching `filter`.
    ///
    /// Fields absent from `set` are left untouched. Returns the number of
    /// documents matched (0 or 1).
    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64>;

    /// Removes the first document matching `filter`.
    ///
    /// Returns the number of documents deleted (0 or 1).
    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases the backend's resources.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe counterpart of [`StoreBackend`], implemented for every backend.
///
/// This is what the service holds on to when the backend is picked at runtime
/// from configuration.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<ObjectId>;
    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>>;
    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>>;
    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64>;
    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64>;
    async fn ping(&self) -> StoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> StoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<ObjectId> {
        StoreBackend::insert_one(self, document, collection).await
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        StoreBackend::find_one(self, filter, collection).await
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>> {
        StoreBackend::find(self, query, collection).await
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64> {
        StoreBackend::update_one(self, filter, set, collection).await
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        StoreBackend::delete_one(self, filter, collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        StoreBackend::ping(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> StoreResult<()> {
        (*self).shutdown().await
    }
}

/// Factory trait for backends that need asynchronous setup (parsing a DSN,
/// resolving hosts) before they can be used.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
