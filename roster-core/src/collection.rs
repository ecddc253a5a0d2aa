//! Collection handles for document store operations.
//!
//! A [`Collection`] binds a collection name to the store's backend so callers
//! don't have to thread the name through every call.
//!
//! # Example
//!
//! ```ignore
//! use roster_core::query::Filter;
//! use bson::doc;
//!
//! let students = store.collection("student_detail");
//! let id = students.insert_one(doc! { "name": "Ann", "age": 22 }).await?;
//! let matched = students.update_one(Filter::id(id), doc! { "age": 23 }).await?;
//! assert_eq!(matched, 1);
//! ```

use bson::{Document, oid::ObjectId};

use crate::{
    backend::DynStoreBackend,
    error::StoreResult,
    query::{Expr, Query},
};

#[derive(Debug)]
pub struct Collection<'a> {
    name: String,
    backend: &'a dyn DynStoreBackend,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn insert_one(&self, document: Document) -> StoreResult<ObjectId> {
        self.backend
            .insert_one(document, self.name())
            .await
    }

    pub async fn find_one(&self, filter: Expr) -> StoreResult<Option<Document>> {
        self.backend
            .find_one(filter, self.name())
            .await
    }

    pub async fn find(&self, query: Query) -> StoreResult<Vec<Document>> {
        self.backend
            .find(query, self.name())
            .await
    }

    pub async fn update_one(&self, filter: Expr, set: Document) -> StoreResult<u64> {
        self.backend
            .update_one(filter, set, self.name())
            .await
    }

    pub async fn delete_one(&self, filter: Expr) -> StoreResult<u64> {
        self.backend
            .delete_one(filter, self.name())
            .await
    }
}
