//! In-memory storage implementation for document stores.
//!
//! This module provides a simple in-memory backend that keeps documents in
//! ordered maps keyed by ObjectId behind an async-safe read-write lock.

use std::{collections::{BTreeMap, HashMap}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};

use roster_core::{
    query::{Expr, Query, ID_FIELD},
    error::{StoreError, StoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::DocumentEvaluator;

type CollectionMap = BTreeMap<ObjectId, Document>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// Documents are stored with their `_id` field set, keyed by that identifier.
/// Because ObjectIds grow with creation time, iteration (and therefore `find`)
/// returns documents in insertion order.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data. Each write holds the lock for the whole
/// operation, so single-document updates are atomic.
///
/// # Performance
///
/// Queries scan all documents in a collection (no indexing).
///
/// # Example
///
/// ```ignore
/// use roster_memory::InMemoryStore;
/// use roster_core::{backend::StoreBackend, query::Filter};
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.insert_one(doc! { "name": "Ann", "age": 22 }, "students").await?;
///     let found = store.find_one(Filter::id(id), "students").await?;
///     assert!(found.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the identifier of the first document in `collection` matching `filter`.
    fn first_match(collection: &CollectionMap, filter: &Expr) -> StoreResult<Option<ObjectId>> {
        for (id, doc) in collection {
            if DocumentEvaluator::new(doc).evaluate(filter)? {
                return Ok(Some(*id));
            }
        }

        Ok(None)
    }
}

fn project(document: &Document, fields: Option<&[String]>) -> Document {
    match fields {
        Some(fields) => document
            .iter()
            .filter(|(key, _)| fields.iter().any(|field| field == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => document.clone(),
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, mut document: Document, collection: &str) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD, Bson::ObjectId(id));

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);

        Ok(id)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        Ok(
            Self::first_match(collection_map, &filter)?
                .and_then(|id| collection_map.get(&id))
                .cloned()
        )
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = Vec::new();
        let limit = query.limit.unwrap_or(usize::MAX);

        for doc in collection_map.values() {
            if documents.len() >= limit {
                break;
            }

            if DocumentEvaluator::matches(doc, query.filter.as_ref())? {
                documents.push(project(doc, query.projection.as_deref()));
            }
        }

        Ok(documents)
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64> {
        if set.contains_key(ID_FIELD) {
            return Err(StoreError::InvalidDocument(format!("`{ID_FIELD}` is immutable")));
        }

        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let Some(id) = Self::first_match(collection_map, &filter)? else {
            return Ok(0);
        };

        if let Some(doc) = collection_map.get_mut(&id) {
            for (key, value) in set {
                doc.insert(key, value);
            }
        }

        Ok(1)
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        Ok(
            match Self::first_match(collection_map, &filter)? {
                Some(id) => collection_map.remove(&id).map_or(0, |_| 1),
                None => 0,
            }
        )
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
