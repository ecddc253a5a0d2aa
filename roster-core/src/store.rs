//! Main document store interface.
//!
//! [`DocumentStore`] owns a backend chosen at runtime and hands out
//! [`Collection`] handles scoped to a single collection name.
//!
//! # Example
//!
//! ```ignore
//! use roster_core::store::DocumentStore;
//! use roster_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let students = store.collection("student_detail");
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::Collection,
    error::StoreResult,
};

#[derive(Debug)]
pub struct DocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DocumentStore {
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a> {
        Collection::new(name.to_string(), &*self.backend)
    }

    /// Checks that the backend is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
