use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, FindOptions},
};
use roster_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Expr, Query, ID_FIELD},
};

use crate::query::MongoQueryTranslator;


/// Maps a driver error onto the store taxonomy, separating "could not reach
/// the server" from failures reported by a reachable server.
fn backend_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::NotConnected(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

fn projection(fields: &[String]) -> Document {
    let mut projection = Document::new();

    if !fields.iter().any(|field| field == ID_FIELD) {
        projection.insert(ID_FIELD, 0);
    }
    for field in fields {
        projection.insert(field.clone(), 1);
    }

    projection
}


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, mut document: Document, collection: &str) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD, id);

        let result = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(backend_error)?;

        match result.inserted_id {
            Bson::ObjectId(inserted) => Ok(inserted),
            other => Err(StoreError::InvalidDocument(format!("Expected an ObjectId, got {other}"))),
        }
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(MongoQueryTranslator::translate(Some(&filter))?)
            .await
            .map_err(backend_error)
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if let Some(fields) = &query.projection {
            options.projection = Some(projection(fields));
        }

        self.get_collection(collection)
            .find(MongoQueryTranslator::translate(query.filter.as_ref())?)
            .with_options(options)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64> {
        if set.contains_key(ID_FIELD) {
            return Err(StoreError::InvalidDocument(format!("`{ID_FIELD}` is immutable")));
        }

        Ok(
            self.get_collection(collection)
                .update_one(
                    MongoQueryTranslator::translate(Some(&filter))?,
                    doc! { "$set": set },
                )
                .await
                .map_err(backend_error)?
                .matched_count
        )
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .delete_one(MongoQueryTranslator::translate(Some(&filter))?)
                .await
                .map_err(backend_error)?
                .deleted_count
        )
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the DSN and creates a client. The driver connects lazily, so
    /// this does not contact the server; use `ping` for that.
    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| StoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| StoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
