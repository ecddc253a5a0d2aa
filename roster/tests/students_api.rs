use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header},
};
use bson::{Document, doc, oid::ObjectId};
use serde_json::{Value, json};
use tower::ServiceExt;

use roster::{config::Config, routes, state::AppState};
use roster_core::{
    backend::StoreBackend,
    error::{StoreError, StoreResult},
    query::{Expr, Query},
    store::DocumentStore,
};
use roster_memory::InMemoryStore;

fn config_with_cap(list_cap: usize) -> Config {
    let mut config = Config::default();
    config.limits.list_cap = list_cap;
    config.limits.store_timeout_ms = 200;
    config
}

fn app_with<B: StoreBackend + 'static>(backend: B, config: &Config) -> Router {
    let store = Arc::new(DocumentStore::new(backend));
    routes::router(AppState::new(store, config), &config.server.prefix)
}

fn app() -> Router {
    app_with(InMemoryStore::new(), &config_with_cap(100))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create(app: &Router, student: Value) -> String {
    let (status, body) = send(app, Method::POST, "/api/students", Some(student)).await;
    assert_eq!(status, StatusCode::CREATED);

    body["id"].as_str().unwrap().to_string()
}

fn ann() -> Value {
    json!({ "name": "Ann", "age": 22, "address": { "city": "Lyon", "country": "France" } })
}

#[tokio::test]
async fn created_student_can_be_read_back() {
    let app = app();

    let id = create(&app, ann()).await;
    assert_eq!(id.len(), 24);

    let (status, body) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ann());
}

#[tokio::test]
async fn trailing_slash_create_is_accepted() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/students/", Some(ann())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn create_requires_an_address() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/students", Some(json!({ "name": "Bo", "age": 40 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (_, body) = send(&app, Method::GET, "/api/students", None).await;
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn address_fields_are_optional() {
    let app = app();

    let id = create(&app, json!({ "name": "Bo", "age": 40, "address": {} })).await;

    let (_, body) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(
        body,
        json!({ "name": "Bo", "age": 40, "address": { "city": null, "country": null } })
    );
}

#[tokio::test]
async fn malformed_bodies_are_unprocessable() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/students", Some(json!({ "name": "Ann" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({ "name": "Ann", "age": "twenty" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
    let app = app();
    let id = create(&app, ann()).await;
    let uri = format!("/api/students/{id}");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "age": 23 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "detail": "Student updated successfully" }));

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["age"], 23);
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["address"], json!({ "city": "Lyon", "country": "France" }));
}

#[tokio::test]
async fn address_update_replaces_the_whole_address() {
    let app = app();
    let id = create(&app, ann()).await;
    let uri = format!("/api/students/{id}");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "address": { "city": "Paris" } }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["address"], json!({ "city": "Paris", "country": null }));
}

/// Delegates to an in-memory store, counting the updates that reach it.
#[derive(Debug, Default)]
struct CountingStore {
    inner: InMemoryStore,
    updates: Arc<AtomicUsize>,
}

#[async_trait]
impl StoreBackend for CountingStore {
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<ObjectId> {
        self.inner.insert_one(document, collection).await
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        self.inner.find_one(filter, collection).await
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Document>> {
        self.inner.find(query, collection).await
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> StoreResult<u64> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_one(filter, set, collection).await
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        self.inner.delete_one(filter, collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn empty_update_is_rejected_before_the_store() {
    let store = CountingStore::default();
    let updates = Arc::clone(&store.updates);
    let app = app_with(store, &config_with_cap(100));
    let id = create(&app, ann()).await;
    let uri = format!("/api/students/{id}");

    for update in [json!({}), json!({ "name": null, "age": null })] {
        let (status, body) = send(&app, Method::PATCH, &uri, Some(update)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "No fields provided to update" }));
    }
    assert_eq!(updates.load(Ordering::SeqCst), 0);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "age": 23 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_of_unknown_student_is_not_found() {
    let app = app();
    let uri = format!("/api/students/{}", ObjectId::new().to_hex());

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "age": 1 }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Student not found" }));
}

#[tokio::test]
async fn invalid_identifiers_are_bad_requests() {
    let app = app();

    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(json!({ "age": 1 }))),
        (Method::DELETE, None),
    ] {
        let (status, response) = send(&app, method, "/api/students/abc", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "detail": "'abc' is not a valid student id" }));
    }
}

#[tokio::test]
async fn invalid_identifier_wins_over_invalid_body() {
    let app = app();

    let (status, _) = send(&app, Method::PATCH, "/api/students/abc", Some(json!({ "age": "old" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_student_is_gone() {
    let app = app();
    let id = create(&app, ann()).await;
    let uri = format!("/api/students/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "detail": "Student deleted successfully" }));

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Student not found" }));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn seeded() -> Router {
    let app = app();

    create(&app, ann()).await;
    create(&app, json!({ "name": "Bo", "age": 35, "address": { "city": "Nice", "country": "France" } })).await;
    create(&app, json!({ "name": "Cy", "age": 41, "address": { "city": "Oslo", "country": "Norway" } })).await;
    create(&app, json!({ "name": "Di", "age": 19, "address": {} })).await;

    app
}

#[tokio::test]
async fn listing_returns_summaries() {
    let app = seeded().await;

    let (status, body) = send(&app, Method::GET, "/api/students", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": [
            { "name": "Ann", "age": 22 },
            { "name": "Bo", "age": 35 },
            { "name": "Cy", "age": 41 },
            { "name": "Di", "age": 19 },
        ] })
    );
}

#[tokio::test]
async fn listing_filters_by_country_and_minimum_age() {
    let app = seeded().await;

    let (_, body) = send(&app, Method::GET, "/api/students?country=France", None).await;
    assert_eq!(body, json!({ "data": [{ "name": "Ann", "age": 22 }, { "name": "Bo", "age": 35 }] }));

    let (_, body) = send(&app, Method::GET, "/api/students?age=35", None).await;
    assert_eq!(body, json!({ "data": [{ "name": "Bo", "age": 35 }, { "name": "Cy", "age": 41 }] }));

    let (_, body) = send(&app, Method::GET, "/api/students?country=France&age=30", None).await;
    assert_eq!(body, json!({ "data": [{ "name": "Bo", "age": 35 }] }));

    let (_, body) = send(&app, Method::GET, "/api/students?country=france", None).await;
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn zero_minimum_age_still_applies() {
    let app = seeded().await;

    let (_, body) = send(&app, Method::GET, "/api/students?age=0", None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn non_numeric_age_is_unprocessable() {
    let app = seeded().await;

    let (status, body) = send(&app, Method::GET, "/api/students?age=old", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn listing_is_capped() {
    let app = app_with(InMemoryStore::new(), &config_with_cap(2));
    for name in ["Ann", "Bo", "Cy"] {
        create(&app, json!({ "name": name, "age": 30, "address": {} })).await;
    }

    let (_, body) = send(&app, Method::GET, "/api/students", None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_stored_documents_are_server_errors() {
    let backend = InMemoryStore::new();
    let config = config_with_cap(100);
    let id = backend
        .insert_one(doc! { "name": "Ghost" }, &config.store.collection)
        .await
        .unwrap();
    let app = app_with(backend, &config);

    let (status, body) = send(&app, Method::GET, &format!("/api/students/{}", id.to_hex()), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Error while retrieving student"));

    let (status, _) = send(&app, Method::GET, "/api/students", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_routes_keep_the_error_shape() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not Found" }));
}

#[tokio::test]
async fn unsupported_methods_keep_the_error_shape() {
    let app = app();
    let id = create(&app, ann()).await;

    let (status, body) = send(&app, Method::PUT, &format!("/api/students/{id}"), Some(ann())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "detail": "Method Not Allowed" }));

    let (status, body) = send(&app, Method::DELETE, "/api/students", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "detail": "Method Not Allowed" }));
}

#[tokio::test]
async fn routes_can_be_mounted_at_the_root() {
    let mut config = config_with_cap(100);
    config.server.prefix = "/".to_string();
    let app = app_with(InMemoryStore::new(), &config);

    let (status, _) = send(&app, Method::POST, "/students", Some(ann())).await;

    assert_eq!(status, StatusCode::CREATED);
}

/// A store whose every call fails as if the server were unreachable.
#[derive(Debug)]
struct UnreachableStore;

#[async_trait]
impl StoreBackend for UnreachableStore {
    async fn insert_one(&self, _document: Document, _collection: &str) -> StoreResult<ObjectId> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }

    async fn find_one(&self, _filter: Expr, _collection: &str) -> StoreResult<Option<Document>> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }

    async fn find(&self, _query: Query, _collection: &str) -> StoreResult<Vec<Document>> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }

    async fn update_one(&self, _filter: Expr, _set: Document, _collection: &str) -> StoreResult<u64> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }

    async fn delete_one(&self, _filter: Expr, _collection: &str) -> StoreResult<u64> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::NotConnected("connection refused".to_string()))
    }
}

#[tokio::test]
async fn unreachable_store_is_a_server_error() {
    let app = app_with(UnreachableStore, &config_with_cap(100));
    let id = ObjectId::new().to_hex();

    let (status, body) = send(&app, Method::POST, "/api/students", Some(ann())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Error while creating student: storage backend unavailable" }));

    let (status, body) = send(&app, Method::GET, "/api/students", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Error while listing students: storage backend unavailable" }));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// A store that answers, but only after the request deadline has passed.
#[derive(Debug)]
struct StalledStore;

impl StalledStore {
    async fn stall() {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

#[async_trait]
impl StoreBackend for StalledStore {
    async fn insert_one(&self, _document: Document, _collection: &str) -> StoreResult<ObjectId> {
        Self::stall().await;
        Ok(ObjectId::new())
    }

    async fn find_one(&self, _filter: Expr, _collection: &str) -> StoreResult<Option<Document>> {
        Self::stall().await;
        Ok(None)
    }

    async fn find(&self, _query: Query, _collection: &str) -> StoreResult<Vec<Document>> {
        Self::stall().await;
        Ok(vec![])
    }

    async fn update_one(&self, _filter: Expr, _set: Document, _collection: &str) -> StoreResult<u64> {
        Self::stall().await;
        Ok(0)
    }

    async fn delete_one(&self, _filter: Expr, _collection: &str) -> StoreResult<u64> {
        Self::stall().await;
        Ok(0)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn stalled_store_times_out_instead_of_reporting_not_found() {
    let app = app_with(StalledStore, &config_with_cap(100));
    let uri = format!("/api/students/{}", ObjectId::new().to_hex());

    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Error while retrieving student: storage request timed out" }));
}
