//! Route table for the service.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Builds the application router with every route mounted under `prefix`.
///
/// Slashes around `prefix` are optional. An empty prefix, or `/`, mounts the
/// routes at the root.
pub fn router(state: AppState, prefix: &str) -> Router {
    let students = Router::new()
        .route(
            "/students",
            post(handlers::create_student).get(handlers::list_students),
        )
        .route("/students/", post(handlers::create_student))
        .route(
            "/students/{id}",
            get(handlers::get_student)
                .patch(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .method_not_allowed_fallback(handlers::method_not_allowed);

    let prefix = prefix.trim_matches('/');
    let routes = if prefix.is_empty() {
        students
    } else {
        Router::new().nest(&format!("/{prefix}"), students)
    };

    routes
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
