//! Request handlers for the students resource.
//!
//! Handlers validate the path identifier before looking at the body, so a
//! request with both a bad id and a bad body reports the id.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use roster_core::query::{Filter, Query as StoreQuery};

use crate::{
    error::{ApiError, ErrorBody, Operation},
    filter::StudentFilter,
    id::StudentId,
    mapper::{self, AGE, NAME},
    model::{CreatedStudent, StatusResponse, Student, StudentList, UpdateStudent},
    state::AppState,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// `POST /students`
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Json<Student>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedStudent>)> {
    let Json(student) = body?;

    let id = state
        .bounded(
            Operation::Create,
            state.students().insert_one(mapper::to_document(&student)),
        )
        .await?;

    let id = StudentId::from(id);
    tracing::info!(student_id = %id, "student created");

    Ok((StatusCode::CREATED, Json(CreatedStudent { id: id.encode() })))
}

/// `GET /students?country=&age=`
pub async fn list_students(
    State(state): State<AppState>,
    params: Result<Query<StudentFilter>, QueryRejection>,
) -> ApiResult<Json<StudentList>> {
    let Query(params) = params?;

    let query = StoreQuery::builder()
        .maybe_filter(params.to_expr())
        .limit(state.list_cap())
        .project([NAME, AGE])
        .build();

    let documents = state
        .bounded(Operation::List, state.students().find(query))
        .await?;

    let data = documents
        .iter()
        .map(mapper::project_summary)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ApiError::mapping(Operation::List, source))?;

    tracing::debug!(count = data.len(), "students listed");

    Ok(Json(StudentList { data }))
}

/// `GET /students/{id}`
pub async fn get_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Student>> {
    let id = StudentId::decode(&raw_id)?;

    let document = state
        .bounded(
            Operation::Get,
            state.students().find_one(Filter::id(id.object_id())),
        )
        .await?
        .ok_or(ApiError::NotFound)?;

    let student = mapper::from_document(&document)
        .map_err(|source| ApiError::mapping(Operation::Get, source))?;

    Ok(Json(student))
}

/// `PATCH /students/{id}`
pub async fn update_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateStudent>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let id = StudentId::decode(&raw_id)?;
    let Json(update) = body?;
    let set = mapper::to_partial_update(&update)?;

    let matched = state
        .bounded(
            Operation::Update,
            state.students().update_one(Filter::id(id.object_id()), set),
        )
        .await?;

    if matched == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(student_id = %id, "student updated");

    Ok(Json(StatusResponse::success("Student updated successfully")))
}

/// `DELETE /students/{id}`
pub async fn delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let id = StudentId::decode(&raw_id)?;

    let deleted = state
        .bounded(
            Operation::Delete,
            state.students().delete_one(Filter::id(id.object_id())),
        )
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(student_id = %id, "student deleted");

    Ok(Json(StatusResponse::success("Student deleted successfully")))
}

/// Fallback for unknown routes, keeping the `{"detail": ...}` body shape.
pub async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody { detail: "Not Found".to_string() }))
}

/// Fallback for known routes called with an unsupported method.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody { detail: "Method Not Allowed".to_string() }),
    )
}
