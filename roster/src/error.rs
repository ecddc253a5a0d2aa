//! HTTP-facing error type.
//!
//! Every failure a handler can produce is an [`ApiError`]. Its status code
//! follows a fixed taxonomy (client input → 400, unparseable body or query
//! → 422, unknown student → 404, anything on the store side → 500) and its
//! response body is always `{"detail": "..."}`. Store errors are logged in
//! full but only summarized to the client so connection details never leak.

use std::{fmt, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roster_core::error::StoreError;

use crate::{
    id::InvalidIdentifier,
    mapper::{EmptyUpdate, MappingError},
};

/// Operation being performed when the error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl Operation {
    fn activity(&self) -> &'static str {
        match self {
            Self::Create => "creating student",
            Self::Get => "retrieving student",
            Self::List => "listing students",
            Self::Update => "updating student",
            Self::Delete => "deleting student",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Get => write!(f, "get"),
            Self::List => write!(f, "list"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
    #[error(transparent)]
    EmptyUpdate(#[from] EmptyUpdate),
    /// The body or query string could not be parsed into the expected shape.
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Student not found")]
    NotFound,
    #[error("store error during {operation}: {source}")]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },
    #[error("store call during {operation} timed out after {after:?}")]
    Timeout { operation: Operation, after: Duration },
    #[error("malformed student document during {operation}: {source}")]
    Mapping {
        operation: Operation,
        #[source]
        source: MappingError,
    },
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn store(operation: Operation, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    pub fn mapping(operation: Operation, source: MappingError) -> Self {
        Self::Mapping { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_) | Self::EmptyUpdate(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::Timeout { .. } | Self::Mapping { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The human-readable explanation sent to the client.
    pub fn detail(&self) -> String {
        match self {
            Self::Store { operation, source } => {
                let cause = if source.is_connection() {
                    "storage backend unavailable"
                } else {
                    "storage backend error"
                };
                format!("Error while {}: {}", operation.activity(), cause)
            }
            Self::Timeout { operation, .. } => {
                format!("Error while {}: storage request timed out", operation.activity())
            }
            Self::Mapping { operation, source } => {
                format!("Error while {}: {}", operation.activity(), source)
            }
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}
