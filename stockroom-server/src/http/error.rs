//! API error types with IntoResponse
//!
//! Errors are converted to enveloped JSON responses:
//!
//! | kind                | status |
//! |---------------------|--------|
//! | `validation`        | 400    |
//! | `not_found`         | 404    |
//! | `conflict`          | 409    |
//! | `store_unavailable` | 503    |
//! | `internal`          | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::envelope::{Envelope, ErrorInfo};
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Constraint violation (409)
    Conflict { detail: String },

    /// Database unreachable or pool exhausted (503, logged)
    StoreUnavailable(DbError),

    /// Any other database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Database(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let (message, detail) = match self {
            Self::Validation(e) => ("Invalid request", e.to_string()),
            Self::NotFound { resource, id } => {
                ("Resource not found", format!("{} '{}' not found", resource, id))
            }
            Self::Conflict { detail } => ("Request conflicts with stored data", detail),
            Self::StoreUnavailable(e) => {
                tracing::error!("Store unavailable: {}", e);
                (
                    "Store unavailable",
                    "the database is not reachable, retry later".to_string(),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                ("Internal server error", "an internal error occurred".to_string())
            }
        };

        let body: Envelope<()> = Envelope::failure(message, ErrorInfo { kind, detail });
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict { resource, reason } => Self::Conflict {
                detail: format!("{}: {}", resource, reason),
            },
            DbError::Sqlx(err) => classify_sqlx(err),
        }
    }
}

/// Map driver errors onto the taxonomy by SQLSTATE and failure class.
fn classify_sqlx(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &err {
        // 23503 / 23505
        if db.is_foreign_key_violation() || db.is_unique_violation() {
            return ApiError::Conflict {
                detail: db.message().to_string(),
            };
        }
    }

    if matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
    ) {
        return ApiError::StoreUnavailable(DbError::Sqlx(err));
    }

    ApiError::Database(DbError::Sqlx(err))
}
