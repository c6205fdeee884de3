//! Uniform JSON response envelope
//!
//! Every `/api` response, success or failure, has the shape
//! `{ message, status, data, error? }`.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use crate::db::DeleteOutcome;

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Error details carried on failure envelopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: &'static str,
    pub detail: String,
}

/// Response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    pub status: Status,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            message: message.into(),
            status: Status::Success,
            data,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            message: message.into(),
            status: Status::Error,
            data: None,
            error: Some(error),
        }
    }
}

/// Status code + enveloped body
pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

/// Handler result
pub type ApiResult<T> = Result<Reply<T>, ApiError>;

/// 200 with data
pub fn ok<T>(message: impl Into<String>, data: T) -> Reply<T> {
    (StatusCode::OK, Json(Envelope::success(message, Some(data))))
}

/// 201 with the created record
pub fn created<T>(message: impl Into<String>, data: T) -> Reply<T> {
    (StatusCode::CREATED, Json(Envelope::success(message, Some(data))))
}

/// 200 either way; a missing row leaves `data: null` and says nothing changed.
pub fn updated<T>(resource: &str, record: Option<T>) -> Reply<T> {
    let message = match record {
        Some(_) => format!("{} updated successfully", resource),
        None => format!("{} not found, nothing updated", resource),
    };
    (StatusCode::OK, Json(Envelope::success(message, record)))
}

/// 200 with `data: null`; the message says whether a row was removed.
pub fn deleted(resource: &str, outcome: DeleteOutcome) -> Reply<()> {
    let message = match outcome {
        DeleteOutcome::Deleted => format!("{} deleted successfully", resource),
        DeleteOutcome::Absent => format!("{} already absent", resource),
    };
    (StatusCode::OK, Json(Envelope::success(message, None)))
}
