//! Typed API error for HTTP handlers.
//!
//! Converts service errors into JSON responses of the shape
//! `{"status": "error", "message": ...}`. Client mistakes are 400;
//! anything else is logged server-side and reported as 500 with a
//! fixed message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::CounterError;
use crate::usecases::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — unknown pen, bad value, unparseable body.
    BadRequest {
        kind: &'static str,
        message: String,
    },
    /// 500 Internal Server Error — details logged, not exposed.
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn invalid_body() -> Self {
        Self::BadRequest {
            kind: "invalid_body",
            message: "Invalid JSON body".to_string(),
        }
    }

    /// Short label used for the request error metric.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { kind, .. } => *kind,
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<CounterError> for ApiError {
    fn from(err: CounterError) -> Self {
        let kind = match err {
            CounterError::UnknownItem(_) => "unknown_pen",
            CounterError::InvalidValue { .. } => "invalid_value",
        };
        Self::BadRequest {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Counter(e) => e.into(),
            ServiceError::Persistence(source) => Self::Internal {
                message: "Failed to persist counters",
                source,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message),
            Self::Internal { message, source } => {
                tracing::error!(error = ?source, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };
        let body = serde_json::json!({"status": "error", "message": message});
        (status, Json(body)).into_response()
    }
}
