//! Request/response bodies for the HTTP API.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Limits, Pen};

use super::error::ApiError;

/// Parsed `/click` or `/adjust` body.
///
/// Bodies are read as free-form JSON so that a missing or non-string
/// `pen` surfaces as "Unknown pen" rather than a decoding error, and so
/// that adjustment values can be coerced leniently.
#[derive(Debug, Default)]
pub struct PenRequest {
    pub pen: String,
    pub daily: Option<Value>,
    pub total: Option<Value>,
}

impl PenRequest {
    /// Parse a raw body, ignoring `Content-Type`.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::invalid_body())?;
        let Value::Object(mut fields) = value else {
            return Err(ApiError::invalid_body());
        };

        Ok(Self {
            pen: fields
                .get("pen")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            daily: fields.remove("daily"),
            total: fields.remove("total"),
        })
    }
}

/// `{"status": "ok"}`
#[derive(Debug, Serialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl StatusOk {
    pub const fn new() -> Self {
        Self { status: "ok" }
    }
}

/// `/pens` payload: the catalogue and its limits.
#[derive(Debug, Serialize)]
pub struct PensResponse {
    pub pens: Vec<Pen>,
    pub limits: Limits,
}
