use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppError;

pub mod auth;
pub mod recipes;
pub mod users;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query-string pagination, forwarded verbatim to the services.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Forwarded bodies must be JSON objects so the gateway can attach the
/// caller's identity fields.
pub(crate) fn into_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest("Expected a JSON object".into())),
    }
}
