use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Error taxonomy shared by the gateway and all backend services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message as shown to external callers. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Maps a unique-constraint violation from a racing insert to the same
    /// Conflict the application-level check would have produced.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::Conflict(message.to_string());
            }
        }
        AppError::Database(err)
    }
}

/// Error shape carried over the service transport: `{statusCode, message}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireError {
    pub status_code: u16,
    pub message: String,
}

impl From<&AppError> for WireError {
    fn from(err: &AppError) -> Self {
        Self {
            status_code: err.status_code().as_u16(),
            message: err.public_message(),
        }
    }
}

impl From<WireError> for AppError {
    fn from(err: WireError) -> Self {
        match err.status_code {
            400 => AppError::BadRequest(err.message),
            401 => AppError::Unauthorized(err.message),
            403 => AppError::Forbidden(err.message),
            404 => AppError::NotFound(err.message),
            409 => AppError::Conflict(err.message),
            _ => AppError::Internal(err.message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.public_message();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
            "timestamp": timestamp,
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_error_roundtrips_semantic_status() {
        let err = AppError::NotFound("Recipe with ID 42 not found".into());
        let wire = WireError::from(&err);
        assert_eq!(wire.status_code, 404);
        let back = AppError::from(wire);
        assert!(matches!(back, AppError::NotFound(_)));
        assert_eq!(back.to_string(), "Recipe with ID 42 not found");
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = AppError::Internal("pool exhausted".into());
        let wire = WireError::from(&err);
        assert_eq!(wire.status_code, 500);
        assert_eq!(wire.message, "Internal server error");
    }

    #[test]
    fn unknown_wire_status_becomes_internal() {
        let wire = WireError {
            status_code: 418,
            message: "teapot".into(),
        };
        assert!(matches!(AppError::from(wire), AppError::Internal(_)));
    }

    #[test]
    fn wire_error_uses_camel_case() {
        let wire = WireError {
            status_code: 409,
            message: "Email already exists".into(),
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["statusCode"], 409);
        assert_eq!(json["message"], "Email already exists");
    }
}
