use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::json;
use tracing::warn;

use crate::auth::dto::Identity;
use crate::error::AppError;
use crate::gateway::state::GatewayState;
use crate::patterns;

/// Bearer-token guard: resolves the caller's identity through the auth
/// service before the handler runs. Fails closed with Unauthorized when
/// the token is absent or invalid.
pub struct AuthUser(pub Identity);

#[async_trait::async_trait]
impl FromRequestParts<GatewayState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authorization token is required".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let result = state
            .auth
            .call(patterns::auth::VALIDATE_TOKEN, json!({ "token": token }))
            .await?;

        let identity: Identity = serde_json::from_value(result).map_err(|e| {
            warn!(error = %e, "malformed identity from auth service");
            AppError::Unauthorized("Invalid token".into())
        })?;

        Ok(AuthUser(identity))
    }
}
