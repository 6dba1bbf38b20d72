use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::gateway::extract::AuthUser;
use crate::gateway::routes::into_object;
use crate::gateway::state::GatewayState;
use crate::patterns;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/change-password", post(change_password))
        .route("/auth/validate", post(validate))
}

async fn register(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let result = state.auth.call(patterns::auth::REGISTER, body).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn login(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state.auth.call(patterns::auth::LOGIN, body).await?;
    Ok(Json(result))
}

async fn refresh(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state.auth.call(patterns::auth::REFRESH_TOKEN, body).await?;
    Ok(Json(result))
}

async fn logout(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let mut payload = into_object(body)?;
    payload.insert("userId".into(), json!(identity.id));
    state
        .auth
        .call(patterns::auth::LOGOUT, Value::Object(payload))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_password(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let mut payload = into_object(body)?;
    payload.insert("userId".into(), json!(identity.id));
    state
        .auth
        .call(patterns::auth::CHANGE_PASSWORD, Value::Object(payload))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn validate(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state.auth.call(patterns::auth::VALIDATE_TOKEN, body).await?;
    Ok(Json(result))
}
