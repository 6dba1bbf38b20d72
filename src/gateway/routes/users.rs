use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::gateway::extract::AuthUser;
use crate::gateway::routes::{into_object, Pagination, SearchQuery};
use crate::gateway::state::GatewayState;
use crate::patterns;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/users", get(list))
        .route("/users/search", get(search))
        .route("/users/email/:email", get(by_email))
        .route("/users/username/:username", get(by_username))
        .route("/users/:id", get(by_id))
        .route("/users/:id/profile", get(profile))
        .route("/users/:id", patch(update))
        .route("/users/:id", delete(deactivate))
}

async fn list(
    State(state): State<GatewayState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(
            patterns::users::FIND_ALL,
            json!({ "page": page.page, "limit": page.limit }),
        )
        .await?;
    Ok(Json(result))
}

async fn search(
    State(state): State<GatewayState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(
            patterns::users::SEARCH,
            json!({ "query": query.q, "page": query.page, "limit": query.limit }),
        )
        .await?;
    Ok(Json(result))
}

async fn by_email(
    State(state): State<GatewayState>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(patterns::users::FIND_BY_EMAIL, json!({ "email": email }))
        .await?;
    Ok(Json(result))
}

async fn by_username(
    State(state): State<GatewayState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(
            patterns::users::FIND_BY_USERNAME,
            json!({ "username": username }),
        )
        .await?;
    Ok(Json(result))
}

async fn by_id(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(patterns::users::FIND_BY_ID, json!({ "id": id }))
        .await?;
    Ok(Json(result))
}

async fn profile(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .users
        .call(patterns::users::GET_PROFILE, json!({ "id": id }))
        .await?;
    Ok(Json(result))
}

async fn update(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let mut payload = into_object(body)?;
    payload.insert("id".into(), json!(id));
    payload.insert("callerId".into(), json!(identity.id));
    let result = state
        .users
        .call(patterns::users::UPDATE, Value::Object(payload))
        .await?;
    Ok(Json(result))
}

async fn deactivate(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .users
        .call(
            patterns::users::DEACTIVATE,
            json!({ "id": id, "callerId": identity.id }),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
