use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
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
        .route("/recipes", post(create).get(list))
        .route("/recipes/search", get(search))
        .route("/recipes/author/:id", get(by_author))
        .route("/recipes/slug/:slug", get(by_slug))
        .route("/recipes/:id", get(by_id))
        .route("/recipes/:id", patch(update))
        .route("/recipes/:id", delete(remove))
}

async fn create(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut payload = into_object(body)?;
    payload.insert("authorId".into(), json!(identity.id));
    let result = state
        .recipes
        .call(patterns::recipes::CREATE, Value::Object(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list(
    State(state): State<GatewayState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .recipes
        .call(
            patterns::recipes::FIND_ALL,
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
        .recipes
        .call(
            patterns::recipes::SEARCH,
            json!({ "query": query.q, "page": query.page, "limit": query.limit }),
        )
        .await?;
    Ok(Json(result))
}

async fn by_author(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .recipes
        .call(
            patterns::recipes::FIND_BY_AUTHOR,
            json!({ "authorId": id, "page": page.page, "limit": page.limit }),
        )
        .await?;
    Ok(Json(result))
}

async fn by_id(
    State(state): State<GatewayState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .recipes
        .call(patterns::recipes::FIND_BY_ID, json!({ "id": id }))
        .await?;
    Ok(Json(result))
}

async fn by_slug(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .recipes
        .call(patterns::recipes::FIND_BY_SLUG, json!({ "slug": slug }))
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
    payload.insert("authorId".into(), json!(identity.id));
    let result = state
        .recipes
        .call(patterns::recipes::UPDATE, Value::Object(payload))
        .await?;
    Ok(Json(result))
}

async fn remove(
    State(state): State<GatewayState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .recipes
        .call(
            patterns::recipes::DELETE,
            json!({ "id": id, "authorId": identity.id }),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
