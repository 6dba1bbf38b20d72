use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use uuid::Uuid;

use forkful::error::AppError;
use forkful::gateway::{build_router, GatewayState};
use forkful::rpc::server::{self, Handler};

const GOOD_TOKEN: &str = "good-token";

fn caller_id() -> Uuid {
    Uuid::parse_str("6b1e3b0a-8a44-4a6e-9b39-0cafd7b1d001").expect("uuid")
}

/// Stands in for all three backend services: validates tokens, echoes
/// forwarded payloads so the tests can observe identity injection.
struct StubBackend;

#[async_trait]
impl Handler for StubBackend {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        match cmd {
            "auth.validate_token" => {
                if payload["token"] == GOOD_TOKEN {
                    Ok(json!({
                        "id": caller_id(),
                        "email": "a@x.com",
                        "username": "a1",
                    }))
                } else {
                    Err(AppError::Unauthorized("Invalid token".into()))
                }
            }
            "auth.register" => {
                if payload["email"] == "a@x.com" {
                    Err(AppError::Conflict("Email already exists".into()))
                } else {
                    Ok(json!({ "user": { "email": payload["email"] } }))
                }
            }
            "auth.logout" | "auth.change_password" => Ok(Value::Null),
            "recipe.create" => Ok(payload),
            "users.deactivate" => {
                if payload["id"] == payload["callerId"] {
                    Ok(Value::Null)
                } else {
                    Err(AppError::Forbidden(
                        "You can only deactivate your own profile".into(),
                    ))
                }
            }
            other => Err(server::unknown_cmd(other)),
        }
    }
}

async fn spawn_gateway() -> axum::Router {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    tokio::spawn(async move {
        let _ = server::serve(listener, Arc::new(StubBackend)).await;
    });
    let state = GatewayState::from_addrs(addr.clone(), addr.clone(), addr);
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

#[tokio::test]
async fn health_is_open() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn guarded_route_requires_token() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request("POST", "/api/v1/recipes", None, json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Authorization token is required");
    assert_eq!(body["path"], "/api/v1/recipes");
    assert_eq!(body["method"], "POST");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn guard_rejects_non_bearer_scheme() {
    let app = spawn_gateway().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/recipes")
        .header("content-type", "application/json")
        .header("authorization", "Basic abc123")
        .body(Body::from("{}"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid Authorization header");
}

#[tokio::test]
async fn guard_rejects_invalid_token() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/recipes",
            Some("forged"),
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn create_recipe_injects_caller_identity() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/recipes",
            Some(GOOD_TOKEN),
            json!({ "name": "Beef Pho" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    // The stub echoes the forwarded payload: the gateway must have
    // attached the resolved caller id.
    let body = body_json(response).await;
    assert_eq!(body["name"], "Beef Pho");
    assert_eq!(body["authorId"], json!(caller_id()));
}

#[tokio::test]
async fn backend_conflict_passes_through_with_metadata() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({ "email": "a@x.com", "username": "a2", "password": "longenough" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 409);
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["path"], "/api/v1/auth/register");
    assert_eq!(body["method"], "POST");
}

#[tokio::test]
async fn register_returns_created() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({ "email": "b@x.com", "username": "b1", "password": "longenough" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "b@x.com");
}

#[tokio::test]
async fn change_password_returns_no_content() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/change-password",
            Some(GOOD_TOKEN),
            json!({ "currentPassword": "old-secret", "newPassword": "new-secret" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_other_users_profile_is_forbidden() {
    let app = spawn_gateway().await;
    let other = Uuid::parse_str("9f0a74d2-11cc-4be2-8f2b-3c5d1a9e7002").expect("uuid");
    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/users/{other}"),
            Some(GOOD_TOKEN),
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["message"], "You can only deactivate your own profile");
}

#[tokio::test]
async fn delete_own_profile_returns_no_content() {
    let app = spawn_gateway().await;
    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/users/{}", caller_id()),
            Some(GOOD_TOKEN),
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
