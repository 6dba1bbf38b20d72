use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod extract;
pub mod routes;
pub mod state;

pub use state::GatewayState;

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(routes::auth::router())
                .merge(routes::users::router())
                .merge(routes::recipes::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(middleware::from_fn(error_metadata))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let elapsed_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, elapsed_ms, "response");
                        } else {
                            tracing::info!(%status, elapsed_ms, "response");
                        }
                    },
                ),
        )
}

/// Exception boundary: stamps every JSON error body with the path and
/// method it failed on, matching the shape callers get for uncaught 500s.
async fn error_metadata(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let res = next.run(req).await;

    let status = res.status();
    if !status.is_client_error() && !status.is_server_error() {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    let bytes = match axum::body::to_bytes(body, 256 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut map)) => {
            map.insert("path".into(), json!(path));
            map.insert("method".into(), json!(method.as_str()));
            let buf = serde_json::to_vec(&map).unwrap_or_else(|_| bytes.to_vec());
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(buf))
        }
        _ => Response::from_parts(parts, Body::from(bytes)),
    }
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
