use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use forkful::error::AppError;
use forkful::rpc::server::{self, Handler};
use forkful::rpc::RpcClient;

struct StubService;

#[async_trait]
impl Handler for StubService {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        match cmd {
            "test.echo" => Ok(json!({ "echo": payload })),
            "test.null" => Ok(Value::Null),
            "test.forbidden" => Err(AppError::Forbidden(
                "You can only update your own recipes".into(),
            )),
            "test.conflict" => Err(AppError::Conflict("Email already exists".into())),
            other => Err(server::unknown_cmd(other)),
        }
    }
}

async fn spawn_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    tokio::spawn(async move {
        let _ = server::serve(listener, Arc::new(StubService)).await;
    });
    addr
}

#[tokio::test]
async fn call_roundtrips_payload() {
    let addr = spawn_stub().await;
    let client = RpcClient::new("stub", addr);

    let result = client
        .call("test.echo", json!({ "name": "Beef Pho", "servings": 4 }))
        .await
        .expect("call");
    assert_eq!(result["echo"]["name"], "Beef Pho");
    assert_eq!(result["echo"]["servings"], 4);
}

#[tokio::test]
async fn backend_error_survives_the_wire() {
    let addr = spawn_stub().await;
    let client = RpcClient::new("stub", addr);

    let err = client.call("test.forbidden", json!({})).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(err.to_string(), "You can only update your own recipes");

    let err = client.call("test.conflict", json!({})).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.to_string(), "Email already exists");
}

#[tokio::test]
async fn unknown_command_is_not_found() {
    let addr = spawn_stub().await;
    let client = RpcClient::new("stub", addr);

    let err = client.call("test.missing", json!({})).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains("test.missing"));
}

#[tokio::test]
async fn sequential_calls_share_one_connection() {
    let addr = spawn_stub().await;
    let client = RpcClient::new("stub", addr);

    for i in 0..10 {
        let result = client
            .call("test.echo", json!({ "seq": i }))
            .await
            .expect("call");
        assert_eq!(result["echo"]["seq"], i);
    }
}

#[tokio::test]
async fn connection_survives_handler_errors() {
    let addr = spawn_stub().await;
    let client = RpcClient::new("stub", addr);

    assert!(client.call("test.forbidden", json!({})).await.is_err());
    let result = client.call("test.null", json!({})).await.expect("call");
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn unreachable_service_reports_internal() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    drop(listener);

    let client = RpcClient::new("stub", addr);
    let err = client.call("test.echo", json!({})).await.unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}
