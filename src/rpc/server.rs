use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{AppError, WireError};
use crate::rpc::codec::{self, Request, Response};

/// A backend service's command dispatcher. One implementation per service,
/// matching on the `<domain>.<action>` pattern.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError>;
}

/// Accept loop: one task per gateway connection, frames handled in order.
pub async fn serve(listener: TcpListener, handler: Arc<dyn Handler>) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "rpc server listening");
    loop {
        let (stream, peer) = listener.accept().await?;
        let handler = handler.clone();
        tokio::spawn(async move {
            debug!(%peer, "connection accepted");
            if let Err(e) = serve_connection(stream, handler).await {
                debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }
}

async fn serve_connection(stream: TcpStream, handler: Arc<dyn Handler>) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(write_half);

    while let Some(request) = codec::read_frame::<_, Request>(&mut reader).await? {
        let Request { id, cmd, payload } = request;
        let started = Instant::now();
        let response = match handler.handle(&cmd, payload).await {
            Ok(result) => {
                info!(
                    %cmd,
                    request_id = %id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "handled"
                );
                Response::ok(id, result)
            }
            Err(err) => {
                warn!(
                    %cmd,
                    request_id = %id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "handler failed"
                );
                Response::err(id, WireError::from(&err))
            }
        };
        codec::write_frame(&mut writer, &response).await?;
    }
    Ok(())
}

/// Shared fallback for commands no service claims.
pub fn unknown_cmd(cmd: &str) -> AppError {
    AppError::NotFound(format!("No handler for command {cmd}"))
}

/// Deserializes a command payload, reporting malformed input as BadRequest.
pub fn parse_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload).map_err(|e| AppError::BadRequest(format!("Invalid payload: {e}")))
}

/// Serializes a handler result back onto the wire.
pub fn to_value<T: serde::Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("serialize response: {e}")))
}
