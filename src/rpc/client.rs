use std::time::Instant;

use serde_json::Value;
use tokio::io::{BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::rpc::codec::{self, Request, Response};
use crate::rpc::redact::redact;

struct Conn {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

/// Client side of the service transport. Holds one lazily-established
/// persistent connection; requests are serialized through a mutex, so a
/// response always belongs to the request just written. There is no
/// timeout or retry: a failed or slow backend call propagates to the
/// original caller unchanged.
pub struct RpcClient {
    service: &'static str,
    addr: String,
    conn: Mutex<Option<Conn>>,
}

impl RpcClient {
    pub fn new(service: &'static str, addr: String) -> Self {
        Self {
            service,
            addr,
            conn: Mutex::new(None),
        }
    }

    /// Forwards one command and awaits its response, logging the exchange
    /// with a correlation id and a redacted payload.
    pub async fn call(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        let request = Request::new(cmd, payload);
        let request_id = request.id;
        let started = Instant::now();
        debug!(
            service = self.service,
            %cmd,
            %request_id,
            payload = %redact(&request.payload),
            "rpc send"
        );

        let result = self.send(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(service = self.service, %cmd, %request_id, elapsed_ms, "rpc ok"),
            Err(err) => warn!(
                service = self.service,
                %cmd,
                %request_id,
                elapsed_ms,
                error = %err,
                "rpc failed"
            ),
        }
        result
    }

    async fn send(&self, request: Request) -> Result<Value, AppError> {
        let mut guard = self.conn.lock().await;

        if guard.is_none() {
            let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
                AppError::Internal(format!("{} service unavailable: {e}", self.service))
            })?;
            let (read_half, write_half) = stream.into_split();
            *guard = Some(Conn {
                reader: BufReader::new(read_half),
                writer: BufWriter::new(write_half),
            });
        }
        let conn = match guard.as_mut() {
            Some(conn) => conn,
            None => return Err(AppError::Internal("connection not established".into())),
        };

        if let Err(e) = codec::write_frame(&mut conn.writer, &request).await {
            *guard = None;
            return Err(AppError::Internal(format!(
                "{} service write failed: {e}",
                self.service
            )));
        }

        match codec::read_frame::<_, Response>(&mut conn.reader).await {
            Ok(Some(response)) => {
                if response.id != request.id {
                    warn!(
                        service = self.service,
                        expected = %request.id,
                        got = %response.id,
                        "response correlation mismatch"
                    );
                }
                response.into_result()
            }
            Ok(None) => {
                *guard = None;
                Err(AppError::Internal(format!(
                    "{} service closed the connection",
                    self.service
                )))
            }
            Err(e) => {
                *guard = None;
                Err(AppError::Internal(format!(
                    "{} service read failed: {e}",
                    self.service
                )))
            }
        }
    }
}
