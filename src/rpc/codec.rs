use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncBufRead, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::error::{AppError, WireError};

/// One command frame. `id` correlates the response and the logs on both
/// sides of the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub cmd: String,
    pub payload: Value,
}

impl Request {
    pub fn new(cmd: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            cmd: cmd.into(),
            payload,
        }
    }
}

/// Response frame: exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

impl Response {
    pub fn ok(id: Uuid, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Uuid, error: WireError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<Value, AppError> {
        match self.error {
            Some(wire) => Err(AppError::from(wire)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Writes a frame as a single JSON line and flushes it.
pub async fn write_frame<W, T>(writer: &mut W, frame: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(frame)?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads the next frame; `None` means the peer closed the connection.
pub async fn read_frame<R, T>(reader: &mut R) -> anyhow::Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }
    let frame = serde_json::from_str(line.trim_end())?;
    Ok(Some(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn request_frame_roundtrip() {
        let (client, server) = tokio::io::duplex(1024);
        let (server_read, _server_write) = tokio::io::split(server);
        let (_client_read, mut client_write) = tokio::io::split(client);

        let req = Request::new("recipe.find_by_id", json!({ "id": "abc" }));
        write_frame(&mut client_write, &req).await.expect("write");

        let mut reader = BufReader::new(server_read);
        let got: Request = read_frame(&mut reader)
            .await
            .expect("read")
            .expect("frame present");
        assert_eq!(got.id, req.id);
        assert_eq!(got.cmd, "recipe.find_by_id");
        assert_eq!(got.payload, json!({ "id": "abc" }));
    }

    #[tokio::test]
    async fn closed_stream_yields_none() {
        let (client, server) = tokio::io::duplex(64);
        drop(client);
        let (server_read, _) = tokio::io::split(server);
        let mut reader = BufReader::new(server_read);
        let got: Option<Request> = read_frame(&mut reader).await.expect("read");
        assert!(got.is_none());
    }

    #[test]
    fn error_response_maps_back_to_app_error() {
        let id = Uuid::new_v4();
        let resp = Response::err(
            id,
            WireError {
                status_code: 403,
                message: "You can only update your own recipes".into(),
            },
        );
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn null_result_is_allowed() {
        let resp = Response::ok(Uuid::new_v4(), Value::Null);
        assert_eq!(resp.into_result().expect("ok"), Value::Null);
    }
}
