//! Point-to-point request/response transport between the gateway and the
//! backend services: newline-delimited JSON frames over TCP, one in-flight
//! request per connection.

pub mod client;
pub mod codec;
pub mod redact;
pub mod server;

pub use client::RpcClient;
pub use codec::{Request, Response};
pub use server::Handler;
