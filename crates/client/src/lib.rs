//! Client side of the file service.
//!
//! [`WsClient`] speaks the JSON envelope protocol over WebSocket with
//! request-response correlation; the [`driver`] functions implement the
//! user-facing operations (list, copy, remove) on top of it.

mod driver;
mod pumps;
mod ws_client;

pub use driver::{copy, list, receive_file, remove, send_file};
pub use ws_client::WsClient;

use std::path::PathBuf;

use tokio_tungstenite::tungstenite;

/// Errors from the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timed out")]
    Timeout,

    #[error("connection closed")]
    Closed,

    #[error("server error {code}: {message}")]
    Remote { code: i32, message: String },

    #[error("{0}")]
    Usage(String),

    #[error("local file not found: {0}")]
    LocalNotFound(PathBuf),

    #[error("protocol error: {0}")]
    Protocol(String),
}
