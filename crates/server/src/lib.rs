//! WebSocket file server.
//!
//! Accepts a single client connection at a time, dispatches JSON envelope
//! messages to a [`Handler`] trait, and manages the connection lifecycle
//! (ping/pong, graceful shutdown). [`FsHandler`] is the stock handler that
//! serves a directory tree.

mod connection;
mod fs;
mod handler;
mod server;

pub use connection::{ClientConnection, PeerMeta, Sender};
pub use fs::FsHandler;
pub use handler::{Handler, HandlerFuture};
pub use server::{FileServer, ServerConfig};

/// Send buffer capacity for the per-connection write channel.
pub const SEND_BUFFER_SIZE: usize = 256;

/// Errors produced by the file server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
