use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of payload bytes moved by a single chunk call.
///
/// Both the engine's reads and the driver's local reads are bounded by
/// this; an empty chunk is reserved as the end-of-stream marker.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Maximum WebSocket message size in bytes (1 MiB).
///
/// A full chunk is ~85 KiB once base64-encoded, so this leaves generous
/// headroom for the JSON envelope around it.
pub const WS_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Time to wait for a pong response (or any incoming message).
///
/// Acts as a read deadline: if nothing at all arrives within this window
/// the connection is considered dead.
pub const WS_PONG_WAIT: Duration = Duration::from_secs(60);

/// How often to send pings (must be well under [`WS_PONG_WAIT`]).
pub const WS_PING_PERIOD: Duration = Duration::from_secs(5);

/// Timeout for a single request/response round-trip.
///
/// Each chunk call performs one bounded disk read or write on the server,
/// so even transfers of large files never need a longer per-call timeout.
pub const WS_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message type identifier in the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    // Requests from client to server
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "list")]
    List,
    #[serde(rename = "upload_chunk")]
    UploadChunk,
    #[serde(rename = "download_chunk")]
    DownloadChunk,
    #[serde(rename = "remove")]
    Remove,

    // Responses from server to client
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "list_response")]
    ListResponse,
    #[serde(rename = "upload_chunk_response")]
    UploadChunkResponse,
    #[serde(rename = "download_chunk_response")]
    DownloadChunkResponse,
    #[serde(rename = "remove_response")]
    RemoveResponse,
    #[serde(rename = "error")]
    Error,

    /// Forward compatibility: unknown message types deserialize here.
    #[serde(other)]
    Unknown,
}

/// Common RPC error codes.
pub const RPC_ERR_CODE_BAD_REQUEST: i32 = 400;
pub const RPC_ERR_CODE_NOT_FOUND: i32 = 404;
pub const RPC_ERR_CODE_CONFLICT: i32 = 409;
pub const RPC_ERR_CODE_ABORTED: i32 = 410;
pub const RPC_ERR_CODE_INTERNAL: i32 = 500;
pub const RPC_ERR_CODE_NOT_IMPLEMENTED: i32 = 501;
