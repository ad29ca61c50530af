use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Lists entries of the server's base directory or a relative subpath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Relative subpath to list; empty means the base directory itself.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// One upload call: appends `data` to the in-progress transfer for
/// `path`/`name`, opening it on the first call.
///
/// An empty `data` is the end-of-stream marker and closes the transfer.
/// The `data` field is base64-encoded in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadChunkRequest {
    /// Destination directory relative to the base; empty means the base.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Destination file name.
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// One download call: requests the next chunk of the file at `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadChunkRequest {
    /// Source file path relative to the base.
    pub path: String,
}

/// Removes files or directories, one status line per path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub paths: Vec<String>,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Directory entry names, sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub entries: Vec<String>,
}

/// The next chunk of a download; empty `data` marks end of file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadChunkResponse {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Per-path removal outcomes, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub results: Vec<String>,
}

/// Serde adapter encoding byte fields as base64 strings in JSON.
mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(data).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
