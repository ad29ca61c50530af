//! User-facing operations built on [`WsClient`].
//!
//! `copy` mirrors scp-style addressing: a path on exactly one side of
//! the transfer carries the `remote:` prefix.

use std::io::Read;
use std::path::{Path, PathBuf};

use filebay_protocol::MessageType;
use filebay_protocol::constants::CHUNK_SIZE;
use filebay_protocol::envelope::Message;
use filebay_protocol::messages::{
    DownloadChunkRequest, DownloadChunkResponse, ListRequest, ListResponse, RemoveRequest,
    RemoveResponse, UploadChunkRequest,
};

use crate::{ClientError, WsClient};

/// Marks a path as living on the server.
pub const REMOTE_PREFIX: &str = "remote:";

/// Lists the server directory at `path` (the base directory if `None`),
/// one entry per line.
pub async fn list(client: &WsClient, path: Option<&str>) -> Result<String, ClientError> {
    let req = ListRequest {
        path: path.unwrap_or_default().to_string(),
    };
    let resp = client.send_request(MessageType::List, Some(&req)).await?;
    let payload: ListResponse = required_payload(&resp)?;
    Ok(payload.entries.join("\n"))
}

/// Removes the given server paths, returning one status line per path.
pub async fn remove(client: &WsClient, paths: &[String]) -> Result<String, ClientError> {
    if paths.is_empty() {
        return Err(ClientError::Usage("no paths given".into()));
    }
    let req = RemoveRequest {
        paths: paths.to_vec(),
    };
    let resp = client.send_request(MessageType::Remove, Some(&req)).await?;
    let payload: RemoveResponse = required_payload(&resp)?;
    Ok(payload.results.join("\n"))
}

/// Copies `source` to `dest`, where exactly one of the two carries the
/// [`REMOTE_PREFIX`]. Returns a human-readable summary.
pub async fn copy(client: &WsClient, source: &str, dest: &str) -> Result<String, ClientError> {
    match (
        source.strip_prefix(REMOTE_PREFIX),
        dest.strip_prefix(REMOTE_PREFIX),
    ) {
        (Some(remote_src), None) => {
            let local = receive_file(client, remote_src, Path::new(dest)).await?;
            Ok(format!("downloaded {remote_src} to {}", local.display()))
        }
        (None, Some(remote_dir)) => {
            send_file(client, Path::new(source), remote_dir).await?;
            Ok(format!("uploaded {source} to {remote_dir}"))
        }
        (Some(_), Some(_)) => Err(ClientError::Usage(
            "only one side of the copy may be remote".into(),
        )),
        (None, None) => Err(ClientError::Usage(
            format!("one side of the copy must carry the {REMOTE_PREFIX} prefix"),
        )),
    }
}

/// Uploads the file at `local` into the server directory `remote_dir`
/// (empty string for the base directory).
///
/// The file is sent in bounded chunks followed by an empty terminating
/// chunk.
pub async fn send_file(
    client: &WsClient,
    local: &Path,
    remote_dir: &str,
) -> Result<(), ClientError> {
    let name = source_file_name(local)?;

    let mut file = std::fs::File::open(local)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        let req = UploadChunkRequest {
            path: remote_dir.to_string(),
            name: name.clone(),
            data: buf[..n].to_vec(),
        };
        client
            .send_request(MessageType::UploadChunk, Some(&req))
            .await?;
        // The empty chunk doubles as the end-of-stream marker.
        if n == 0 {
            tracing::debug!(file = %local.display(), "upload finished");
            return Ok(());
        }
    }
}

/// Downloads the server file at `remote_path` into the local directory
/// `local_dir`, returning the path written.
///
/// The destination file is only created once the first chunk arrives, so
/// a missing remote file leaves nothing behind.
pub async fn receive_file(
    client: &WsClient,
    remote_path: &str,
    local_dir: &Path,
) -> Result<PathBuf, ClientError> {
    let name = remote_path
        .rsplit('/')
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ClientError::Usage(format!("not a file path: {remote_path}")))?;
    let dest = local_dir.join(name);

    let mut file: Option<std::fs::File> = None;
    loop {
        let req = DownloadChunkRequest {
            path: remote_path.to_string(),
        };
        let resp = client
            .send_request(MessageType::DownloadChunk, Some(&req))
            .await?;
        let payload: DownloadChunkResponse = required_payload(&resp)?;

        if file.is_none() {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            file = Some(std::fs::File::create(&dest)?);
        }

        if payload.data.is_empty() {
            tracing::debug!(file = %dest.display(), "download finished");
            return Ok(dest);
        }
        use std::io::Write;
        if let Some(f) = file.as_mut() {
            f.write_all(&payload.data)?;
        }
    }
}

/// Validates an upload source and extracts its file name.
///
/// A missing path and an existing non-file path (directory, socket) get
/// distinct errors.
fn source_file_name(local: &Path) -> Result<String, ClientError> {
    if !local.exists() {
        return Err(ClientError::LocalNotFound(local.to_path_buf()));
    }
    if !local.is_file() {
        return Err(ClientError::Usage(format!(
            "not a regular file: {}",
            local.display()
        )));
    }
    local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClientError::Usage(format!("not a file path: {}", local.display())))
}

/// Extracts a reply payload that the protocol requires to be present.
fn required_payload<T: for<'de> serde::Deserialize<'de>>(msg: &Message) -> Result<T, ClientError> {
    msg.parse_payload::<T>()?
        .ok_or_else(|| ClientError::Protocol(format!("missing payload in {:?} reply", msg.msg_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_payload_rejects_empty_reply() {
        let msg = Message::new::<()>("m1", MessageType::ListResponse, None).unwrap();
        let result: Result<ListResponse, _> = required_payload(&msg);
        assert!(matches!(result, Err(ClientError::Protocol(_))));
    }

    #[test]
    fn required_payload_parses_reply() {
        let resp = ListResponse {
            entries: vec!["a".into()],
        };
        let msg = Message::new("m1", MessageType::ListResponse, Some(&resp)).unwrap();
        let parsed: ListResponse = required_payload(&msg).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn source_validation_distinguishes_missing_from_directory() {
        let tmp = tempfile::tempdir().unwrap();

        let err = source_file_name(&tmp.path().join("ghost.txt")).unwrap_err();
        assert!(matches!(err, ClientError::LocalNotFound(_)));

        // The directory exists, so the error must not claim it is missing.
        let err = source_file_name(tmp.path()).unwrap_err();
        match err {
            ClientError::Usage(msg) => assert!(msg.contains("not a regular file")),
            other => panic!("unexpected error: {other:?}"),
        }

        let file = tmp.path().join("real.txt");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(source_file_name(&file).unwrap(), "real.txt");
    }

    #[test]
    fn remote_prefix_parsing() {
        assert_eq!("remote:docs/a.txt".strip_prefix(REMOTE_PREFIX), Some("docs/a.txt"));
        assert_eq!("docs/a.txt".strip_prefix(REMOTE_PREFIX), None);
    }
}
