//! Server-side chunked file transfer.
//!
//! A transfer is a sequence of independent chunk calls, so the state that
//! ties them together (the open file handle and its direction) lives in a
//! [`TransferEngine`]-owned table keyed by the resolved absolute path.
//! An empty chunk terminates a transfer in either direction.

mod engine;
mod resolve;
mod table;

pub use engine::TransferEngine;
pub use resolve::validate_relative;

use std::path::PathBuf;

/// Errors produced by the transfer engine.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("destination already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("no such file: {0}")]
    NotFound(PathBuf),

    #[error("a transfer in the other direction is open for {0}")]
    Busy(PathBuf),

    #[error("transfer was aborted after idle timeout: {0}")]
    Aborted(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}
