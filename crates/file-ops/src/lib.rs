//! Non-transfer filesystem operations: directory listing and removal.

mod list;
mod remove;

pub use list::list_entries;
pub use remove::remove_paths;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no such directory: {0}")]
    NotFound(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}
