use std::path::Path;

use filebay_transfer::validate_relative;

use crate::FileOpsError;

/// Removes each path under `base`, returning one status line per input
/// in the same order.
///
/// A failure on one path never aborts the batch; its status line carries
/// the error instead.
pub fn remove_paths(base: &Path, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|rel| match remove_one(base, rel) {
            Ok(line) => line,
            Err(FileOpsError::InvalidPath(msg)) => format!("invalid path: {msg}"),
            Err(FileOpsError::NotFound(_)) => format!("not found: {rel}"),
            Err(FileOpsError::Io(e)) => {
                tracing::warn!(path = rel, error = %e, "removal failed");
                format!("error removing {rel}: {e}")
            }
        })
        .collect()
}

fn remove_one(base: &Path, rel: &str) -> Result<String, FileOpsError> {
    validate_relative(rel).map_err(|e| FileOpsError::InvalidPath(e.to_string()))?;
    let target = base.join(rel);

    let meta = std::fs::symlink_metadata(&target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FileOpsError::NotFound(target.clone())
        } else {
            FileOpsError::Io(e)
        }
    })?;

    if meta.is_dir() {
        std::fs::remove_dir_all(&target)?;
        tracing::debug!(path = %target.display(), "removed directory");
        Ok(format!("removed directory: {rel}"))
    } else {
        std::fs::remove_file(&target)?;
        tracing::debug!(path = %target.display(), "removed file");
        Ok(format!("removed file: {rel}"))
    }
}
