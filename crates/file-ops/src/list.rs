use std::path::Path;

use filebay_transfer::validate_relative;

use crate::FileOpsError;

/// Lists the entry names in `rel` under `base`, sorted.
///
/// An empty `rel` lists the base directory itself. Entry names are bare
/// file names, not full paths.
pub fn list_entries(base: &Path, rel: &str) -> Result<Vec<String>, FileOpsError> {
    let dir = if rel.is_empty() {
        base.to_path_buf()
    } else {
        validate_relative(rel).map_err(|e| FileOpsError::InvalidPath(e.to_string()))?;
        base.join(rel)
    };

    if !dir.is_dir() {
        return Err(FileOpsError::NotFound(dir));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }
    entries.sort();

    tracing::debug!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(entries)
}
