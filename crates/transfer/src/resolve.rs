use std::path::{Component, Path};

use crate::TransferError;

/// Validates that a client-supplied relative path stays under the base
/// directory it will be joined to.
///
/// Rejects:
/// - Empty paths
/// - Absolute paths (Unix `/` or Windows `C:\`)
/// - Parent directory traversal (`..`)
/// - Windows prefix components (`C:`, `\\server`)
pub fn validate_relative(path: &str) -> Result<(), TransferError> {
    if path.is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    let path = Path::new(path);

    if path.is_absolute() {
        return Err(TransferError::InvalidPath(format!(
            "absolute path not allowed: {}",
            path.display()
        )));
    }

    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(TransferError::InvalidPath(format!(
                    "parent directory traversal not allowed: {}",
                    path.display()
                )));
            }
            Component::Prefix(_) => {
                return Err(TransferError::InvalidPath(format!(
                    "path prefix not allowed: {}",
                    path.display()
                )));
            }
            Component::RootDir => {
                return Err(TransferError::InvalidPath(format!(
                    "absolute path not allowed: {}",
                    path.display()
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_path() {
        assert!(validate_relative("").is_err());
    }

    #[test]
    fn rejects_parent_dir_traversal() {
        assert!(validate_relative("../../../etc/passwd").is_err());
    }

    #[test]
    fn rejects_nested_parent_dir_traversal() {
        assert!(validate_relative("sub/../../../escape").is_err());
    }

    #[test]
    fn rejects_absolute_unix_path() {
        assert!(validate_relative("/tmp/malicious").is_err());
    }

    #[test]
    fn rejects_single_parent_dir() {
        assert!(validate_relative("..").is_err());
    }

    #[test]
    fn rejects_parent_then_file() {
        assert!(validate_relative("../file.txt").is_err());
    }

    #[test]
    fn accepts_simple_filename() {
        assert!(validate_relative("report.txt").is_ok());
    }

    #[test]
    fn accepts_subdirectory_path() {
        assert!(validate_relative("sub/dir/file.txt").is_ok());
    }

    #[test]
    fn accepts_dotfile() {
        assert!(validate_relative(".config/settings.json").is_ok());
    }

    #[test]
    fn accepts_current_dir_prefix() {
        assert!(validate_relative("./report.txt").is_ok());
    }
}
