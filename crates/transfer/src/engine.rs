use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use filebay_protocol::constants::CHUNK_SIZE;

use crate::TransferError;
use crate::resolve::validate_relative;
use crate::table::{TransferHandle, TransferTable};

/// Executes one chunk call at a time against the served directory tree.
///
/// The engine owns the base directory and the transfer table; every
/// client-supplied path is validated and resolved under the base before
/// it touches the filesystem.
pub struct TransferEngine {
    root: PathBuf,
    table: TransferTable,
}

impl TransferEngine {
    /// Creates an engine rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            table: TransferTable::new(),
        })
    }

    /// The base directory all relative paths resolve under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of transfers currently open.
    pub fn open_transfers(&self) -> usize {
        self.table.open_count()
    }

    /// Upload branch: appends `data` to the transfer for `dir`/`name`,
    /// opening it on the first call.
    ///
    /// An empty `data` is the end-of-stream marker: it closes and
    /// deregisters the handle. The first call fails with
    /// [`TransferError::AlreadyExists`] if the destination file exists.
    pub fn write_chunk(&self, dir: &str, name: &str, data: &[u8]) -> Result<(), TransferError> {
        let dest = self.resolve_dest(dir, name)?;
        let mut table = self.table.lock();

        if table.take_aborted(&dest) {
            return Err(TransferError::Aborted(dest));
        }

        match table.get(&dest) {
            Some(entry) if entry.is_reader() => return Err(TransferError::Busy(dest)),
            Some(_) => {}
            None => {
                if dest.exists() {
                    return Err(TransferError::AlreadyExists(dest));
                }
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = std::fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&dest)
                    .map_err(|e| {
                        if e.kind() == std::io::ErrorKind::AlreadyExists {
                            TransferError::AlreadyExists(dest.clone())
                        } else {
                            TransferError::Io(e)
                        }
                    })?;
                tracing::debug!(path = %dest.display(), "opened write handle");
                table.insert(dest.clone(), TransferHandle::Writer(file));
            }
        }

        if data.is_empty() {
            // End-of-stream marker: close and deregister.
            table.remove(&dest);
            tracing::debug!(path = %dest.display(), "upload complete");
            return Ok(());
        }

        table.append(&dest, data)?;
        Ok(())
    }

    /// Download branch: returns the next chunk of the file at `path`,
    /// opening a read handle on the first call.
    ///
    /// An empty result marks end of file; the handle is closed and
    /// deregistered before it is returned. The first call fails with
    /// [`TransferError::NotFound`] if the source file is missing.
    pub fn read_chunk(&self, path: &str) -> Result<Vec<u8>, TransferError> {
        let src = self.resolve_src(path)?;
        let mut table = self.table.lock();

        if table.take_aborted(&src) {
            return Err(TransferError::Aborted(src));
        }

        match table.get(&src) {
            Some(entry) if entry.is_writer() => return Err(TransferError::Busy(src)),
            Some(_) => {}
            None => {
                if !src.is_file() {
                    return Err(TransferError::NotFound(src));
                }
                let file = File::open(&src)?;
                tracing::debug!(path = %src.display(), "opened read handle");
                table.insert(src.clone(), TransferHandle::Reader(file));
            }
        }

        let block = table.read_block(&src, CHUNK_SIZE)?;
        if block.is_empty() {
            table.remove(&src);
            tracing::debug!(path = %src.display(), "download complete");
        }
        Ok(block)
    }

    /// Closes and evicts handles idle longer than `max_idle`.
    ///
    /// A later chunk call on an evicted path fails with
    /// [`TransferError::Aborted`] exactly once, after which a fresh
    /// transfer may start. Returns the number of evictions.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let evicted = self.table.sweep_idle(max_idle);
        for path in &evicted {
            tracing::warn!(path = %path.display(), "evicted idle transfer handle");
        }
        evicted.len()
    }

    fn resolve_dest(&self, dir: &str, name: &str) -> Result<PathBuf, TransferError> {
        if name.is_empty() {
            return Err(TransferError::InvalidPath("empty file name".into()));
        }
        validate_relative(name)?;
        if !dir.is_empty() {
            validate_relative(dir)?;
        }
        Ok(self.root.join(dir).join(name))
    }

    fn resolve_src(&self, path: &str) -> Result<PathBuf, TransferError> {
        validate_relative(path)?;
        Ok(self.root.join(path))
    }
}
