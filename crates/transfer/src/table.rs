use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// An open file handle with its transfer direction.
pub(crate) enum TransferHandle {
    Writer(File),
    Reader(File),
}

/// Table entry: the handle plus the time of its last chunk.
pub(crate) struct OpenTransfer {
    handle: TransferHandle,
    last_activity: Instant,
}

impl OpenTransfer {
    pub(crate) fn is_reader(&self) -> bool {
        matches!(self.handle, TransferHandle::Reader(_))
    }

    pub(crate) fn is_writer(&self) -> bool {
        matches!(self.handle, TransferHandle::Writer(_))
    }
}

/// Tracks which paths currently have a transfer in progress.
///
/// Invariant: an entry for `path` exists iff a transfer for `path` is
/// open. The whole table sits behind one mutex; engine operations hold
/// it for the duration of a single bounded disk read or write, which
/// gives the per-path mutual exclusion the chunk protocol requires.
pub(crate) struct TransferTable {
    inner: Mutex<TableInner>,
}

pub(crate) struct TableInner {
    open: HashMap<PathBuf, OpenTransfer>,
    /// Paths whose handle was evicted by the idle sweep. The next call
    /// referencing one of these reports the abort, then clears the mark.
    aborted: HashSet<PathBuf>,
}

impl TransferTable {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(TableInner {
                open: HashMap::new(),
                aborted: HashSet::new(),
            }),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, TableInner> {
        self.inner.lock().unwrap()
    }

    pub(crate) fn open_count(&self) -> usize {
        self.lock().open.len()
    }

    /// Closes and evicts every handle idle longer than `max_idle`,
    /// marking its path aborted. Returns the evicted paths.
    pub(crate) fn sweep_idle(&self, max_idle: Duration) -> Vec<PathBuf> {
        let mut inner = self.lock();
        let now = Instant::now();
        let stale: Vec<PathBuf> = inner
            .open
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_activity) > max_idle)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            inner.open.remove(path);
            inner.aborted.insert(path.clone());
        }
        stale
    }
}

impl TableInner {
    /// Clears and reports an abort mark left by the idle sweep.
    pub(crate) fn take_aborted(&mut self, path: &Path) -> bool {
        self.aborted.remove(path)
    }

    pub(crate) fn get(&self, path: &Path) -> Option<&OpenTransfer> {
        self.open.get(path)
    }

    pub(crate) fn insert(&mut self, path: PathBuf, handle: TransferHandle) {
        self.open.insert(
            path,
            OpenTransfer {
                handle,
                last_activity: Instant::now(),
            },
        );
    }

    /// Closes the handle and removes the entry (the terminating chunk).
    pub(crate) fn remove(&mut self, path: &Path) {
        self.open.remove(path);
    }

    /// Appends a block to the open write handle for `path`.
    ///
    /// Precondition (ensured by the engine): a writer is registered.
    pub(crate) fn append(&mut self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(entry) = self.open.get_mut(path) {
            if let TransferHandle::Writer(file) = &mut entry.handle {
                file.write_all(data)?;
                entry.last_activity = Instant::now();
            }
        }
        Ok(())
    }

    /// Reads the next block, up to `max` bytes, from the open read
    /// handle for `path`. An empty result means end of file.
    ///
    /// Precondition (ensured by the engine): a reader is registered.
    pub(crate) fn read_block(&mut self, path: &Path, max: usize) -> std::io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max];
        let mut filled = 0;
        if let Some(entry) = self.open.get_mut(path) {
            if let TransferHandle::Reader(file) = &mut entry.handle {
                // A single read may return short even before EOF; keep
                // going until the block is full or the file ends.
                loop {
                    let n = file.read(&mut buf[filled..])?;
                    if n == 0 {
                        break;
                    }
                    filled += n;
                    if filled == max {
                        break;
                    }
                }
                entry.last_activity = Instant::now();
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer_handle(dir: &Path, name: &str) -> TransferHandle {
        TransferHandle::Writer(File::create(dir.join(name)).unwrap())
    }

    #[test]
    fn insert_and_remove_tracks_open_count() {
        let tmp = tempfile::tempdir().unwrap();
        let table = TransferTable::new();
        let path = tmp.path().join("a.bin");

        {
            let mut inner = table.lock();
            inner.insert(path.clone(), writer_handle(tmp.path(), "a.bin"));
            assert!(inner.get(&path).is_some());
        }
        assert_eq!(table.open_count(), 1);

        table.lock().remove(&path);
        assert_eq!(table.open_count(), 0);
    }

    #[test]
    fn sweep_evicts_only_idle_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let table = TransferTable::new();
        let path = tmp.path().join("a.bin");
        table
            .lock()
            .insert(path.clone(), writer_handle(tmp.path(), "a.bin"));

        // Fresh entry survives a generous threshold.
        assert!(table.sweep_idle(Duration::from_secs(60)).is_empty());
        assert_eq!(table.open_count(), 1);

        // Zero threshold evicts it and leaves the abort mark.
        let evicted = table.sweep_idle(Duration::ZERO);
        assert_eq!(evicted, vec![path.clone()]);
        assert_eq!(table.open_count(), 0);

        let mut inner = table.lock();
        assert!(inner.take_aborted(&path));
        // The mark is consumed on first read.
        assert!(!inner.take_aborted(&path));
    }

    #[test]
    fn append_then_read_block_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let table = TransferTable::new();
        let path = tmp.path().join("data.bin");

        {
            let mut inner = table.lock();
            inner.insert(path.clone(), writer_handle(tmp.path(), "data.bin"));
            inner.append(&path, b"hello world").unwrap();
            inner.remove(&path);
        }

        {
            let mut inner = table.lock();
            inner.insert(
                path.clone(),
                TransferHandle::Reader(File::open(&path).unwrap()),
            );
            let block = inner.read_block(&path, 5).unwrap();
            assert_eq!(&block, b"hello");
            let block = inner.read_block(&path, 64).unwrap();
            assert_eq!(&block, b" world");
            let block = inner.read_block(&path, 64).unwrap();
            assert!(block.is_empty());
        }
    }

    #[test]
    fn direction_predicates() {
        let tmp = tempfile::tempdir().unwrap();
        let w = OpenTransfer {
            handle: writer_handle(tmp.path(), "w.bin"),
            last_activity: Instant::now(),
        };
        assert!(w.is_writer());
        assert!(!w.is_reader());
    }
}
