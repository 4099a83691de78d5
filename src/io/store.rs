use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::io::watcher::{self, Subscription};
use crate::model::comment::CommentStore;

/// A point-in-time copy of the shared document. `None` when no document exists.
pub type Snapshot = Option<CommentStore>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse comment document: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("could not watch {path}: {source}")]
    WatchError {
        path: PathBuf,
        source: notify::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The shared document every client reads and overwrites wholesale.
///
/// There is no merge or version check: two clients doing read-modify-write at
/// the same time will lose one of the writes (last write wins).
pub trait RemoteStore {
    /// Read the whole document.
    fn read(&self) -> Result<Snapshot, StoreError>;

    /// Replace the whole document with `store`.
    fn write_all(&self, store: &CommentStore) -> Result<(), StoreError>;

    /// Subscribe to changes. The current document is delivered first, then a
    /// full snapshot after every change, including this client's own writes.
    fn subscribe(&self) -> Result<Subscription, StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed document
// ---------------------------------------------------------------------------

/// A JSON document on disk, shared by every client pointed at the same path.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemoteStore for FileStore {
    fn read(&self) -> Result<Snapshot, StoreError> {
        read_document(&self.path)
    }

    fn write_all(&self, store: &CommentStore) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(store)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(
            path = %self.path.display(),
            categories = store.len(),
            comments = store.comment_count(),
            "wrote comment document"
        );
        Ok(())
    }

    fn subscribe(&self) -> Result<Subscription, StoreError> {
        let initial = self.read()?;
        watcher::watch_document(&self.path, initial).map_err(|e| StoreError::WatchError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Read and parse the document at `path`. A missing or blank file, or a
/// literal `null`, is an absent document.
pub fn read_document(path: &Path) -> Result<Snapshot, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    parse_document(&text)
}

/// Parse document text into a snapshot.
pub fn parse_document(text: &str) -> Result<Snapshot, StoreError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<CommentStore>>(text)?)
}

/// Write via a temp file in the same directory and rename over the target,
/// so watchers never observe a half-written document.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-process document
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryInner {
    document: Snapshot,
    writes: usize,
    fail_writes: bool,
    subscribers: Vec<mpsc::Sender<Snapshot>>,
}

/// A document held in memory. Clones share the same document, so a test can
/// keep a handle while a `Session` owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(store: CommentStore) -> Self {
        let mem = Self::default();
        mem.inner.borrow_mut().document = Some(store);
        mem
    }

    pub fn document(&self) -> Snapshot {
        self.inner.borrow().document.clone()
    }

    /// Number of successful `write_all` calls.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Make subsequent writes fail (simulates an unreachable store).
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Replace the document as another client would, notifying subscribers.
    pub fn external_write(&self, store: Snapshot) {
        let mut inner = self.inner.borrow_mut();
        inner.document = store;
        notify_all(&mut inner);
    }
}

fn notify_all(inner: &mut MemoryInner) {
    let snapshot = inner.document.clone();
    inner
        .subscribers
        .retain(|tx| tx.send(snapshot.clone()).is_ok());
}

impl RemoteStore for MemoryStore {
    fn read(&self) -> Result<Snapshot, StoreError> {
        Ok(self.document())
    }

    fn write_all(&self, store: &CommentStore) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        inner.document = Some(store.clone());
        inner.writes += 1;
        notify_all(&mut inner);
        Ok(())
    }

    fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.inner.borrow_mut();
        let _ = tx.send(inner.document.clone());
        inner.subscribers.push(tx);
        Ok(Subscription::from_channel(rx))
    }
}
