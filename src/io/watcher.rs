use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::io::store::{Snapshot, read_document};

/// A live feed of document snapshots.
///
/// Holds the underlying watcher (if any) for as long as the subscription lives.
pub struct Subscription {
    _watcher: Option<RecommendedWatcher>,
    rx: mpsc::Receiver<Snapshot>,
}

impl Subscription {
    /// A subscription fed by some other sender (in-process stores).
    pub fn from_channel(rx: mpsc::Receiver<Snapshot>) -> Self {
        Subscription { _watcher: None, rx }
    }

    /// Non-blocking poll for pending snapshots, oldest first (may be empty).
    pub fn poll(&self) -> Vec<Snapshot> {
        let mut snapshots = Vec::new();
        while let Ok(snapshot) = self.rx.try_recv() {
            snapshots.push(snapshot);
        }
        snapshots
    }

    /// Only the most recent pending snapshot, discarding older ones.
    pub fn latest(&self) -> Option<Snapshot> {
        self.poll().pop()
    }
}

/// Watch the document at `path`, queueing `initial` as the first snapshot.
///
/// The parent directory is watched rather than the file, because writers
/// replace the file by rename and a file watch would stop at the old inode.
pub fn watch_document(path: &Path, initial: Snapshot) -> Result<Subscription, notify::Error> {
    let (tx, rx) = mpsc::channel();
    let _ = tx.send(initial);

    let doc_path = path.to_path_buf();
    let file_name: Option<OsString> = path.file_name().map(|n| n.to_os_string());
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| {
            let event = match result {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "document watch error");
                    return;
                }
            };

            match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                _ => return,
            }

            let touches_document = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if !touches_document {
                return;
            }

            match read_document(&doc_path) {
                Ok(snapshot) => {
                    debug!(path = %doc_path.display(), "document changed");
                    let _ = tx.send(snapshot);
                }
                Err(e) => warn!(error = %e, "skipping unreadable snapshot"),
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(Subscription {
        _watcher: Some(watcher),
        rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_keeps_only_newest() {
        let (tx, rx) = mpsc::channel();
        let sub = Subscription::from_channel(rx);
        tx.send(None).unwrap();
        tx.send(Some(Default::default())).unwrap();
        assert_eq!(sub.latest(), Some(Some(Default::default())));
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn poll_on_empty_channel() {
        let (_tx, rx) = mpsc::channel::<Snapshot>();
        let sub = Subscription::from_channel(rx);
        assert!(sub.poll().is_empty());
    }
}
