//! Watching the backing profile file.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the profile watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Profile file was written or replaced
    Modified(PathBuf),

    /// Profile file was deleted
    Removed(PathBuf),
}

/// Watches one profile file for changes.
///
/// A burst of events, such as a truncate followed by a write, is reported
/// once, after the file has been quiet for 100ms.
///
/// The parent directory is watched rather than the file, so editors that
/// save by writing a new file and renaming it over the old one are seen.
pub struct ProfileWatcher {
    _watcher: RecommendedWatcher,
}

impl ProfileWatcher {
    /// Create a watcher for `profile`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        profile: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let target = profile.to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            let quiet = Duration::from_millis(100);
            let mut pending: Option<WatchEvent> = None;

            loop {
                // Hold the latest event until the file has been quiet for a while
                let next = match pending {
                    Some(_) => sync_rx.recv_timeout(quiet),
                    None => sync_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                match next {
                    Ok(event) => {
                        if let Some(watch_event) = event
                            .paths
                            .iter()
                            .filter(|path| same_file_name(path, &target))
                            .find_map(|_| classify_event(&target, &event.kind))
                        {
                            pending = Some(watch_event);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(watch_event) = pending.take() {
                            if async_tx.blocking_send(watch_event).is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn same_file_name(path: &Path, target: &Path) -> bool {
    path.file_name().is_some() && path.file_name() == target.file_name()
}

/// Classify a notify event into a WatchEvent.
fn classify_event(target: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Modified(target.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(target.to_path_buf())),
        _ => None,
    }
}
