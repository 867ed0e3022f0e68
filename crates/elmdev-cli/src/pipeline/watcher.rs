//! File system watcher with debouncing.
//!
//! Watches the source tree recursively and forwards changes to files with a
//! recognized extension, skipping hidden files and directories.

use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive watcher over a source directory.
///
/// Dropping the watcher stops event delivery and closes the channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to watch recursively
    /// * `extensions` - Extensions (without the dot) that count as changes
    /// * `debounce_ms` - Same-path events closer than this are dropped
    ///
    /// # Errors
    ///
    /// Returns error if `root` does not exist or the OS watcher fails
    pub fn new(
        root: PathBuf,
        extensions: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }
        // Events arrive with the canonical path of the watched root.
        let root = std::fs::canonicalize(&root).unwrap_or(root);

        let (tx, rx) = mpsc::channel(100);

        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let root_clone = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("watch error: {}", e);
                    return;
                }
            };

            for path in &event.paths {
                if !Self::is_relevant(path, &root_clone, &extensions) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                last_event = Some((path.clone(), now));

                // A full channel already guarantees a pending rebuild.
                let _ = tx.try_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Whether a change to `path` should trigger a rebuild.
    fn is_relevant(path: &Path, root: &Path, extensions: &[String]) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return false;
        };

        let hidden = rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        });
        if hidden {
            return false;
        }

        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => extensions.iter().any(|allowed| allowed == ext),
            None => false,
        }
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
