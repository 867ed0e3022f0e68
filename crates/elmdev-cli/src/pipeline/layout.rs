//! Project layout resolved against the project root.

use crate::error::BuildError;
use elmdev_config::PathsConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Absolute locations of everything the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub html_dir: PathBuf,
    pub elm_dir: PathBuf,
    pub watch_dir: PathBuf,
    pub out_dir: PathBuf,
    pub bundle_path: PathBuf,
}

impl ProjectLayout {
    /// Resolve `paths` against `root`. Absolute config paths are kept as-is.
    pub fn new(root: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        let root = root.into();
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        let out_dir = resolve(&paths.out_dir);

        Self {
            html_dir: resolve(&paths.html_dir),
            elm_dir: resolve(&paths.elm_dir),
            watch_dir: resolve(&paths.watch_dir),
            bundle_path: out_dir.join(&paths.bundle),
            out_dir,
            root,
        }
    }

    /// `*.html` files directly inside the html directory.
    pub fn html_sources(&self) -> Result<Vec<PathBuf>, BuildError> {
        collect_files(&self.html_dir, "html")
    }

    /// `*.elm` files directly inside the elm directory.
    pub fn elm_sources(&self) -> Result<Vec<PathBuf>, BuildError> {
        collect_files(&self.elm_dir, "elm")
    }
}

/// List regular files with `extension` directly inside `dir`, sorted by name.
///
/// Dotfiles are skipped, matching shell glob semantics for `*.ext`.
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::SourceDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }
        if entry.path().extension() == Some(OsStr::new(extension)) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
