//! Verbatim copy of HTML pages into the output directory.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Stage name used in notifications for the HTML copy.
pub const HTML_STAGE: &str = "html";

/// One copied page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Copy `sources` into `out_dir`, keeping file names and bytes.
///
/// Existing files with the same name are overwritten; nothing else in
/// `out_dir` is touched.
pub async fn copy_into(sources: &[PathBuf], out_dir: &Path) -> Result<Vec<CopiedFile>, BuildError> {
    ensure_dir(out_dir).await?;

    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let destination = out_dir.join(name);

        let bytes = tokio::fs::copy(source, &destination)
            .await
            .map_err(|e| BuildError::CopyFailed {
                file: source.clone(),
                source: e,
            })?;

        tracing::debug!("copied {} -> {}", source.display(), destination.display());
        copied.push(CopiedFile {
            source: source.clone(),
            destination,
            bytes,
        });
    }

    Ok(copied)
}

/// Create the output directory if needed.
pub async fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|_| BuildError::OutputNotWritable(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn copies_bytes_and_overwrites_same_name() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(src.join("index.html"), "<h1>new</h1>").unwrap();
        fs::write(out.join("index.html"), "<h1>old</h1>").unwrap();

        let copied = copy_into(&[src.join("index.html")], &out).await.unwrap();

        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].bytes, 12);
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "<h1>new</h1>");
    }

    #[tokio::test]
    async fn creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("page.html");
        fs::write(&src, "x").unwrap();
        let out = dir.path().join("public/nested");

        copy_into(&[src], &out).await.unwrap();
        assert!(out.join("page.html").is_file());
    }

    #[tokio::test]
    async fn missing_source_is_a_copy_failure() {
        let dir = TempDir::new().unwrap();
        let err = copy_into(&[dir.path().join("gone.html")], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::CopyFailed { .. }));
    }
}
