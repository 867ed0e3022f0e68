//! Elm compiler integration.
//!
//! The compiler is an external executable. Before the first compile it must be
//! initialized: the executable has to be present and the project needs an
//! `elm.json`. [`ElmToolchain::init`] performs that step and is the only way
//! to obtain an [`ElmCompiler`], so an uninitialized compiler cannot reach the
//! pipeline.

use super::layout::ProjectLayout;
use crate::error::BuildError;
use async_trait::async_trait;
use elmdev_config::CompilerConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Stage name used in notifications for the Elm compiler.
pub const ELM_STAGE: &str = "elm";

/// Manifest the Elm compiler requires at the project root.
pub const ELM_MANIFEST: &str = "elm.json";

/// A failed compile, carrying the raw compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage}: {message}")]
pub struct CompileError {
    pub stage: String,
    pub message: String,
}

/// Result of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// Bundle written, or `None` when there was nothing to compile
    pub bundle: Option<PathBuf>,
    /// Number of source modules handed to the compiler
    pub modules: usize,
    /// Size of the bundle in bytes
    pub bytes: u64,
}

impl CompileReport {
    pub fn empty() -> Self {
        Self {
            bundle: None,
            modules: 0,
            bytes: 0,
        }
    }
}

/// Compiles a set of sources into a single bundle.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Stage name reported when compilation fails.
    fn name(&self) -> &str;

    /// Compile `sources` into the bundle at `output`.
    ///
    /// The output must be left untouched when compilation fails.
    async fn compile(&self, sources: &[PathBuf], output: &Path)
        -> Result<CompileReport, CompileError>;
}

/// Entry point for initializing the Elm toolchain.
pub struct ElmToolchain;

impl ElmToolchain {
    /// Verify the compiler and make sure the project has an `elm.json`.
    ///
    /// When the manifest is missing and `auto_init` is set, runs
    /// `<program> init`, accepting its prompt, and points the new manifest's
    /// `source-directories` at the Elm source directory.
    ///
    /// # Errors
    ///
    /// - `BuildError::ToolchainNotFound` if the program cannot be spawned
    /// - `BuildError::InitFailed` if version check or `init` fails, or the
    ///   manifest is missing and `auto_init` is off
    pub async fn init(
        config: &CompilerConfig,
        layout: &ProjectLayout,
    ) -> Result<ElmCompiler, BuildError> {
        let version = Self::version(&config.program, &layout.root).await?;
        tracing::debug!("{} version {}", config.program, version);

        let manifest = layout.root.join(ELM_MANIFEST);
        if !manifest.is_file() {
            if !config.auto_init {
                return Err(BuildError::InitFailed(format!(
                    "no {} in {}; run `{} init` or enable compiler.auto_init",
                    ELM_MANIFEST,
                    layout.root.display(),
                    config.program
                )));
            }
            Self::create_manifest(&config.program, layout).await?;
        }

        Ok(ElmCompiler {
            program: config.program.clone(),
            root: layout.root.clone(),
            version,
        })
    }

    async fn version(program: &str, root: &Path) -> Result<String, BuildError> {
        let output = Command::new(program)
            .arg("--version")
            .current_dir(root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| BuildError::ToolchainNotFound {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(BuildError::InitFailed(format!(
                "`{} --version` exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn create_manifest(program: &str, layout: &ProjectLayout) -> Result<(), BuildError> {
        tracing::info!("no {} found, running `{} init`", ELM_MANIFEST, program);

        let mut child = Command::new(program)
            .arg("init")
            .current_dir(&layout.root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::ToolchainNotFound {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A closed pipe just means init did not prompt.
            let _ = stdin.write_all(b"Y\n").await;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| BuildError::InitFailed(e.to_string()))?;

        let manifest = layout.root.join(ELM_MANIFEST);
        if !output.status.success() || !manifest.is_file() {
            return Err(BuildError::InitFailed(format!(
                "`{} init` did not create {}: {}",
                program,
                ELM_MANIFEST,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        point_manifest_at_sources(&manifest, layout).await
    }
}

/// Rewrite `source-directories` so modules under the Elm source directory
/// resolve without a directory prefix in their module names.
async fn point_manifest_at_sources(
    manifest: &Path,
    layout: &ProjectLayout,
) -> Result<(), BuildError> {
    let source_dir = layout
        .elm_dir
        .strip_prefix(&layout.root)
        .unwrap_or(&layout.elm_dir)
        .to_string_lossy()
        .replace('\\', "/");

    let content = tokio::fs::read_to_string(manifest)
        .await
        .map_err(|e| BuildError::InitFailed(format!("cannot read {}: {}", ELM_MANIFEST, e)))?;

    let mut json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| BuildError::InitFailed(format!("invalid {}: {}", ELM_MANIFEST, e)))?;

    if let Some(obj) = json.as_object_mut() {
        obj.insert(
            "source-directories".to_string(),
            serde_json::Value::from(vec![source_dir]),
        );
    }

    let pretty = serde_json::to_string_pretty(&json)
        .map_err(|e| BuildError::InitFailed(e.to_string()))?;
    tokio::fs::write(manifest, pretty + "\n")
        .await
        .map_err(|e| BuildError::InitFailed(format!("cannot write {}: {}", ELM_MANIFEST, e)))
}

/// An initialized Elm compiler.
#[derive(Debug, Clone)]
pub struct ElmCompiler {
    program: String,
    root: PathBuf,
    version: String,
}

impl ElmCompiler {
    /// Compiler version reported during initialization.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Compiler for ElmCompiler {
    fn name(&self) -> &str {
        ELM_STAGE
    }

    async fn compile(
        &self,
        sources: &[PathBuf],
        output: &Path,
    ) -> Result<CompileReport, CompileError> {
        let failure = |message: String| CompileError {
            stage: ELM_STAGE.to_string(),
            message,
        };

        let result = Command::new(&self.program)
            .arg("make")
            .args(sources)
            .arg("--output")
            .arg(output)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| failure(format!("failed to run {}: {}", self.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let message = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&result.stdout).into_owned()
            } else {
                stderr.into_owned()
            };
            return Err(failure(message));
        }

        let bytes = tokio::fs::metadata(output)
            .await
            .map(|m| m.len())
            .unwrap_or_default();

        Ok(CompileReport {
            bundle: Some(output.to_path_buf()),
            modules: sources.len(),
            bytes,
        })
    }
}
