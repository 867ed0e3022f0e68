//! Shared utilities for command implementations.
//!
//! - Project root resolution
//! - Configuration loading and validation
//! - Notifier selection
//! - Toolchain initialization behind a spinner

use crate::error::{BuildError, CliError, Result};
use crate::pipeline::{
    ConsoleNotifier, DesktopNotifier, ElmCompiler, ElmToolchain, Notifier, Pipeline,
    ProjectLayout, StageError,
};
use crate::ui;
use elmdev_config::{DevkitConfig, NotifyConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A project root with its validated configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: DevkitConfig,
    pub layout: ProjectLayout,
}

impl Project {
    /// Resolve the root, then load and validate its configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the root is not a directory or the configuration
    /// cannot be loaded or is invalid.
    pub fn load(cwd: Option<&Path>, config_file: Option<&Path>) -> Result<Self> {
        let root = resolve_root(cwd)?;
        let config = DevkitConfig::load(&root, config_file)?;
        Self::from_config(root, config)
    }

    /// Build a project from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the configuration is invalid.
    pub fn from_config(root: PathBuf, config: DevkitConfig) -> Result<Self> {
        config.validate()?;
        let layout = ProjectLayout::new(&root, &config.paths);
        tracing::debug!("project root: {}", root.display());

        Ok(Self {
            root,
            config,
            layout,
        })
    }

    /// Override the server port, re-validating the result.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the new port makes the proxy point back
    /// at the dev server.
    pub fn with_port(mut self, port: Option<u16>) -> Result<Self> {
        if let Some(port) = port {
            self.config.server.port = port;
            self.config.validate()?;
        }
        Ok(self)
    }
}

/// Resolve the project root: `--cwd` when given, else the current directory.
///
/// # Errors
///
/// Returns `CliError::FileNotFound` if the directory does not exist.
pub fn resolve_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let root = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !root.is_dir() {
        return Err(CliError::FileNotFound(root));
    }

    Ok(std::fs::canonicalize(&root).unwrap_or(root))
}

/// Notifier for build failures, per the `notify` section.
pub fn notifier(config: &NotifyConfig) -> Arc<dyn Notifier> {
    if config.desktop {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(ConsoleNotifier)
    }
}

/// Initialize the Elm toolchain with a spinner.
///
/// # Errors
///
/// Returns `CliError::Build` if the compiler is missing or `init` fails.
pub async fn init_compiler(project: &Project) -> Result<ElmCompiler> {
    let spinner = ui::Spinner::new(&format!(
        "Initializing {}...",
        project.config.compiler.program
    ));

    match ElmToolchain::init(&project.config.compiler, &project.layout).await {
        Ok(compiler) => {
            spinner.finish(&format!("Elm {} ready", compiler.version()));
            Ok(compiler)
        }
        Err(e) => {
            spinner.fail("Compiler initialization failed");
            Err(e.into())
        }
    }
}

/// Initialize the toolchain and assemble the pipeline.
///
/// # Errors
///
/// Returns error if toolchain initialization fails.
pub async fn pipeline(project: &Project) -> Result<Arc<Pipeline>> {
    let compiler = init_compiler(project).await?;

    Ok(Arc::new(Pipeline::new(
        project.layout.clone(),
        Arc::new(compiler),
        notifier(&project.config.notify),
    )))
}

/// Turn recovered stage failures into an error for the exit status.
pub fn stage_failures(failures: Vec<StageError>) -> CliError {
    let mut failures = failures.into_iter();
    let Some(first) = failures.next() else {
        return CliError::Custom("build failed".to_string());
    };

    let error = failures.fold(first, |acc, next| StageError {
        stage: format!("{}, {}", acc.stage, next.stage),
        message: format!("{}\n\n{}", acc.message.trim_end(), next.message),
    });
    BuildError::from(error).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_root_uses_explicit_dir() {
        let dir = TempDir::new().unwrap();
        let root = resolve_root(Some(dir.path())).unwrap();
        assert_eq!(root, fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_resolve_root_rejects_missing_dir() {
        let result = resolve_root(Some(Path::new("/definitely/not/here")));
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_with_port_revalidates() {
        let dir = TempDir::new().unwrap();
        let project = Project::from_config(dir.path().to_path_buf(), DevkitConfig::default())
            .unwrap();

        // Default proxy target is localhost:8000.
        let result = project.with_port(Some(8000));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_with_port_none_keeps_config() {
        let dir = TempDir::new().unwrap();
        let project = Project::from_config(dir.path().to_path_buf(), DevkitConfig::default())
            .unwrap()
            .with_port(None)
            .unwrap();
        assert_eq!(project.config.server.port, 8080);
    }

    #[test]
    fn test_layout_is_resolved_against_root() {
        let dir = TempDir::new().unwrap();
        let project = Project::from_config(dir.path().to_path_buf(), DevkitConfig::default())
            .unwrap();
        assert_eq!(project.layout.elm_dir, dir.path().join("src/elm"));
        assert_eq!(project.layout.bundle_path, dir.path().join("public/elm-app.js"));
    }

    #[test]
    fn test_stage_failures_are_combined() {
        let err = stage_failures(vec![
            StageError::new("elm", "bad module"),
            StageError::new("html", "missing dir"),
        ]);
        match err {
            CliError::Build(BuildError::StageFailed { stage, message }) => {
                assert_eq!(stage, "elm, html");
                assert!(message.contains("bad module"));
                assert!(message.contains("missing dir"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
