//! Asset pipeline.
//!
//! Turns the source tree into browser-servable files in the output directory:
//! - compiles the Elm modules into a single bundle
//! - copies HTML pages verbatim
//! - rebuilds on source changes while a watch subscription is alive
//!
//! A failing stage never aborts the process. It is reported through the
//! [`Notifier`] and recorded in the [`BuildOutcome`]; the previous output
//! stays in place.

pub mod compiler;
pub mod html;
pub mod layout;
pub mod notifier;
pub mod state;
pub mod watcher;

pub use compiler::{
    CompileError, CompileReport, Compiler, ElmCompiler, ElmToolchain, ELM_MANIFEST, ELM_STAGE,
};
pub use html::{CopiedFile, HTML_STAGE};
pub use layout::ProjectLayout;
pub use notifier::{ConsoleNotifier, DesktopNotifier, Notification, Notifier, RecordingNotifier};
pub use state::{BuildState, BuildStatus};
pub use watcher::{FileChange, FileWatcher};

use crate::error::{BuildError, Result};
use crate::ui;
use elmdev_config::WatchConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A failed stage: its name and the raw error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

impl StageError {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

impl From<CompileError> for StageError {
    fn from(err: CompileError) -> Self {
        Self::new(err.stage, err.message)
    }
}

impl From<StageError> for BuildError {
    fn from(err: StageError) -> Self {
        BuildError::StageFailed {
            stage: err.stage,
            message: err.message,
        }
    }
}

/// Events published for every build cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    BuildStarted { cycle: u64 },
    BuildCompleted { cycle: u64, duration_ms: u64 },
    BuildFailed { cycle: u64, failures: Vec<StageError> },
}

/// Result of one build cycle. Each stage succeeds or fails on its own.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub cycle: u64,
    pub duration_ms: u64,
    pub compile: std::result::Result<CompileReport, StageError>,
    pub html: std::result::Result<Vec<CopiedFile>, StageError>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.compile.is_ok() && self.html.is_ok()
    }

    pub fn failures(&self) -> Vec<StageError> {
        let mut failures = Vec::new();
        if let Err(e) = &self.compile {
            failures.push(e.clone());
        }
        if let Err(e) = &self.html {
            failures.push(e.clone());
        }
        failures
    }
}

/// The asset pipeline for one project.
///
/// Holds an initialized compiler, so constructing a pipeline implies the
/// compiler's init step already ran.
pub struct Pipeline {
    layout: ProjectLayout,
    compiler: Arc<dyn Compiler>,
    notifier: Arc<dyn Notifier>,
    state: BuildState,
    events: broadcast::Sender<PipelineEvent>,
}

impl Pipeline {
    pub fn new(
        layout: ProjectLayout,
        compiler: Arc<dyn Compiler>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            layout,
            compiler,
            notifier,
            state: BuildState::new(),
            events,
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn status(&self) -> BuildStatus {
        self.state.status()
    }

    /// Number of build cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.state.cycles()
    }

    /// Receive events for cycles started after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Copy the HTML pages into the output directory.
    ///
    /// Failures are notified under the `html` stage before being returned.
    pub async fn copy_html(&self) -> std::result::Result<Vec<CopiedFile>, StageError> {
        copy_html_pages(&self.layout, self.notifier.as_ref()).await
    }

    /// Compile every Elm module into the bundle.
    ///
    /// With no modules nothing is written and an empty report is returned.
    /// Failures are notified under the compiler's stage name before being
    /// returned; the previous bundle is left as it was.
    pub async fn compile_and_bundle(&self) -> std::result::Result<CompileReport, StageError> {
        let stage = self.compiler.name().to_string();

        let sources = match self.layout.elm_sources() {
            Ok(sources) => sources,
            Err(e) => return Err(self.report(StageError::new(stage, e.to_string()))),
        };
        if sources.is_empty() {
            tracing::info!("no Elm modules in {}", self.layout.elm_dir.display());
            return Ok(CompileReport::empty());
        }

        if let Err(e) = html::ensure_dir(&self.layout.out_dir).await {
            return Err(self.report(StageError::new(stage, e.to_string())));
        }

        tracing::debug!("compiling {} module(s)", sources.len());
        self.compiler
            .compile(&sources, &self.layout.bundle_path)
            .await
            .map_err(|e| self.report(e.into()))
    }

    /// Run one cycle: compile and copy concurrently, then record the outcome.
    pub async fn build(&self) -> BuildOutcome {
        let cycle = self.state.start();
        self.publish(PipelineEvent::BuildStarted { cycle });
        let started = Instant::now();

        let (compile, html) = tokio::join!(self.compile_and_bundle(), self.copy_html());

        let outcome = BuildOutcome {
            cycle,
            duration_ms: started.elapsed().as_millis() as u64,
            compile,
            html,
        };

        if outcome.is_success() {
            self.state.succeed(cycle, outcome.duration_ms);
            ui::success(&format!(
                "Build completed in {}",
                ui::format_duration(started.elapsed())
            ));
            self.publish(PipelineEvent::BuildCompleted {
                cycle,
                duration_ms: outcome.duration_ms,
            });
        } else {
            let failures = outcome.failures();
            let stages: Vec<_> = failures.iter().map(|f| f.stage.as_str()).collect();
            ui::warning(&format!("Build failed in {}", stages.join(", ")));
            self.state.fail(cycle, failures.clone());
            self.publish(PipelineEvent::BuildFailed { cycle, failures });
        }

        outcome
    }

    /// Rebuild on every relevant change under the watch directory.
    ///
    /// Changes that queue up while a build runs are folded into the next
    /// build. Event delivery stops when the returned subscription is stopped
    /// or dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the watch directory is missing or the OS watcher
    /// cannot be created.
    pub fn watch(self: &Arc<Self>, config: &WatchConfig) -> Result<WatchSubscription> {
        let (watcher, mut changes) = FileWatcher::new(
            self.layout.watch_dir.clone(),
            config.extensions.clone(),
            config.debounce_ms,
        )?;
        let root = watcher.root().to_path_buf();

        let pipeline = Arc::clone(self);
        let task = tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                let mut coalesced = 0usize;
                while changes.try_recv().is_ok() {
                    coalesced += 1;
                }

                ui::info(&format!("File changed: {}", change.path().display()));
                if coalesced > 0 {
                    tracing::debug!("{} more change(s) folded into this build", coalesced);
                }

                pipeline.build().await;
            }
            tracing::debug!("watch channel closed");
        });

        Ok(WatchSubscription {
            watcher: Some(watcher),
            task,
            root,
        })
    }

    fn report(&self, error: StageError) -> StageError {
        self.notifier
            .notify(&Notification::build_error(&error.stage, &error.message));
        error
    }

    fn publish(&self, event: PipelineEvent) {
        if let Ok(json) = serde_json::to_string(&event) {
            tracing::debug!(event = %json, "pipeline event");
        }
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Copy the HTML pages of `layout` into its output directory.
///
/// Usable without an initialized compiler. Failures are notified under the
/// `html` stage before being returned.
pub async fn copy_html_pages(
    layout: &ProjectLayout,
    notifier: &dyn Notifier,
) -> std::result::Result<Vec<CopiedFile>, StageError> {
    let copied = match layout.html_sources() {
        Ok(sources) => html::copy_into(&sources, &layout.out_dir).await,
        Err(e) => Err(e),
    };

    copied.map_err(|e| {
        let error = StageError::new(HTML_STAGE, e.to_string());
        notifier.notify(&Notification::build_error(&error.stage, &error.message));
        error
    })
}

/// Handle for a running watch. Dropping it stops the watch.
pub struct WatchSubscription {
    watcher: Option<FileWatcher>,
    task: JoinHandle<()>,
    root: PathBuf,
}

impl WatchSubscription {
    /// Directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the rebuild task is still running.
    pub fn is_active(&self) -> bool {
        self.watcher.is_some() && !self.task.is_finished()
    }

    /// Stop event delivery and the rebuild task.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.watcher.take().is_some() {
            tracing::debug!("stopped watching {}", self.root.display());
        }
        self.task.abort();
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_string(&PipelineEvent::BuildStarted { cycle: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"BuildStarted","cycle":3}"#);

        let json = serde_json::to_string(&PipelineEvent::BuildFailed {
            cycle: 1,
            failures: vec![StageError::new("elm", "oops")],
        })
        .unwrap();
        assert!(json.contains(r#""type":"BuildFailed""#));
        assert!(json.contains(r#""stage":"elm""#));
    }

    #[test]
    fn outcome_collects_failures_in_stage_order() {
        let outcome = BuildOutcome {
            cycle: 1,
            duration_ms: 0,
            compile: Err(StageError::new("elm", "a")),
            html: Err(StageError::new("html", "b")),
        };
        assert!(!outcome.is_success());
        let stages: Vec<_> = outcome.failures().into_iter().map(|f| f.stage).collect();
        assert_eq!(stages, vec!["elm", "html"]);
    }

    #[test]
    fn stage_error_converts_to_build_error() {
        let err: BuildError = StageError::new("elm", "bad").into();
        assert!(matches!(err, BuildError::StageFailed { ref stage, .. } if stage == "elm"));
    }
}
