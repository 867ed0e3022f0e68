//! elmdev - build pipeline and dev server for Elm front ends.
//!
//! The pipeline compiles every Elm module of the source tree into a single
//! bundle and copies HTML pages next to it. A watcher reruns it on change,
//! and a dev server serves the output directory while forwarding an API
//! prefix to a backend.
//!
//! # Architecture
//!
//! - [`pipeline`] - Compiler integration, HTML copy, watch and build state
//! - [`server`] - Static files plus the reverse proxy
//! - [`commands`] - One module per CLI task
//! - [`cli`] - Argument parsing
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```no_run
//! use elmdev_cli::pipeline::{ElmToolchain, Pipeline, ProjectLayout, RecordingNotifier};
//! use elmdev_config::DevkitConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> elmdev_cli::Result<()> {
//! let config = DevkitConfig::default();
//! let layout = ProjectLayout::new("/path/to/project", &config.paths);
//! let compiler = ElmToolchain::init(&config.compiler, &layout).await?;
//!
//! let pipeline = Pipeline::new(layout, Arc::new(compiler), Arc::new(RecordingNotifier::new()));
//! let outcome = pipeline.build().await;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod server;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result};
pub use pipeline::{BuildOutcome, Pipeline, PipelineEvent, StageError, WatchSubscription};
pub use server::{BoundServer, DevServer};
