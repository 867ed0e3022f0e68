//! Integration tests for the asset pipeline.
//!
//! A fake compiler stands in for the Elm toolchain; it concatenates its
//! sources into the bundle, or fails when a source contains `BROKEN`.

use async_trait::async_trait;
use elmdev_cli::pipeline::{
    CompileError, CompileReport, Compiler, Pipeline, PipelineEvent, ProjectLayout,
    RecordingNotifier,
};
use elmdev_config::{PathsConfig, WatchConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{sleep, timeout, Duration};

#[derive(Default)]
struct FakeCompiler {
    calls: AtomicUsize,
}

#[async_trait]
impl Compiler for FakeCompiler {
    fn name(&self) -> &str {
        "elm"
    }

    async fn compile(
        &self,
        sources: &[PathBuf],
        output: &Path,
    ) -> Result<CompileReport, CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut bundle = String::new();
        for source in sources {
            let text = fs::read_to_string(source).unwrap();
            if text.contains("BROKEN") {
                return Err(CompileError {
                    stage: "elm".to_string(),
                    message: format!("-- PARSE ERROR ---- {}", source.display()),
                });
            }
            bundle.push_str(&text);
        }

        fs::write(output, &bundle).unwrap();
        Ok(CompileReport {
            bundle: Some(output.to_path_buf()),
            modules: sources.len(),
            bytes: bundle.len() as u64,
        })
    }
}

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    compiler: Arc<FakeCompiler>,
    notifier: Arc<RecordingNotifier>,
    pipeline: Arc<Pipeline>,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    fs::create_dir_all(root.join("src/html")).unwrap();
    fs::create_dir_all(root.join("src/elm")).unwrap();

    let compiler = Arc::new(FakeCompiler::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let layout = ProjectLayout::new(&root, &PathsConfig::default());
    let pipeline = Arc::new(Pipeline::new(layout, compiler.clone(), notifier.clone()));

    Fixture {
        _temp: temp,
        root,
        compiler,
        notifier,
        pipeline,
    }
}

#[tokio::test]
async fn test_html_is_copied_byte_for_byte() {
    let fx = fixture();
    let page = "<!doctype html>\n<script src=\"elm-app.js\"></script>\n";
    fs::write(fx.root.join("src/html/index.html"), page).unwrap();
    fs::write(fx.root.join("src/html/about.html"), "<p>about</p>").unwrap();
    fs::write(fx.root.join("src/html/notes.txt"), "not a page").unwrap();

    let copied = fx.pipeline.copy_html().await.unwrap();

    assert_eq!(copied.len(), 2);
    assert_eq!(
        fs::read_to_string(fx.root.join("public/index.html")).unwrap(),
        page
    );
    assert!(fx.root.join("public/about.html").is_file());
    assert!(!fx.root.join("public/notes.txt").exists());
}

#[tokio::test]
async fn test_html_copy_leaves_other_output_alone() {
    let fx = fixture();
    fs::create_dir_all(fx.root.join("public")).unwrap();
    fs::write(fx.root.join("public/old.html"), "stale").unwrap();
    fs::write(fx.root.join("src/html/index.html"), "fresh").unwrap();

    fx.pipeline.copy_html().await.unwrap();

    assert_eq!(
        fs::read_to_string(fx.root.join("public/old.html")).unwrap(),
        "stale"
    );
}

#[tokio::test]
async fn test_build_writes_bundle_and_pages() {
    let fx = fixture();
    fs::write(fx.root.join("src/elm/Main.elm"), "module Main exposing (main)\n").unwrap();
    fs::write(fx.root.join("src/elm/Api.elm"), "module Api exposing (..)\n").unwrap();
    fs::write(fx.root.join("src/html/index.html"), "<html></html>").unwrap();

    let outcome = fx.pipeline.build().await;

    assert!(outcome.is_success());
    assert_eq!(outcome.cycle, 1);
    let report = outcome.compile.unwrap();
    assert_eq!(report.modules, 2);
    assert!(fx.root.join("public/elm-app.js").is_file());
    assert!(fx.root.join("public/index.html").is_file());
    assert!(fx.notifier.notifications().is_empty());
    assert!(fx.pipeline.status().is_success());
}

#[tokio::test]
async fn test_build_is_idempotent() {
    let fx = fixture();
    fs::write(fx.root.join("src/elm/Main.elm"), "module Main exposing (main)\n").unwrap();
    fs::write(fx.root.join("src/html/index.html"), "<html></html>").unwrap();

    fx.pipeline.build().await;
    let first = fs::read(fx.root.join("public/elm-app.js")).unwrap();
    fx.pipeline.build().await;
    let second = fs::read(fx.root.join("public/elm-app.js")).unwrap();

    assert_eq!(first, second);
    assert_eq!(fx.pipeline.cycles(), 2);
}

#[tokio::test]
async fn test_compile_failure_is_notified_with_stage() {
    let fx = fixture();
    fs::write(fx.root.join("src/elm/Main.elm"), "module Main BROKEN").unwrap();
    fs::write(fx.root.join("src/html/index.html"), "<html></html>").unwrap();

    let outcome = fx.pipeline.build().await;

    assert!(!outcome.is_success());
    // The other stage still ran.
    assert!(outcome.html.is_ok());
    assert!(fx.root.join("public/index.html").is_file());

    let notifications = fx.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Build error in elm");
    assert!(notifications[0].message.contains("PARSE ERROR"));

    let status = fx.pipeline.status();
    assert_eq!(status.failures().len(), 1);
    assert_eq!(status.failures()[0].stage, "elm");
}

#[tokio::test]
async fn test_compile_failure_keeps_previous_bundle() {
    let fx = fixture();
    let main = fx.root.join("src/elm/Main.elm");
    fs::write(&main, "module Main exposing (main)\n").unwrap();
    fx.pipeline.compile_and_bundle().await.unwrap();
    let good = fs::read(fx.root.join("public/elm-app.js")).unwrap();

    fs::write(&main, "module Main BROKEN").unwrap();
    assert!(fx.pipeline.compile_and_bundle().await.is_err());

    assert_eq!(fs::read(fx.root.join("public/elm-app.js")).unwrap(), good);
}

#[tokio::test]
async fn test_no_elm_sources_skips_compiler() {
    let fx = fixture();

    let report = fx.pipeline.compile_and_bundle().await.unwrap();

    assert_eq!(report.bundle, None);
    assert_eq!(fx.compiler.calls.load(Ordering::SeqCst), 0);
    assert!(!fx.root.join("public/elm-app.js").exists());
}

#[tokio::test]
async fn test_missing_source_dirs_are_stage_errors() {
    let fx = fixture();
    fs::remove_dir_all(fx.root.join("src/elm")).unwrap();
    fs::remove_dir_all(fx.root.join("src/html")).unwrap();

    let outcome = fx.pipeline.build().await;

    let stages: Vec<_> = outcome.failures().into_iter().map(|f| f.stage).collect();
    assert_eq!(stages, vec!["elm", "html"]);

    let titles: Vec<_> = fx
        .notifier
        .notifications()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert!(titles.contains(&"Build error in elm".to_string()));
    assert!(titles.contains(&"Build error in html".to_string()));
}

#[tokio::test]
async fn test_build_publishes_events() {
    let fx = fixture();
    let mut events = fx.pipeline.subscribe();

    fx.pipeline.build().await;

    assert_eq!(
        events.recv().await.unwrap(),
        PipelineEvent::BuildStarted { cycle: 1 }
    );
    assert!(matches!(
        events.recv().await.unwrap(),
        PipelineEvent::BuildCompleted { cycle: 1, .. }
    ));
}

#[tokio::test]
async fn test_watch_rebuilds_on_new_page() {
    let fx = fixture();
    let mut events = fx.pipeline.subscribe();
    let subscription = fx.pipeline.watch(&WatchConfig::default()).unwrap();
    assert!(subscription.is_active());

    fs::write(fx.root.join("src/html/new.html"), "<p>new</p>").unwrap();

    let event = timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("no rebuild after creating a page")
        .unwrap();
    assert!(matches!(event, PipelineEvent::BuildStarted { .. }));

    timeout(Duration::from_secs(10), async {
        while !fx.root.join("public/new.html").is_file() {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("page was not copied");
}

#[tokio::test]
async fn test_watch_ignores_unrelated_files() {
    let fx = fixture();
    let _subscription = fx.pipeline.watch(&WatchConfig::default()).unwrap();

    fs::write(fx.root.join("src/styles.css"), "body {}").unwrap();
    fs::create_dir_all(fx.root.join("src/.cache")).unwrap();
    fs::write(fx.root.join("src/.cache/Main.elm"), "module Main").unwrap();
    sleep(Duration::from_millis(500)).await;

    assert_eq!(fx.pipeline.cycles(), 0);
}

#[tokio::test]
async fn test_stopped_watch_no_longer_rebuilds() {
    let fx = fixture();
    let subscription = fx.pipeline.watch(&WatchConfig::default()).unwrap();
    subscription.stop();

    fs::write(fx.root.join("src/elm/Main.elm"), "module Main exposing (main)").unwrap();
    sleep(Duration::from_millis(500)).await;

    assert_eq!(fx.pipeline.cycles(), 0);
}
