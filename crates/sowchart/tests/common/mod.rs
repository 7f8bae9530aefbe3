//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use chrono::NaiveDate;
use parking_lot::Mutex;

use sowchart::{
    config::AppConfig,
    controller::{ControllerBuilder, SelectionController},
    corpus::{Corpus, DiagramRecord},
    export::{
        Blob, DownloadTarget, FixedClock, PixelBuffer, SnapshotError, SnapshotOptions, Snapshotter,
    },
    notice::{Notice, Notifier},
    readiness::EngineReady,
    render::{DiagramEngine, EngineError},
    theme::Theme,
    view::RenderedDiagram,
};

/// Sources containing this marker make [`ScriptedEngine`] fail.
pub const INVALID_MARKER: &str = "INVALID";
/// Sources containing this marker make [`ScriptedEngine`] wait before answering.
pub const SLOW_MARKER: &str = "%% slow";

pub fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

pub fn test_corpus() -> Corpus {
    Corpus::new([
        DiagramRecord::new(
            "consumer-login",
            "Consumer Login",
            "Login control flow",
            "flowchart LR\n    A[Login] --> B[Done]",
        ),
        DiagramRecord::new(
            "nao",
            "NAO",
            "New Account Opening control flow",
            "flowchart LR\n    A[Signup] --> B[Policies]",
        ),
        DiagramRecord::new("broken", "Broken Flow", "Rejected by the engine", INVALID_MARKER),
        DiagramRecord::new(
            "slow",
            "Slow Flow",
            "Takes a while to lay out",
            "flowchart TD\n    %% slow\n    A --> B",
        ),
    ])
    .unwrap()
}

/// Engine answering from the source text, recording the ids it was given.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    pub diagram_ids: Arc<Mutex<Vec<String>>>,
    pub configured_with: Arc<Mutex<Option<Theme>>>,
    pub reject_theme: bool,
    pub slow_delay: Duration,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            slow_delay: Duration::from_millis(50),
            ..Self::default()
        }
    }
}

impl DiagramEngine for ScriptedEngine {
    fn configure(&mut self, theme: &Theme) -> Result<(), EngineError> {
        if self.reject_theme {
            return Err(EngineError::Config("theme rejected".to_string()));
        }
        *self.configured_with.lock() = Some(theme.clone());
        Ok(())
    }

    async fn render(&self, diagram_id: &str, source: &str) -> Result<String, EngineError> {
        self.diagram_ids.lock().push(diagram_id.to_string());

        if source.contains(SLOW_MARKER) {
            tokio::time::sleep(self.slow_delay).await;
        }
        if source.contains(INVALID_MARKER) {
            return Err(EngineError::Syntax("unexpected token".to_string()));
        }

        let first_line = source.lines().next().unwrap_or_default();
        Ok(format!(
            r#"<svg id="{diagram_id}" width="40" height="20"><g class="root">{first_line}</g></svg>"#
        ))
    }
}

/// Snapshotter returning a fixed 2x2 white image, or failing.
#[derive(Debug, Clone, Default)]
pub struct StubSnapshotter {
    pub fail: bool,
    pub captured: Arc<Mutex<Vec<(String, SnapshotOptions)>>>,
}

impl Snapshotter for StubSnapshotter {
    async fn capture(
        &self,
        element: &RenderedDiagram,
        options: SnapshotOptions,
    ) -> Result<PixelBuffer, SnapshotError> {
        self.captured
            .lock()
            .push((element.diagram_id().to_string(), options));
        if self.fail {
            return Err(SnapshotError::Parse("canvas tainted".to_string()));
        }
        PixelBuffer::new(2, 2, vec![255; 16])
    }
}

/// Download target keeping files in memory.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    pub saved: Mutex<Vec<(String, Blob)>>,
    pub fail: bool,
}

impl MemoryTarget {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn filenames(&self) -> Vec<String> {
        self.saved.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.lock().is_empty()
    }
}

impl DownloadTarget for MemoryTarget {
    fn save(&self, filename: &str, blob: &Blob) -> io::Result<PathBuf> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
        }
        self.saved.lock().push((filename.to_string(), blob.clone()));
        Ok(Path::new("memory").join(filename))
    }
}

/// Notifier recording every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// A launched controller plus handles on its doubles.
pub struct Harness {
    pub controller: SelectionController<ScriptedEngine, StubSnapshotter>,
    pub engine: ScriptedEngine,
    pub target: Arc<MemoryTarget>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct HarnessOptions {
    pub engine: Option<ScriptedEngine>,
    pub snapshotter: Option<StubSnapshotter>,
    pub target: MemoryTarget,
    pub customize: fn(ControllerBuilder) -> ControllerBuilder,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            engine: Some(ScriptedEngine::new()),
            snapshotter: Some(StubSnapshotter::default()),
            target: MemoryTarget::default(),
            customize: |builder| builder,
        }
    }
}

pub async fn launch(options: HarnessOptions) -> Harness {
    let engine = options.engine.clone().unwrap_or_default();
    let target = Arc::new(options.target);
    let notifier = Arc::new(RecordingNotifier::default());

    let builder = ControllerBuilder::new(Arc::new(test_corpus()), &AppConfig::default())
        .unwrap()
        .with_download_target(target.clone())
        .with_notifier(notifier.clone())
        .with_clock(Arc::new(FixedClock(export_date())));
    let builder = (options.customize)(builder);

    let controller = builder
        .launch(EngineReady::resolved(options.engine), options.snapshotter)
        .await;

    Harness {
        controller,
        engine,
        target,
        notifier,
    }
}

pub async fn launch_default() -> Harness {
    launch(HarnessOptions::default()).await
}
