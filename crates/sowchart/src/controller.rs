//! The selection controller: the root of the viewer.
//!
//! The controller owns the current selection. Selecting a product updates the
//! page (active card, title), drives the [`RenderAdapter`], then enables the
//! export controls. Export requests are checked against the selection and
//! delegated to the [`ExportPipeline`].
//!
//! ```text
//! NoSelection ──select_product──▶ Selected ──select_product──▶ Selected
//! ```

use std::sync::Arc;

use log::{debug, error, info};
use parking_lot::Mutex;
use serde::Deserialize;

use sowchart_core::{
    corpus::{Corpus, DiagramRecord},
    theme::Theme,
};

use crate::{
    config::{AppConfig, ValidationError},
    export::{
        Clock, DirectoryTarget, Download, DownloadTarget, Downloader, ExportError, ExportPipeline,
        SnapshotOptions, Snapshotter, SystemClock,
    },
    notice::{LogNotifier, Notice, Notifier},
    readiness::EngineReady,
    render::{DiagramEngine, RenderAdapter, RenderOutcome},
    view::{DisplayRegion, Page, SharedPage, SharedRegion},
};

/// When the export controls become enabled after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportGate {
    /// As soon as the selection's render call returns, whatever its outcome.
    #[default]
    OnRenderIssued,
    /// Only once a render has put a diagram in the region.
    OnRenderSuccess,
}

/// The one piece of mutable domain state.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current_product: Option<DiagramRecord>,
}

impl SelectionState {
    pub fn current_product(&self) -> Option<&DiagramRecord> {
        self.current_product.as_ref()
    }
}

/// Collects the controller's collaborators before launch.
pub struct ControllerBuilder {
    corpus: Arc<Corpus>,
    theme: Theme,
    snapshot_options: SnapshotOptions,
    viewport_width: u32,
    narrow_breakpoint: u32,
    export_gate: ExportGate,
    target: Arc<dyn DownloadTarget>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl ControllerBuilder {
    /// Starts from `config`; downloads go to the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an invalid theme, scale or background.
    pub fn new(corpus: Arc<Corpus>, config: &AppConfig) -> Result<Self, ValidationError> {
        let snapshot_options = SnapshotOptions {
            scale: config.export().validated_scale()?,
            background: config.export().background()?.to_rgb8(),
        };

        Ok(Self {
            corpus,
            theme: config.theme().to_theme()?,
            snapshot_options,
            viewport_width: config.view().viewport_width(),
            narrow_breakpoint: config.view().narrow_breakpoint(),
            export_gate: config.view().export_gate(),
            target: Arc::new(DirectoryTarget::new(config.export().output_dir())),
            notifier: Arc::new(LogNotifier),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_download_target(mut self, target: Arc<dyn DownloadTarget>) -> Self {
        self.target = target;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_export_gate(mut self, gate: ExportGate) -> Self {
        self.export_gate = gate;
        self
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Waits for the engine, then sets up the page.
    ///
    /// The renderer is initialized with whatever `ready` resolves to, the
    /// product cards are built from the corpus, and the placeholder is shown.
    /// Export controls start disabled.
    pub async fn launch<E, S>(
        self,
        ready: EngineReady<E>,
        snapshotter: Option<S>,
    ) -> SelectionController<E, S>
    where
        E: DiagramEngine,
        S: Snapshotter,
    {
        let engine = ready.wait().await;

        let region = DisplayRegion::shared();
        let renderer = RenderAdapter::initialize(region.clone(), engine, &self.theme);

        let mut page = Page::new(self.viewport_width, self.narrow_breakpoint);
        page.render_cards(&self.corpus);
        let page = Arc::new(Mutex::new(page));

        let exporter = ExportPipeline::new(
            region.clone(),
            snapshotter,
            Downloader::new(self.target),
            self.notifier.clone(),
            self.clock,
            self.snapshot_options,
        );

        renderer.show_placeholder();
        info!(products = self.corpus.len(); "Sowchart initialized successfully");

        SelectionController {
            corpus: self.corpus,
            selection: Mutex::new(SelectionState::default()),
            page,
            region,
            renderer,
            exporter,
            notifier: self.notifier,
            export_gate: self.export_gate,
        }
    }
}

/// Owns the selection and keeps the page consistent with it.
pub struct SelectionController<E, S> {
    corpus: Arc<Corpus>,
    selection: Mutex<SelectionState>,
    page: SharedPage,
    region: SharedRegion,
    renderer: RenderAdapter<E>,
    exporter: ExportPipeline<S>,
    notifier: Arc<dyn Notifier>,
    export_gate: ExportGate,
}

impl<E, S> SelectionController<E, S>
where
    E: DiagramEngine,
    S: Snapshotter,
{
    /// Selects the product `id` and renders its flowchart.
    ///
    /// Returns `None`, after logging, when `id` is not in the corpus; nothing
    /// else changes in that case.
    pub async fn select_product(&self, id: &str) -> Option<RenderOutcome> {
        let Some(product) = self.corpus.find_by_id(id).cloned() else {
            error!(product_id = id; "Product not found");
            return None;
        };

        info!(product_id = id; "Product selected");
        self.selection.lock().current_product = Some(product.clone());
        {
            let mut page = self.page.lock();
            page.mark_active(product.id());
            page.set_title_for(product.name());
        }

        let outcome = self.renderer.render(product.diagram_source()).await;

        let enable = match self.export_gate {
            ExportGate::OnRenderIssued => true,
            ExportGate::OnRenderSuccess => outcome.is_rendered(),
        };

        let mut page = self.page.lock();
        if enable {
            page.enable_exports();
        }
        if page.is_narrow() {
            debug!("Closing product panel on narrow viewport");
            page.close_side_panel();
        }

        Some(outcome)
    }

    /// Exports the current product's diagram as SVG.
    ///
    /// # Errors
    ///
    /// [`ExportError::NoSelection`] before any selection (the user is
    /// prompted), otherwise the pipeline's errors.
    pub fn export_vector(&self) -> Result<Download, ExportError> {
        let name = self.require_selection()?;
        self.exporter.export_vector(&name)
    }

    /// Exports the current product's diagram as PNG.
    ///
    /// # Errors
    ///
    /// As [`Self::export_vector`], plus snapshot failures.
    pub async fn export_raster(&self) -> Result<Download, ExportError> {
        let name = self.require_selection()?;
        self.exporter.export_raster(&name).await
    }

    fn require_selection(&self) -> Result<String, ExportError> {
        let name = self
            .selection
            .lock()
            .current_product()
            .map(|product| product.name().to_string());

        name.ok_or_else(|| {
            self.notifier.notify(Notice::SelectProductFirst);
            ExportError::NoSelection
        })
    }

    pub fn current_product(&self) -> Option<DiagramRecord> {
        self.selection.lock().current_product().cloned()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Snapshot of the page.
    pub fn page(&self) -> Page {
        self.page.lock().clone()
    }

    /// Snapshot of the display region.
    pub fn region(&self) -> DisplayRegion {
        self.region.lock().clone()
    }

    pub fn renderer(&self) -> &RenderAdapter<E> {
        &self.renderer
    }

    pub fn exporter(&self) -> &ExportPipeline<S> {
        &self.exporter
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.page.lock().set_viewport_width(width);
    }

    pub fn open_side_panel(&self) {
        self.page.lock().open_side_panel();
    }
}
