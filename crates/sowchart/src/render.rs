//! Rendering of diagram source into the display region.
//!
//! The [`RenderAdapter`] wraps a [`DiagramEngine`] and owns every write to
//! the [`DisplayRegion`](crate::view::DisplayRegion): placeholder, loading
//! affordance, rendered diagram, or error state.
//!
//! # States
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──render──▶ Rendering ──▶ Ready
//!                                                    │
//!                                                    └─ failure (shown in region) ─▶ Ready
//! ```
//!
//! An adapter initialized without an engine stays `Uninitialized`; its
//! renders only put an error message in the region.

mod command;
mod native;

pub use command::CommandEngine;
pub use native::NativeEngine;

use std::{
    future::Future,
    io,
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

use chrono::Utc;
use log::{debug, error, info};
use thiserror::Error;

use sowchart_core::theme::Theme;

use crate::view::{
    ENGINE_UNAVAILABLE_MESSAGE, Occupant, RENDER_FAILED_MESSAGE, RenderedDiagram, SharedRegion,
};

/// Failures reported by a diagram engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Diagram source rejected: {0}")]
    Syntax(String),

    #[error("Engine I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Engine task failed: {0}")]
    Task(String),

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}

/// A diagram layout/rendering engine.
///
/// Engines key their work by the diagram id they are given, so every call
/// must use a fresh id.
pub trait DiagramEngine {
    /// Applies the application-wide theme. Called once, before any render.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the engine cannot use the theme.
    fn configure(&mut self, theme: &Theme) -> Result<(), EngineError>;

    /// Lays out `source` and returns SVG markup.
    fn render(
        &self,
        diagram_id: &str,
        source: &str,
    ) -> impl Future<Output = Result<String, EngineError>>;
}

/// The engines selectable through configuration.
#[derive(Debug)]
pub enum Engine {
    Native(NativeEngine),
    Command(CommandEngine),
}

impl DiagramEngine for Engine {
    fn configure(&mut self, theme: &Theme) -> Result<(), EngineError> {
        match self {
            Self::Native(engine) => engine.configure(theme),
            Self::Command(engine) => engine.configure(theme),
        }
    }

    async fn render(&self, diagram_id: &str, source: &str) -> Result<String, EngineError> {
        match self {
            Self::Native(engine) => engine.render(diagram_id, source).await,
            Self::Command(engine) => engine.render(diagram_id, source).await,
        }
    }
}

/// Lifecycle state of a [`RenderAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Ready,
    Rendering,
}

/// Terminal result of one [`RenderAdapter::render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The diagram now occupies the region.
    Rendered { diagram_id: String },
    /// The engine failed; the region shows an error state.
    Failed,
    /// A newer write replaced the region before this render finished; its
    /// result was discarded.
    Superseded,
    /// The adapter has no engine.
    Unavailable,
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Decrements the in-flight counter however the render future ends.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives a [`DiagramEngine`] into a shared display region.
#[derive(Debug)]
pub struct RenderAdapter<E> {
    region: SharedRegion,
    engine: Option<E>,
    in_flight: AtomicUsize,
    sequence: AtomicU64,
}

impl<E: DiagramEngine> RenderAdapter<E> {
    /// Binds `region` and configures `engine` with `theme`.
    ///
    /// A missing engine, or one that rejects the theme, is logged and leaves
    /// the adapter [`AdapterState::Uninitialized`].
    pub fn initialize(region: SharedRegion, engine: Option<E>, theme: &Theme) -> Self {
        let engine = match engine {
            Some(mut engine) => match engine.configure(theme) {
                Ok(()) => {
                    debug!(curve = theme.curve.as_str(); "Diagram engine configured");
                    Some(engine)
                }
                Err(err) => {
                    error!(err:err; "Diagram engine rejected configuration");
                    None
                }
            },
            None => {
                error!("Diagram engine not loaded");
                None
            }
        };

        Self {
            region,
            engine,
            in_flight: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> AdapterState {
        if self.engine.is_none() {
            AdapterState::Uninitialized
        } else if self.in_flight.load(Ordering::SeqCst) > 0 {
            AdapterState::Rendering
        } else {
            AdapterState::Ready
        }
    }

    /// Renders `source` into the region.
    ///
    /// Failures never propagate: they are logged, shown in the region, and
    /// reported through the returned [`RenderOutcome`].
    pub async fn render(&self, source: &str) -> RenderOutcome {
        let Some(engine) = &self.engine else {
            error!("Renderer not initialized");
            self.region
                .lock()
                .claim(Occupant::Error(ENGINE_UNAVAILABLE_MESSAGE.to_string()));
            return RenderOutcome::Unavailable;
        };

        let token = self.region.lock().claim(Occupant::Loading);
        let diagram_id = self.next_diagram_id();
        let _in_flight = InFlight::enter(&self.in_flight);

        debug!(diagram_id = diagram_id.as_str(); "Rendering diagram");
        let (occupant, outcome) = match engine.render(&diagram_id, source).await {
            Ok(svg) => (
                Occupant::Diagram(RenderedDiagram::new(diagram_id.clone(), svg)),
                RenderOutcome::Rendered {
                    diagram_id: diagram_id.clone(),
                },
            ),
            Err(err) => {
                error!(diagram_id = diagram_id.as_str(), err:err; "Error rendering flowchart");
                (
                    Occupant::Error(RENDER_FAILED_MESSAGE.to_string()),
                    RenderOutcome::Failed,
                )
            }
        };

        let settled = self.region.lock().settle(token, occupant);
        if !settled {
            debug!(diagram_id = diagram_id.as_str(); "Discarding superseded render");
            return RenderOutcome::Superseded;
        }

        if outcome.is_rendered() {
            info!(diagram_id = diagram_id.as_str(); "Diagram rendered");
        }
        outcome
    }

    /// Shows the "nothing selected yet" affordance.
    pub fn show_placeholder(&self) {
        self.region.lock().claim(Occupant::Placeholder);
    }

    /// Empties the region.
    pub fn clear(&self) {
        self.region.lock().clear();
    }

    /// Returns a diagram id that has never been handed to the engine.
    fn next_diagram_id(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        format!(
            "sowchart-diagram-{}-{sequence}",
            Utc::now().timestamp_millis()
        )
    }
}
