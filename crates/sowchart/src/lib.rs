//! Sowchart - a viewer for pre-authored product flowcharts.
//!
//! A user picks a product, its Mermaid flowchart is rendered into a single
//! display region, and the rendered diagram can be exported as a standalone
//! SVG or a 2x PNG named `<slug>-flowchart-<YYYY-MM-DD>.<ext>`.
//!
//! # Components
//!
//! - [`corpus`] - the immutable table of products (re-exported from `sowchart-core`)
//! - [`render`] - the render adapter and the diagram engines behind it
//! - [`export`] - the SVG/PNG export pipeline and download delivery
//! - [`controller`] - the selection controller tying everything together
//! - [`view`] - the page and display region state a front end draws
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sowchart::{
//!     config::AppConfig,
//!     controller::ControllerBuilder,
//!     corpus::Corpus,
//!     export::ResvgSnapshotter,
//!     readiness::EngineReady,
//!     render::{Engine, NativeEngine},
//! };
//!
//! # async fn demo() -> Result<(), sowchart::SowchartError> {
//! let corpus = Arc::new(Corpus::bundled()?);
//! let controller = ControllerBuilder::new(corpus, &AppConfig::default())?
//!     .launch(
//!         EngineReady::resolved(Some(Engine::Native(NativeEngine::new()))),
//!         Some(ResvgSnapshotter::new()),
//!     )
//!     .await;
//!
//! controller.select_product("nao").await;
//! let download = controller.export_vector()?;
//! println!("saved {}", download.location.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod export;
pub mod notice;
pub mod readiness;
pub mod render;
pub mod view;

mod error;

pub use sowchart_core::{color, corpus, filename, theme};

pub use error::{FailureKind, SowchartError};
