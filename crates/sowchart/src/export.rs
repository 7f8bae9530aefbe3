//! Export of the rendered diagram as downloadable SVG or PNG files.
//!
//! # Pipeline
//!
//! ```text
//! Display region
//!     ↓ locate element (SVG, or the marker wrapping it)
//! Standalone SVG markup  |  Raster snapshot → PNG
//!     ↓ blob
//! Object URL → anchor → DownloadTarget
//! ```
//!
//! Failures are logged, surfaced through the [`Notifier`], and returned as
//! [`ExportError`]; none of them affect the rest of the session.

mod download;
mod snapshot;

pub use download::{
    Blob, DirectoryTarget, Download, DownloadTarget, Downloader, ObjectUrl, ObjectUrlRegistry,
};
pub use snapshot::{
    MAX_DIMENSION, PixelBuffer, ResvgSnapshotter, SnapshotError, SnapshotOptions, Snapshotter,
};

use std::{io, sync::Arc};

use chrono::{NaiveDate, Utc};
use log::{error, info};
use thiserror::Error;

use sowchart_core::filename::{ExportFormat, generate_filename};

use crate::{
    error::FailureKind,
    notice::{Notice, Notifier},
    view::SharedRegion,
};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No product selected")]
    NoSelection,

    #[error("No rendered flowchart to export")]
    NothingToExport,

    #[error("Raster snapshot support is unavailable")]
    SnapshotUnavailable,

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to download `{filename}`: {source}")]
    Download {
        filename: String,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// The failure class, if the error belongs to one.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::NoSelection => Some(FailureKind::UserPrecondition),
            Self::NothingToExport => Some(FailureKind::NotFound),
            Self::SnapshotUnavailable => Some(FailureKind::EnvironmentMissing),
            Self::Snapshot(_) | Self::Encode(_) | Self::Download { .. } => None,
        }
    }
}

/// Source of the calendar date used in export filenames.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The current UTC calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Ensures the root `<svg>` element declares the SVG and XLink namespaces.
///
/// Declarations already present are left untouched. Markup without an
/// `<svg` element is returned unchanged.
///
/// # Examples
///
/// ```
/// use sowchart::export::stamp_namespaces;
///
/// let svg = stamp_namespaces(r#"<svg width="10"></svg>"#);
/// assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
/// assert!(svg.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
/// ```
pub fn stamp_namespaces(svg: &str) -> String {
    let Some(start) = svg.find("<svg") else {
        return svg.to_string();
    };
    let name_end = start + "<svg".len();
    let tag_end = start_tag_end(svg, name_end).unwrap_or(svg.len());
    let start_tag = &svg[start..tag_end];

    let mut declarations = String::new();
    if !start_tag.contains("xmlns=") {
        declarations.push_str(&format!(r#" xmlns="{SVG_NAMESPACE}""#));
    }
    if !start_tag.contains("xmlns:xlink=") {
        declarations.push_str(&format!(r#" xmlns:xlink="{XLINK_NAMESPACE}""#));
    }

    let mut stamped = String::with_capacity(svg.len() + declarations.len());
    stamped.push_str(&svg[..name_end]);
    stamped.push_str(&declarations);
    stamped.push_str(&svg[name_end..]);
    stamped
}

/// Index of the `>` closing the start tag, skipping quoted attribute values.
fn start_tag_end(svg: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, c) in svg[from..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(from + offset),
            _ => {}
        }
    }
    None
}

/// Produces export files from whatever occupies the display region.
pub struct ExportPipeline<S> {
    region: SharedRegion,
    snapshotter: Option<S>,
    downloader: Downloader,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    options: SnapshotOptions,
}

impl<S: Snapshotter> ExportPipeline<S> {
    /// Creates a pipeline reading from `region`.
    ///
    /// `snapshotter` is `None` when no raster library is available; raster
    /// exports then fail with [`ExportError::SnapshotUnavailable`].
    pub fn new(
        region: SharedRegion,
        snapshotter: Option<S>,
        downloader: Downloader,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        options: SnapshotOptions,
    ) -> Self {
        Self {
            region,
            snapshotter,
            downloader,
            notifier,
            clock,
            options,
        }
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Filename for `product_name` exported today in `format`.
    pub fn filename(&self, product_name: &str, format: ExportFormat) -> String {
        generate_filename(product_name, format.extension(), self.clock.today())
    }

    /// Exports the rendered SVG as a standalone file.
    ///
    /// # Errors
    ///
    /// [`ExportError::NothingToExport`] if no diagram is rendered, or
    /// [`ExportError::Download`] if delivery fails.
    pub fn export_vector(&self, product_name: &str) -> Result<Download, ExportError> {
        // Copy out of the region so the live display is never modified.
        let svg = self.region.lock().vector_element().map(str::to_owned);
        let Some(svg) = svg else {
            error!("No SVG element found to export");
            self.notifier.notify(Notice::NothingToExport);
            return Err(ExportError::NothingToExport);
        };

        let blob = Blob::new(
            stamp_namespaces(&svg).into_bytes(),
            ExportFormat::Svg.mime_type(),
        );
        let filename = self.filename(product_name, ExportFormat::Svg);
        self.deliver(blob, filename)
    }

    /// Exports a raster snapshot of the rendered diagram as PNG.
    ///
    /// # Errors
    ///
    /// [`ExportError::NothingToExport`] if no diagram is rendered,
    /// [`ExportError::SnapshotUnavailable`] without a snapshotter, snapshot or
    /// encoding errors, or [`ExportError::Download`].
    pub async fn export_raster(&self, product_name: &str) -> Result<Download, ExportError> {
        let element = self.region.lock().diagram_element().cloned();
        let Some(element) = element else {
            error!("No diagram found to export");
            self.notifier.notify(Notice::NothingToExport);
            return Err(ExportError::NothingToExport);
        };

        let Some(snapshotter) = &self.snapshotter else {
            error!("Raster snapshot library not loaded");
            self.notifier.notify(Notice::RasterUnavailable);
            return Err(ExportError::SnapshotUnavailable);
        };

        info!(diagram_id = element.diagram_id(); "Generating PNG");
        let png = match snapshotter.capture(&element, self.options).await {
            Ok(pixels) => pixels.encode_png().map_err(ExportError::from),
            Err(err) => Err(ExportError::from(err)),
        };
        let png = match png {
            Ok(png) => png,
            Err(err) => {
                error!(err:err; "Error exporting PNG");
                self.notifier.notify(Notice::RasterExportFailed);
                return Err(err);
            }
        };

        let blob = Blob::new(png, ExportFormat::Png.mime_type());
        let filename = self.filename(product_name, ExportFormat::Png);
        self.deliver(blob, filename)
    }

    fn deliver(&self, blob: Blob, filename: String) -> Result<Download, ExportError> {
        match self.downloader.download(blob, &filename) {
            Ok(download) => {
                info!(filename = filename.as_str(); "Successfully exported");
                Ok(download)
            }
            Err(source) => {
                error!(filename = filename.as_str(), err:err = source; "Error downloading file");
                self.notifier.notify(Notice::DownloadFailed);
                Err(ExportError::Download { filename, source })
            }
        }
    }
}

impl<S> std::fmt::Debug for ExportPipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("snapshot_available", &self.snapshotter.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
