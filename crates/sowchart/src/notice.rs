//! User-facing notices.
//!
//! Failures the user must act on are surfaced through a [`Notifier`], separate
//! from diagnostic logging.

use std::fmt;

use log::warn;

/// A message shown directly to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// An export was requested before any product was selected.
    SelectProductFirst,
    /// Nothing rendered is available to export.
    NothingToExport,
    /// The raster snapshot library is missing.
    RasterUnavailable,
    /// The raster snapshot failed for an unexpected reason.
    RasterExportFailed,
    /// The produced file could not be delivered.
    DownloadFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectProductFirst => write!(f, "Please select a product first"),
            Self::NothingToExport => {
                write!(f, "No flowchart to export. Please select a product first.")
            }
            Self::RasterUnavailable => write!(
                f,
                "PNG export is currently unavailable. Please try SVG export instead."
            ),
            Self::RasterExportFailed => write!(
                f,
                "Failed to export PNG. Please try again or use SVG export instead."
            ),
            Self::DownloadFailed => write!(f, "Failed to download file. Please try again."),
        }
    }
}

/// Receives user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        warn!(notice = notice.to_string(); "User notice");
    }
}
