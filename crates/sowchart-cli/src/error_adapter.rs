//! Error adapter for converting SowchartError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error gets a
//! stable code, and a help line derived from its [`FailureKind`].

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use sowchart::{FailureKind, SowchartError, export::ExportError};

/// Adapter presenting a [`SowchartError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a SowchartError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SowchartError::Io(_) => "sowchart::io",
            SowchartError::Corpus(_) => "sowchart::corpus",
            SowchartError::Config(_) | SowchartError::Validation(_) => "sowchart::config",
            SowchartError::UnknownProduct(_) => "sowchart::product",
            SowchartError::Render { .. } => "sowchart::render",
            SowchartError::Export(_) => "sowchart::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match (&self.0, self.0.kind()) {
            (SowchartError::Export(ExportError::SnapshotUnavailable), _) => {
                "PNG export needs the raster snapshot support; try `--format svg` instead"
            }
            (_, Some(FailureKind::EnvironmentMissing)) => {
                "The diagram engine is unavailable; install the Mermaid CLI or set `[engine] kind = \"native\"`"
            }
            (_, Some(FailureKind::NotFound)) => "Run `sowchart list` to see the available products",
            (_, Some(FailureKind::MalformedInput)) => "Check the product's flowchart syntax",
            (_, Some(FailureKind::UserPrecondition)) => "Select a product first",
            (SowchartError::Config(_) | SowchartError::Validation(_), None) => {
                "Check the configuration file passed with `--config`"
            }
            (SowchartError::Corpus(_), None) => {
                "Check the product corpus passed with `--corpus`"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
