//! Error types for Sowchart operations.
//!
//! This module provides the main error type [`SowchartError`] and the
//! [`FailureKind`] taxonomy shared by every layer. No failure is fatal to a
//! session: each one degrades a single operation.

use std::io;

use thiserror::Error;

use sowchart_core::corpus::CorpusError;

use crate::{config::ValidationError, export::ExportError};

/// Classification of user-visible failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A required external engine or library is not available.
    EnvironmentMissing,
    /// An unknown product id, or nothing rendered to export.
    NotFound,
    /// Diagram source the engine rejected.
    MalformedInput,
    /// The user asked for something that needs a selection first.
    UserPrecondition,
}

/// The main error type for Sowchart operations.
#[derive(Debug, Error)]
pub enum SowchartError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Product `{0}` not found")]
    UnknownProduct(String),

    #[error("Render error: {message}")]
    Render { message: String, kind: FailureKind },

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl SowchartError {
    /// The failure class, when the error belongs to one.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::UnknownProduct(_) => Some(FailureKind::NotFound),
            Self::Render { kind, .. } => Some(*kind),
            Self::Export(err) => err.kind(),
            Self::Io(_) | Self::Corpus(_) | Self::Config(_) | Self::Validation(_) => None,
        }
    }
}
