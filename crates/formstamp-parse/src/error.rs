//! Error types for the parsing, interpreter and merge layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`PdfError`].

use formstamp_core::{FillError, PdfError};
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A page index beyond the end of the document.
    #[error("page index {index} out of range (0..{count})")]
    PageOutOfRange { index: usize, count: usize },

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            err @ BackendError::PageOutOfRange { .. } => PdfError::Other(err.to_string()),
            BackendError::Core(e) => e,
        }
    }
}

impl From<BackendError> for FillError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PageOutOfRange { index, count } => FillError::PageIndexOutOfRange {
                index,
                page_count: count,
            },
            other => FillError::Pdf(other.into()),
        }
    }
}
