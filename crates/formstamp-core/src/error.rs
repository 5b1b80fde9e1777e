//! Error types for formstamp.
//!
//! Provides [`PdfError`] for failures reading or writing PDF structure and
//! [`FillError`] for failures resolving or applying a single field.

use std::fmt;

/// Fatal error types for PDF processing.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Failure to resolve or apply one field of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FillError {
    /// A page needed by a text search has no extractable text layer.
    UnreadableDocument {
        /// The page that was searched, or `None` when every page was empty.
        page: Option<usize>,
    },
    /// The scored search found no eligible line or no matching word.
    AnchorNotFound {
        /// Role token the search was disambiguating for.
        role: String,
    },
    /// A fixed coordinate or merge referenced a page beyond the document.
    PageIndexOutOfRange { index: usize, page_count: usize },
    /// The value for a field is empty or blank; nothing to draw.
    EmptyValue { field: String },
    /// A text value was given for a yes/no field, or a yes/no value for a text field.
    MarkMismatch { field: String },
    /// Underlying PDF failure.
    Pdf(PdfError),
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::UnreadableDocument { page: Some(page) } => {
                write!(f, "page {page} has no extractable text layer")
            }
            FillError::UnreadableDocument { page: None } => {
                write!(f, "document has no extractable text layer")
            }
            FillError::AnchorNotFound { role } => {
                write!(f, "no \"name\" line found for role \"{role}\"")
            }
            FillError::PageIndexOutOfRange { index, page_count } => write!(
                f,
                "page index {index} out of range (document has {page_count} pages)"
            ),
            FillError::EmptyValue { field } => write!(f, "empty value for field \"{field}\""),
            FillError::MarkMismatch { field } => {
                write!(f, "mark kind does not match strategy of field \"{field}\"")
            }
            FillError::Pdf(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillError::Pdf(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PdfError> for FillError {
    fn from(err: PdfError) -> Self {
        FillError::Pdf(err)
    }
}
