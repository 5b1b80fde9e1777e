//! Applying fill requests to a document.
//!
//! Each request is resolved against the current document, rendered to an
//! overlay, merged onto its page, serialized and reopened as the input for
//! the next request. The batch stops at the first failure other than an
//! empty value.

use std::path::{Path, PathBuf};

use formstamp_core::{
    Anchor, AnchorLocator, DrawOp, FillError, FillRequest, Mark, PdfError, WordOptions, render,
};
use formstamp_parse::merge_overlay;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::Document;

/// A failed fill batch.
#[derive(Debug, Error)]
pub enum FillFailure {
    /// Resolving or applying one field failed.
    #[error("field \"{field}\": {source}")]
    Field {
        field: String,
        #[source]
        source: FillError,
    },

    /// The input could not be parsed or the result could not be serialized.
    #[error("document error: {0}")]
    Document(#[source] PdfError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FillFailure {
    fn field(field: &str, source: impl Into<FillError>) -> Self {
        FillFailure::Field {
            field: field.to_string(),
            source: source.into(),
        }
    }

    /// The underlying [`FillError`], for field failures.
    pub fn fill_error(&self) -> Option<&FillError> {
        match self {
            FillFailure::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A field that was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedField {
    pub field: String,
    pub anchor: Anchor,
    pub mark: Mark,
}

/// A field that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedField {
    pub field: String,
    pub reason: FillError,
}

/// Outcome of a fill batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub applied: Vec<AppliedField>,
    pub skipped: Vec<SkippedField>,
}

/// Options for a [`FormFiller`].
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Word grouping used by text searches.
    pub word_options: WordOptions,
    pub locator: AnchorLocator,
}

/// Fills forms from a list of [`FillRequest`]s.
#[derive(Debug, Clone, Default)]
pub struct FormFiller {
    options: FillOptions,
}

impl FormFiller {
    pub fn new(options: FillOptions) -> Self {
        Self { options }
    }

    /// Apply `requests` in order, returning the filled document.
    pub fn fill(
        &self,
        document: Document,
        requests: &[FillRequest],
    ) -> Result<(Document, FillReport), FillFailure> {
        let mut doc = document.with_word_options(self.options.word_options.clone());
        let mut report = FillReport::default();

        for request in requests {
            let name = request.field.name.as_str();
            if request.mark.is_blank() {
                warn!(field = name, "empty value, skipping field");
                report.skipped.push(SkippedField {
                    field: name.to_string(),
                    reason: FillError::EmptyValue {
                        field: name.to_string(),
                    },
                });
                continue;
            }

            let (next, anchor) = self
                .apply(&doc, request)
                .map_err(|e| FillFailure::field(name, e))?;
            info!(
                field = name,
                page = anchor.page_index,
                x = anchor.x,
                y = anchor.y,
                "applied field"
            );
            report.applied.push(AppliedField {
                field: name.to_string(),
                anchor,
                mark: request.mark.clone(),
            });
            doc = next;
        }

        Ok((doc, report))
    }

    /// Read `input`, apply `requests` and write the result to `output`.
    ///
    /// The output directory is created if needed and an existing file is
    /// overwritten. Nothing is written if any request fails.
    #[cfg(feature = "std")]
    pub fn fill_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        requests: &[FillRequest],
    ) -> Result<FillReport, FillFailure> {
        let input = input.as_ref();
        let output = output.as_ref();

        let bytes = std::fs::read(input).map_err(|source| FillFailure::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let document = Document::open(&bytes).map_err(FillFailure::Document)?;
        let (filled, report) = self.fill(document, requests)?;

        let bytes = filled.to_bytes().map_err(FillFailure::Document)?;
        write_output(output, &bytes)?;
        info!(
            output = %output.display(),
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "wrote filled form"
        );
        Ok(report)
    }

    /// Resolve, render and merge one request.
    fn apply(
        &self,
        doc: &Document,
        request: &FillRequest,
    ) -> Result<(Document, Anchor), FillError> {
        let anchor = self
            .options
            .locator
            .resolve(doc, &request.field, &request.mark)?;
        debug!(field = %request.field.name, ?anchor, "resolved anchor");

        let (width, height) = doc.page_size(anchor.page_index)?;
        let op = DrawOp::for_mark(&anchor, &request.field, &request.mark);
        let overlay = render(width, height, &[op]);

        let merged = merge_overlay(doc.backend(), anchor.page_index, &overlay)?;
        let bytes = merged.to_bytes()?;
        let reopened = Document::open(&bytes)?.with_word_options(doc.word_options().clone());
        Ok((reopened, anchor))
    }
}

#[cfg(feature = "std")]
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), FillFailure> {
    let io_err = |source| FillFailure::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}
