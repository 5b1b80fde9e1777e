//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts the read side of PDF
//! handling: opening a document, addressing pages and interpreting their
//! content streams via a [`ContentHandler`] callback.

use formstamp_core::PdfError;

use crate::handler::ContentHandler;

/// A page box in PDF user space, `[x0, y0, x1, y1]` with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl MediaBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Whether the lower-left corner is not at (0, 0).
    pub fn has_offset_origin(&self) -> bool {
        self.x0 != 0.0 || self.y0 != 0.0
    }
}

/// Trait abstracting PDF parsing operations.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler)?;
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a PDF or the PDF is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's MediaBox, looked up through the page tree if inherited.
    ///
    /// # Errors
    ///
    /// Returns an error if no MediaBox is found or it is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error>;

    /// Interpret the page content, calling `handler` for each glyph.
    ///
    /// # Errors
    ///
    /// Returns an error if the content streams cannot be decoded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), Self::Error>;
}
