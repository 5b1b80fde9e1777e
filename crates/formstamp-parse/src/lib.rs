//! formstamp-parse: lopdf backend for reading and writing form pages.
//!
//! Interprets page content streams into positioned [`Char`]s for the word
//! extractor, and writes overlays back: encoding an [`OverlayPage`] as a
//! content stream and merging it onto one page of a document.
//!
//! [`Char`]: formstamp_core::Char
//! [`OverlayPage`]: formstamp_core::OverlayPage

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font_metrics;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod merge;
pub mod overlay_stream;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use backend::{MediaBox, PdfBackend};
pub use error::BackendError;
pub use formstamp_core;
pub use handler::{CharCollector, CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage, extract_page_chars};
pub use merge::merge_overlay;
pub use overlay_stream::{OverlayFonts, encode_overlay};
