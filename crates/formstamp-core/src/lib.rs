//! formstamp-core: backend-independent types and algorithms.
//!
//! This crate provides the data model (BBox, Char, Word, TextLine, FieldSpec,
//! Anchor) and the algorithms that do not need a PDF parser: grouping chars
//! into words and lines, the scored field search, and overlay layout.
//! It has no required dependencies.

pub mod anchor;
pub mod error;
pub mod field;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod text;
pub mod words;

pub use anchor::{AnchorLocator, SearchHit, WordSource, score_line};
pub use error::{FillError, PdfError};
pub use field::{
    Anchor, AnchorStrategy, FieldSpec, FillRequest, Mark, Offset, RoleContext,
};
pub use geometry::{BBox, Ctm, Point};
pub use layout::{TextLine, cluster_words_into_lines, words_to_text};
pub use overlay::{DrawOp, OverlayPage, PlacedOp, render};
pub use text::Char;
pub use words::{Word, WordExtractor, WordOptions};
