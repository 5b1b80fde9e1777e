//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate for PDF document parsing.

use formstamp_core::{Char, PdfError};

use crate::backend::{MediaBox, PdfBackend};
use crate::error::BackendError;
use crate::handler::{CharCollector, ContentHandler};
use crate::interpreter::{InterpreterState, decode_stream, interpret_content_stream};

/// A parsed PDF document backed by lopdf.
#[derive(Clone)]
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Ordered page ObjectIds, indexed by 0-based page number.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Wrap an already loaded lopdf document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] for encrypted documents.
    pub fn from_document(inner: lopdf::Document) -> Result<Self, BackendError> {
        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }
        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids = inner.get_pages().values().copied().collect();
        Ok(Self { inner, page_ids })
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    pub fn into_inner(self) -> lopdf::Document {
        self.inner
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// ObjectId of the page at `index`.
    pub fn page_id(&self, index: usize) -> Result<lopdf::ObjectId, BackendError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(BackendError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    /// Serialize the document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BackendError> {
        let mut doc = self.inner.clone();
        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        Ok(buf)
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: lopdf::ObjectId,
    /// The 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use formstamp_parse::{LopdfBackend, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// ```
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        LopdfDocument::from_document(inner)
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_count()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        Ok(LopdfPage {
            object_id: doc.page_id(index)?,
            index,
        })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error> {
        page_media_box(&doc.inner, page.object_id)
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content_bytes = get_page_content_bytes(inner, page_dict)?;
        let resources = get_page_resources(inner, page.object_id)?;

        let mut state = InterpreterState::new();
        interpret_content_stream(inner, &content_bytes, resources, handler, 0, &mut state)
    }
}

/// Extract every glyph on a page as a [`Char`] in top-left coordinates.
pub fn extract_page_chars(doc: &LopdfDocument, index: usize) -> Result<Vec<Char>, BackendError> {
    let page = LopdfBackend::get_page(doc, index)?;
    let media_box = LopdfBackend::page_media_box(doc, &page)?;
    let mut collector = CharCollector::new(media_box.as_array());
    LopdfBackend::interpret_page(doc, &page, &mut collector)?;
    Ok(collector.into_chars())
}

/// The MediaBox of a page, walking up the page tree if needed.
pub(crate) fn page_media_box(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<MediaBox, BackendError> {
    let obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
    let obj = match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };
    let array = obj
        .as_array()
        .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    let x0 = object_to_f64(&array[0])?;
    let y0 = object_to_f64(&array[1])?;
    let x1 = object_to_f64(&array[2])?;
    let y1 = object_to_f64(&array[3])?;
    // Normalize corner order.
    Ok(MediaBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Concatenated, decoded bytes of a page's `/Contents`.
pub(crate) fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let contents_obj = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match contents_obj {
        lopdf::Object::Reference(id) => {
            let obj = doc
                .get_object(*id)
                .map_err(|e| BackendError::Parse(format!("failed to resolve /Contents: {e}")))?;
            match obj {
                lopdf::Object::Stream(stream) => decode_content_stream(stream),
                lopdf::Object::Array(arr) => concat_content_streams(doc, arr),
                _ => Err(BackendError::Parse("/Contents is not a stream".to_string())),
            }
        }
        lopdf::Object::Array(arr) => concat_content_streams(doc, arr),
        _ => Err(BackendError::Parse(
            "/Contents is not a reference or array".to_string(),
        )),
    }
}

fn concat_content_streams(
    doc: &lopdf::Document,
    arr: &[lopdf::Object],
) -> Result<Vec<u8>, BackendError> {
    let mut content = Vec::new();
    for item in arr {
        let id = item.as_reference().map_err(|e| {
            BackendError::Parse(format!("/Contents array item is not a reference: {e}"))
        })?;
        let stream = doc
            .get_object(id)
            .and_then(|o| o.as_stream())
            .map_err(|e| BackendError::Parse(format!("/Contents array item is not a stream: {e}")))?;
        let bytes = decode_content_stream(stream)?;
        if !content.is_empty() {
            content.push(b' ');
        }
        content.extend_from_slice(&bytes);
    }
    Ok(content)
}

fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    decode_stream(stream).map_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %e, "undecodable page content stream");
        BackendError::Parse(format!("failed to decompress content stream: {e}"))
    })
}

/// Get the resources dictionary for a page, handling inheritance.
pub(crate) fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => {
            let obj = match obj {
                lopdf::Object::Reference(id) => doc.get_object(*id).map_err(|e| {
                    BackendError::Parse(format!("failed to resolve /Resources reference: {e}"))
                })?,
                other => other,
            };
            obj.as_dict()
                .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))
        }
        None => {
            static EMPTY_DICT: std::sync::LazyLock<lopdf::Dictionary> =
                std::sync::LazyLock::new(lopdf::Dictionary::new);
            Ok(&EMPTY_DICT)
        }
    }
}
