//! Top-level PDF document type for reading form pages.

use formstamp_core::{
    Char, FillError, PdfError, TextLine, Word, WordExtractor, WordOptions, WordSource,
    cluster_words_into_lines, words_to_text,
};
use formstamp_parse::{BackendError, LopdfBackend, LopdfDocument, PdfBackend, extract_page_chars};

/// Vertical tolerance for grouping words into lines.
pub const LINE_TOLERANCE: f64 = 3.0;

/// A PDF document opened for reading and filling.
///
/// # Example
///
/// ```ignore
/// let doc = Document::open(&bytes)?;
/// let words = doc.words(0)?;
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    doc: LopdfDocument,
    word_options: WordOptions,
}

impl Document {
    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted, or a
    /// parse error if the bytes are not a PDF.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        Ok(Self::from_backend(doc))
    }

    /// Open a PDF document from a file path.
    #[cfg(feature = "std")]
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes)
    }

    pub(crate) fn from_backend(doc: LopdfDocument) -> Self {
        Self {
            doc,
            word_options: WordOptions::default(),
        }
    }

    /// Use `options` when grouping chars into words.
    pub fn with_word_options(mut self, options: WordOptions) -> Self {
        self.word_options = options;
        self
    }

    pub fn word_options(&self) -> &WordOptions {
        &self.word_options
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Access the backend document.
    pub fn backend(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Load a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the content cannot
    /// be interpreted.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        self.load_page(index).map_err(PdfError::from)
    }

    /// Width and height of a page in points, without reading its content.
    pub fn page_size(&self, index: usize) -> Result<(f64, f64), FillError> {
        let page = LopdfBackend::get_page(&self.doc, index)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page)?;
        Ok((media_box.width(), media_box.height()))
    }

    fn load_page(&self, index: usize) -> Result<Page, BackendError> {
        let page = LopdfBackend::get_page(&self.doc, index)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page)?;
        let chars = extract_page_chars(&self.doc, index)?;
        Ok(Page::new(index, media_box.width(), media_box.height(), chars))
    }

    /// Words on a page.
    ///
    /// # Errors
    ///
    /// [`FillError::UnreadableDocument`] if the page has no text layer, and
    /// [`FillError::PageIndexOutOfRange`] if it does not exist.
    pub fn words(&self, index: usize) -> Result<Vec<Word>, FillError> {
        let words = self.page_words(index)?;
        if words.is_empty() {
            return Err(FillError::UnreadableDocument { page: Some(index) });
        }
        Ok(words)
    }

    /// Serialize the document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PdfError> {
        self.doc.to_bytes().map_err(PdfError::from)
    }

    /// Write the document to `path`, creating parent directories as needed
    /// and overwriting any existing file.
    #[cfg(feature = "std")]
    pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> Result<(), PdfError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl WordSource for Document {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn page_words(&self, page_index: usize) -> Result<Vec<Word>, FillError> {
        let page = self.load_page(page_index)?;
        Ok(page.extract_words(&self.word_options))
    }
}

/// A single page of a [`Document`].
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    width: f64,
    height: f64,
    chars: Vec<Char>,
}

impl Page {
    pub fn new(index: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            index,
            width,
            height,
            chars,
        }
    }

    /// Returns the page index (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the page width in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the page height in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Whether any glyph was found on the page.
    pub fn has_text(&self) -> bool {
        self.chars.iter().any(|c| !c.is_blank())
    }

    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, self.index, options)
    }

    /// Words grouped into lines, top to bottom.
    pub fn lines(&self, options: &WordOptions) -> Vec<TextLine> {
        cluster_words_into_lines(&self.extract_words(options), LINE_TOLERANCE)
    }

    /// Page text, one line per output line.
    pub fn extract_text(&self, options: &WordOptions) -> String {
        words_to_text(&self.extract_words(options), LINE_TOLERANCE)
    }
}
