//! Coordinate finder: locate a term on the form and suggest where to write.
//!
//! Used when laying out a new template. Every word whose text contains the
//! term (ignoring case) is reported with a few words of surrounding context
//! and a suggested write position just right of and below the word.

use formstamp_core::{FillError, Point, Word};

use crate::document::Document;

/// Options controlling term search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Words of context kept on each side of a match (default: 5).
    pub context_words: usize,
    /// Added to the word's right edge for the suggested x (default: 15).
    pub suggest_dx: f64,
    /// Added to the word's top for the suggested y (default: 5).
    pub suggest_dy: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            context_words: 5,
            suggest_dx: 15.0,
            suggest_dy: 5.0,
        }
    }
}

/// A word matching the search term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermMatch {
    pub page_index: usize,
    pub word: Word,
    /// Surrounding words in reading order, joined by spaces.
    pub context: String,
    /// Suggested write position in top-left page coordinates.
    pub suggested: Point,
}

/// Search every page of `doc` for words containing `term`.
///
/// Pages without a text layer are skipped. An empty term matches nothing.
pub fn find_term(
    doc: &Document,
    term: &str,
    options: &SearchOptions,
) -> Result<Vec<TermMatch>, FillError> {
    let mut matches = Vec::new();
    if term.trim().is_empty() {
        return Ok(matches);
    }

    for index in 0..doc.page_count() {
        let page = doc.page(index)?;
        let words = page.extract_words(doc.word_options());
        matches.extend(search_words(&words, term, options));
    }
    Ok(matches)
}

/// Match `term` against one page's words.
pub fn search_words(words: &[Word], term: &str, options: &SearchOptions) -> Vec<TermMatch> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    words
        .iter()
        .enumerate()
        .filter(|(_, word)| word.contains_ignore_case(term))
        .map(|(i, word)| {
            let start = i.saturating_sub(options.context_words);
            let end = (i + options.context_words + 1).min(words.len());
            let context = words[start..end]
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            TermMatch {
                page_index: word.page_index,
                word: word.clone(),
                context,
                suggested: Point::new(
                    word.bbox.x1 + options.suggest_dx,
                    word.bbox.top + options.suggest_dy,
                ),
            }
        })
        .collect()
}
