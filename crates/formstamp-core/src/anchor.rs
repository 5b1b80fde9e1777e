//! Field anchor resolution.
//!
//! [`AnchorLocator`] turns a [`FieldSpec`] into an [`Anchor`]. Text-search
//! fields run a scored line search followed by a word-level refinement;
//! fixed fields only validate their page and apply the offset.
//!
//! The weights below were tuned against the reference form and are part of
//! the contract: downstream offsets assume this exact ranking.

use crate::error::FillError;
use crate::field::{Anchor, AnchorStrategy, FieldSpec, Mark, RoleContext};
use crate::layout::{TextLine, cluster_words_into_lines};
use crate::words::Word;

/// Literal every eligible line must contain.
pub const NAME_TOKEN: &str = "name";

/// Bonus for the requested role token on the line.
pub const ROLE_BONUS: i32 = 3;

/// Baseline for containing [`NAME_TOKEN`].
pub const NAME_BONUS: i32 = 1;

/// Penalty for the competing role token on the line.
pub const OTHER_ROLE_PENALTY: i32 = 2;

/// Penalty for clinician-identification vocabulary.
pub const STOPLIST_PENALTY: i32 = 3;

/// Words marking lines that identify the provider rather than a subject.
pub const STOPLIST: [&str; 4] = ["provider", "doctor", "health", "care"];

/// Max vertical distance for a word to count as on the anchor word's line.
pub const SAME_LINE_TOLERANCE: f64 = 5.0;

/// Gap left after the rightmost word trailing the anchor word.
pub const RIGHT_GAP: f64 = 10.0;

/// Score a line of text for the given role.
///
/// Returns `None` for lines that do not contain "name" (case-insensitive);
/// such lines are never candidates.
pub fn score_line(text: &str, role: RoleContext) -> Option<i32> {
    let lower = text.to_lowercase();
    if !lower.contains(NAME_TOKEN) {
        return None;
    }

    let mut score = NAME_BONUS;
    if lower.contains(role.token()) {
        score += ROLE_BONUS;
    }
    if lower.contains(role.other().token()) {
        score -= OTHER_ROLE_PENALTY;
    }
    if STOPLIST.iter().any(|word| lower.contains(word)) {
        score -= STOPLIST_PENALTY;
    }
    Some(score)
}

/// Anything that can hand out the words of a page.
///
/// A page without a text layer yields an empty vector.
pub trait WordSource {
    fn page_count(&self) -> usize;

    fn page_words(&self, page_index: usize) -> Result<Vec<Word>, FillError>;
}

/// Result of a scored search, before any field offset is applied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchHit {
    pub anchor: Anchor,
    /// Score of the winning line.
    pub score: i32,
    /// Text of the winning line.
    pub line: String,
    /// The word the anchor was derived from.
    pub anchor_word: Word,
}

/// Resolves field specs to write positions.
#[derive(Debug, Clone)]
pub struct AnchorLocator {
    /// Vertical tolerance used when grouping words into lines.
    pub line_tolerance: f64,
}

impl Default for AnchorLocator {
    fn default() -> Self {
        Self {
            line_tolerance: 3.0,
        }
    }
}

impl AnchorLocator {
    /// Resolve `field` for `mark`, including the field's offset.
    pub fn resolve(
        &self,
        source: &dyn WordSource,
        field: &FieldSpec,
        mark: &Mark,
    ) -> Result<Anchor, FillError> {
        let mismatch = || FillError::MarkMismatch {
            field: field.name.clone(),
        };

        let anchor = match (&field.strategy, mark) {
            (AnchorStrategy::TextSearch { role }, Mark::Text(_)) => {
                self.search(source, *role, field.target_page)?.anchor
            }
            (AnchorStrategy::FixedCoordinate { at }, Mark::Text(_)) => {
                let page_index = checked_page(source, field.target_page.unwrap_or(0))?;
                Anchor {
                    x: at.x,
                    y: at.y,
                    page_index,
                }
            }
            (AnchorStrategy::FixedChoice { yes, no }, Mark::Choice(value)) => {
                let page_index = checked_page(source, field.target_page.unwrap_or(0))?;
                let at = if *value { yes } else { no };
                Anchor {
                    x: at.x,
                    y: at.y,
                    page_index,
                }
            }
            _ => return Err(mismatch()),
        };

        Ok(Anchor {
            x: anchor.x + field.offset.x,
            y: anchor.y + field.offset.y,
            page_index: anchor.page_index,
        })
    }

    /// Run the scored line search and word refinement for `role`.
    ///
    /// Scans `page` only when given, otherwise every page in order. Pages
    /// without text are skipped; if none of the scanned pages has text the
    /// search fails with [`FillError::UnreadableDocument`].
    pub fn search(
        &self,
        source: &dyn WordSource,
        role: RoleContext,
        page: Option<usize>,
    ) -> Result<SearchHit, FillError> {
        let pages = match page {
            Some(index) => checked_page(source, index)?..index + 1,
            None => 0..source.page_count(),
        };

        let mut readable_pages = 0;
        let mut best: Option<(i32, Vec<Word>, TextLine)> = None;

        for index in pages {
            let words = source.page_words(index)?;
            if words.is_empty() {
                continue;
            }
            readable_pages += 1;

            let mut page_best: Option<(i32, TextLine)> = None;
            let best_score = best.as_ref().map_or(i32::MIN, |(score, _, _)| *score);
            for line in cluster_words_into_lines(&words, self.line_tolerance) {
                let Some(score) = score_line(&line.text(), role) else {
                    continue;
                };
                let floor = page_best.as_ref().map_or(best_score, |(s, _)| *s);
                if score > floor {
                    page_best = Some((score, line));
                }
            }
            if let Some((score, line)) = page_best {
                best = Some((score, words, line));
            }
        }

        if readable_pages == 0 {
            return Err(FillError::UnreadableDocument { page });
        }
        let not_found = || FillError::AnchorNotFound {
            role: role.token().to_string(),
        };
        let (score, words, line) = best.ok_or_else(not_found)?;

        let anchor_word = refine(&words, role).ok_or_else(not_found)?;
        let x = trailing_edge(&words, anchor_word);

        Ok(SearchHit {
            anchor: Anchor {
                x,
                y: anchor_word.bbox.top,
                page_index: anchor_word.page_index,
            },
            score,
            line: line.text(),
            anchor_word: anchor_word.clone(),
        })
    }
}

fn checked_page(source: &dyn WordSource, index: usize) -> Result<usize, FillError> {
    let page_count = source.page_count();
    if index >= page_count {
        return Err(FillError::PageIndexOutOfRange { index, page_count });
    }
    Ok(index)
}

/// Pick the "name" word closest to the first role word on the page.
///
/// Distance ties keep the first word.
fn refine(words: &[Word], role: RoleContext) -> Option<&Word> {
    let token = role.token();
    let target_y = words.iter().find(|w| w.contains_ignore_case(token))?.bbox.top;

    let mut closest: Option<&Word> = None;
    for word in words.iter().filter(|w| w.contains_ignore_case(NAME_TOKEN)) {
        let distance = (word.bbox.top - target_y).abs();
        match closest {
            Some(c) if distance >= (c.bbox.top - target_y).abs() => {}
            _ => closest = Some(word),
        }
    }
    closest
}

/// Right edge to write at: past the rightmost word trailing `anchor` on its
/// visual line, or the anchor's own right edge.
fn trailing_edge(words: &[Word], anchor: &Word) -> f64 {
    words
        .iter()
        .filter(|w| {
            (w.bbox.top - anchor.bbox.top).abs() < SAME_LINE_TOLERANCE && w.bbox.x0 > anchor.bbox.x1
        })
        .map(|w| w.bbox.x1)
        .reduce(f64::max)
        .map_or(anchor.bbox.x1, |x1| x1 + RIGHT_GAP)
}
