use crate::geometry::BBox;
use crate::text::Char;

/// Options for word extraction.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Maximum horizontal distance between characters to group into a word.
    pub x_tolerance: f64,
    /// Maximum vertical distance between characters to group into a word.
    pub y_tolerance: f64,
    /// If true, include blank/space characters in words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// If true, keep content stream order instead of sorting spatially.
    pub use_text_flow: bool,
    /// If true, expand common Latin ligatures (U+FB00 to U+FB06).
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// 0-based index of the page the word was found on.
    pub page_index: usize,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
}

impl Word {
    /// Case-insensitive substring test.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Group `chars` of page `page_index` into words.
    ///
    /// Characters are sorted top-to-bottom then left-to-right (unless
    /// `use_text_flow` is set). A new word starts at a blank character, or
    /// when the horizontal gap to the previous character exceeds
    /// `x_tolerance`, or when the tops differ by more than `y_tolerance`.
    pub fn extract(chars: &[Char], page_index: usize, options: &WordOptions) -> Vec<Word> {
        let mut sorted: Vec<&Char> = chars.iter().collect();
        if !options.use_text_flow {
            sorted.sort_by(|a, b| {
                a.bbox
                    .top
                    .total_cmp(&b.bbox.top)
                    .then(a.bbox.x0.total_cmp(&b.bbox.x0))
            });
        }

        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for ch in sorted {
            if ch.is_blank() && !options.keep_blank_chars {
                Self::flush(&mut current, &mut words, page_index, options);
                continue;
            }

            if let Some(last) = current.last() {
                if Self::should_split(last, ch, options) {
                    Self::flush(&mut current, &mut words, page_index, options);
                }
            }
            current.push(ch);
        }
        Self::flush(&mut current, &mut words, page_index, options);

        words
    }

    /// Distance between the x-intervals; overlapping chars have gap 0.
    fn should_split(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        x_gap > options.x_tolerance || y_diff > options.y_tolerance
    }

    fn flush(
        current: &mut Vec<&Char>,
        words: &mut Vec<Word>,
        page_index: usize,
        options: &WordOptions,
    ) {
        let Some(first) = current.first() else {
            return;
        };
        let raw: String = current.iter().map(|c| c.text.as_str()).collect();
        let text = if options.expand_ligatures {
            expand_ligatures_in_text(&raw)
        } else {
            raw
        };
        let bbox = current
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, c| acc.union(&c.bbox));
        words.push(Word {
            text,
            page_index,
            bbox,
        });
        current.clear();
    }
}

/// Expand common Latin ligatures (U+FB00 to U+FB06) to their multi-character equivalents.
fn expand_ligatures_in_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' => result.push_str("\u{017F}t"),
            '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x1, bottom),
            fontname: "TestFont".to_string(),
            size: 12.0,
            upright: true,
            char_code: 0,
        }
    }

    #[test]
    fn test_default_options() {
        let opts = WordOptions::default();
        assert_eq!(opts.x_tolerance, 3.0);
        assert_eq!(opts.y_tolerance, 3.0);
        assert!(!opts.keep_blank_chars);
        assert!(!opts.use_text_flow);
    }

    #[test]
    fn test_empty_chars() {
        assert!(WordExtractor::extract(&[], 0, &WordOptions::default()).is_empty());
    }

    #[test]
    fn test_touching_chars_form_one_word() {
        let chars = vec![
            make_char("N", 10.0, 100.0, 18.0, 112.0),
            make_char("a", 18.0, 100.0, 24.0, 112.0),
            make_char("m", 24.0, 100.0, 33.0, 112.0),
            make_char("e", 33.0, 100.0, 39.0, 112.0),
        ];
        let words = WordExtractor::extract(&chars, 2, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Name");
        assert_eq!(words[0].page_index, 2);
        assert_eq!(words[0].bbox, BBox::new(10.0, 100.0, 39.0, 112.0));
    }

    #[test]
    fn test_space_splits_words() {
        let chars = vec![
            make_char("A", 10.0, 100.0, 20.0, 112.0),
            make_char(" ", 20.0, 100.0, 25.0, 112.0),
            make_char("B", 25.0, 100.0, 35.0, 112.0),
        ];
        let words = WordExtractor::extract(&chars, 0, &WordOptions::default());
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn test_gap_beyond_tolerance_splits() {
        let chars = vec![
            make_char("A", 10.0, 100.0, 20.0, 112.0),
            make_char("B", 23.5, 100.0, 33.0, 112.0),
        ];
        let words = WordExtractor::extract(&chars, 0, &WordOptions::default());
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_gap_within_tolerance_joins() {
        let chars = vec![
            make_char("A", 10.0, 100.0, 20.0, 112.0),
            make_char("B", 22.5, 100.0, 33.0, 112.0),
        ];
        let words = WordExtractor::extract(&chars, 0, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "AB");
    }

    #[test]
    fn test_different_lines_split_and_sort() {
        let chars = vec![
            make_char("B", 10.0, 200.0, 20.0, 212.0),
            make_char("A", 10.0, 100.0, 20.0, 112.0),
        ];
        let words = WordExtractor::extract(&chars, 0, &WordOptions::default());
        assert_eq!(words[0].text, "A");
        assert_eq!(words[1].text, "B");
    }

    #[test]
    fn test_keep_blank_chars() {
        let chars = vec![
            make_char("A", 10.0, 100.0, 20.0, 112.0),
            make_char(" ", 20.0, 100.0, 25.0, 112.0),
            make_char("B", 25.0, 100.0, 35.0, 112.0),
        ];
        let opts = WordOptions {
            keep_blank_chars: true,
            ..WordOptions::default()
        };
        let words = WordExtractor::extract(&chars, 0, &opts);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "A B");
    }

    #[test]
    fn test_ligature_expansion() {
        let chars = vec![make_char("\u{FB01}", 10.0, 100.0, 20.0, 112.0)];
        let words = WordExtractor::extract(&chars, 0, &WordOptions::default());
        assert_eq!(words[0].text, "fi");
    }

    #[test]
    fn test_contains_ignore_case() {
        let word = Word {
            text: "Employee's".to_string(),
            page_index: 0,
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
        };
        assert!(word.contains_ignore_case("employee"));
        assert!(!word.contains_ignore_case("patient"));
    }
}
