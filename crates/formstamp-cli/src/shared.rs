use std::path::Path;

use formstamp::Document;
use serde_json::Value;

use crate::page_range::parse_page_range;

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_document(file: &Path) -> Result<Document, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Document::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Print `value` as a single line of JSON.
pub fn print_json(value: &Value) -> Result<(), i32> {
    let text = serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to encode JSON: {e}");
        1
    })?;
    println!("{text}");
    Ok(())
}

/// Report a failure to stderr and turn it into exit code 1.
pub fn fail(context: &str, err: impl std::fmt::Display) -> i32 {
    eprintln!("Error: {context}: {err}");
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_plain_text() {
        assert_eq!(csv_escape("Name:"), "Name:");
    }

    #[test]
    fn csv_escape_with_comma() {
        assert_eq!(csv_escape("Lee, Jordan"), "\"Lee, Jordan\"");
    }

    #[test]
    fn csv_escape_with_quotes() {
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn open_document_file_not_found() {
        assert_eq!(
            open_document(Path::new("/nonexistent/form.pdf")).unwrap_err(),
            1
        );
    }

    #[test]
    fn resolve_pages_none_returns_all() {
        assert_eq!(resolve_pages(None, 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn resolve_pages_invalid_range() {
        assert_eq!(resolve_pages(Some("0"), 3).unwrap_err(), 1);
    }

    #[test]
    fn fail_maps_to_exit_code_one() {
        assert_eq!(fail("reading record", "missing"), 1);
    }
}
