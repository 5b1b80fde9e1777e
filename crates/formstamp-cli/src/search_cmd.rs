use std::path::Path;

use formstamp::{SearchOptions, TermMatch, search_words};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_document, print_json, resolve_pages};

pub fn run(
    file: &Path,
    term: &str,
    pages: Option<&str>,
    context: usize,
    format: &OutputFormat,
) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let opts = SearchOptions {
        context_words: context,
        ..SearchOptions::default()
    };

    let mut matches: Vec<TermMatch> = Vec::new();
    for &idx in &page_indices {
        let page = doc.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        let words = page.extract_words(doc.word_options());
        matches.extend(search_words(&words, term, &opts));
    }

    if matches.is_empty() {
        eprintln!("No matches for '{term}'");
    }

    match format {
        OutputFormat::Text => {
            for (i, m) in matches.iter().enumerate() {
                println!("Match {}: page {}", i + 1, m.page_index + 1);
                println!("  text:      {}", m.word.text);
                println!("  position:  x0={:.2} top={:.2}", m.word.bbox.x0, m.word.bbox.top);
                println!(
                    "  suggested: x={:.2} y={:.2}",
                    m.suggested.x, m.suggested.y
                );
                println!("  context:   {}", m.context);
            }
            Ok(())
        }
        OutputFormat::Json => {
            let all: Vec<_> = matches
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "page": m.page_index + 1,
                        "text": m.word.text,
                        "x0": m.word.bbox.x0,
                        "top": m.word.bbox.top,
                        "suggested_x": m.suggested.x,
                        "suggested_y": m.suggested.y,
                        "context": m.context,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(all))
        }
        OutputFormat::Csv => {
            println!("page,text,x0,top,suggested_x,suggested_y,context");
            for m in &matches {
                println!(
                    "{},{},{:.2},{:.2},{:.2},{:.2},{}",
                    m.page_index + 1,
                    csv_escape(&m.word.text),
                    m.word.bbox.x0,
                    m.word.bbox.top,
                    m.suggested.x,
                    m.suggested.y,
                    csv_escape(&m.context),
                );
            }
            Ok(())
        }
    }
}
