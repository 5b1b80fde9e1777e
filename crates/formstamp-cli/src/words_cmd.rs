use std::path::Path;

use formstamp::{Document, Word, WordOptions};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_document, print_json, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    x_tolerance: f64,
    y_tolerance: f64,
) -> Result<(), i32> {
    let opts = WordOptions {
        x_tolerance,
        y_tolerance,
        ..WordOptions::default()
    };
    let doc = open_document(file)?.with_word_options(opts);
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let words = collect_words(&doc, &page_indices)?;

    match format {
        OutputFormat::Text => {
            println!("page\ttext\tx0\ttop\tx1\tbottom");
            for w in &words {
                println!(
                    "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    w.page_index + 1,
                    w.text,
                    w.bbox.x0,
                    w.bbox.top,
                    w.bbox.x1,
                    w.bbox.bottom,
                );
            }
            Ok(())
        }
        OutputFormat::Json => {
            let all: Vec<_> = words
                .iter()
                .map(|w| {
                    serde_json::json!({
                        "page": w.page_index + 1,
                        "text": w.text,
                        "x0": w.bbox.x0,
                        "top": w.bbox.top,
                        "x1": w.bbox.x1,
                        "bottom": w.bbox.bottom,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(all))
        }
        OutputFormat::Csv => {
            println!("page,text,x0,top,x1,bottom");
            for w in &words {
                println!(
                    "{},{},{:.2},{:.2},{:.2},{:.2}",
                    w.page_index + 1,
                    csv_escape(&w.text),
                    w.bbox.x0,
                    w.bbox.top,
                    w.bbox.x1,
                    w.bbox.bottom,
                );
            }
            Ok(())
        }
    }
}

fn collect_words(doc: &Document, page_indices: &[usize]) -> Result<Vec<Word>, i32> {
    let mut words = Vec::new();
    for &idx in page_indices {
        let page = doc.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        words.extend(page.extract_words(doc.word_options()));
    }
    Ok(words)
}
