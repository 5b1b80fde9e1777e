use std::path::Path;

use crate::cli::TextFormat;
use crate::shared::{open_document, print_json, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, format: &TextFormat) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;

    for &idx in &page_indices {
        let page = doc.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        let text = page.extract_text(doc.word_options());

        match format {
            TextFormat::Text => {
                println!("--- Page {} ---", idx + 1);
                println!("{text}");
            }
            TextFormat::Json => print_json(&serde_json::json!({
                "page": idx + 1,
                "width": page.width(),
                "height": page.height(),
                "text": text,
            }))?,
        }
    }

    Ok(())
}
