use std::path::Path;

use formstamp::{AnchorLocator, RoleContext};

use crate::cli::ReportFormat;
use crate::shared::{fail, open_document, print_json};

pub fn run(
    file: &Path,
    role: RoleContext,
    page: Option<usize>,
    format: &ReportFormat,
) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page = match page {
        Some(0) => {
            eprintln!("Error: page 0 is invalid (pages start at 1)");
            return Err(1);
        }
        Some(p) => Some(p - 1),
        None => None,
    };

    let hit = AnchorLocator::default()
        .search(&doc, role, page)
        .map_err(|e| fail("search failed", e))?;

    match format {
        ReportFormat::Text => {
            println!("line:   {}", hit.line);
            println!("score:  {}", hit.score);
            println!("word:   {}", hit.anchor_word.text);
            println!(
                "anchor: page {} x={:.2} y={:.2}",
                hit.anchor.page_index + 1,
                hit.anchor.x,
                hit.anchor.y
            );
            Ok(())
        }
        ReportFormat::Json => print_json(&serde_json::json!({
            "role": role.token(),
            "line": hit.line,
            "score": hit.score,
            "word": hit.anchor_word.text,
            "page": hit.anchor.page_index + 1,
            "x": hit.anchor.x,
            "y": hit.anchor.y,
        })),
    }
}
