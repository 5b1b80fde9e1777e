use std::path::Path;

use formstamp::{FillReport, FormFiller, FormTemplate, LeaveRecord};
use tracing::info;

use crate::cli::ReportFormat;
use crate::shared::{fail, print_json};

pub fn run(
    input: &Path,
    output: &Path,
    record: &Path,
    template: Option<&Path>,
    format: &ReportFormat,
) -> Result<(), i32> {
    let template = match template {
        Some(path) => FormTemplate::from_path(path),
        None => FormTemplate::medical_leave(),
    }
    .map_err(|e| fail("loading template", e))?;
    info!(template = %template.name, version = template.version, "loaded template");

    let text = std::fs::read_to_string(record)
        .map_err(|e| fail(&format!("reading {}", record.display()), e))?;
    let record = LeaveRecord::from_json(&text).map_err(|e| fail("invalid leave record", e))?;
    let requests = record
        .to_requests(&template)
        .map_err(|e| fail("building requests", e))?;

    let report = FormFiller::default()
        .fill_file(input, output, &requests)
        .map_err(|e| fail("fill failed", e))?;

    match format {
        ReportFormat::Text => {
            write_text(&report);
            Ok(())
        }
        ReportFormat::Json => print_json(&report_json(&report, output)),
    }
}

fn write_text(report: &FillReport) {
    println!("field\tpage\tx\ty");
    for applied in &report.applied {
        println!(
            "{}\t{}\t{:.2}\t{:.2}",
            applied.field,
            applied.anchor.page_index + 1,
            applied.anchor.x,
            applied.anchor.y,
        );
    }
    for skipped in &report.skipped {
        println!("{}\tskipped\t{}", skipped.field, skipped.reason);
    }
}

fn report_json(report: &FillReport, output: &Path) -> serde_json::Value {
    let applied: Vec<_> = report
        .applied
        .iter()
        .map(|a| {
            serde_json::json!({
                "field": a.field,
                "page": a.anchor.page_index + 1,
                "x": a.anchor.x,
                "y": a.anchor.y,
                "mark": a.mark,
            })
        })
        .collect();
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "field": s.field,
                "reason": s.reason.to_string(),
            })
        })
        .collect();
    serde_json::json!({
        "output": output.display().to_string(),
        "applied": applied,
        "skipped": skipped,
    })
}
