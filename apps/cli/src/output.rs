use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use psgallery_client::{ResultRecord, SearchOutcome};
use serde_json::json;

pub const NO_RESULTS: &str = "No results found.";

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn print_outcome(outcome: &SearchOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_text(outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json_report(outcome))?),
    }
    Ok(())
}

/// Table plus trailing summary, or the no-results message.
pub fn render_text(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::NoResults => NO_RESULTS.to_string(),
        SearchOutcome::Found {
            records,
            total_hits,
        } => format!(
            "{}\n\n{}",
            build_table(records),
            summary(records.len(), *total_hits)
        ),
    }
}

pub fn build_table(records: &[ResultRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Version", "Downloads", "Author", "Description"]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.version),
            Cell::new(record.download_count.to_string()),
            Cell::new(&record.author),
            Cell::new(&record.description),
        ]);
    }

    table
}

fn summary(shown: usize, total: usize) -> String {
    format!("Showing {} of {} result(s)", shown, total)
}

pub fn json_report(outcome: &SearchOutcome) -> serde_json::Value {
    match outcome {
        SearchOutcome::NoResults => json!({ "results": [], "count": 0, "total": 0 }),
        SearchOutcome::Found {
            records,
            total_hits,
        } => json!({
            "results": records,
            "count": records.len(),
            "total": total_hits,
        }),
    }
}
