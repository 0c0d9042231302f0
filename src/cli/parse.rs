//! CLI `parse` command: run the daily-log pipeline over a file.

use anyhow::Result;
use std::path::Path;

use crate::config::WorkPilotConfig;
use crate::journal::{self, Category};

/// Parse a daily log and print either JSON or a per-category summary.
pub fn parse(config: &WorkPilotConfig, path: &Path, json: bool) -> Result<()> {
    let content = super::read_input(path)?;
    journal::check_input_len(&content, config.report.max_input_chars)?;
    let result = journal::parse(&content, super::today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Week {} ~ {}",
        result.week_range.start.format("%Y-%m-%d"),
        result.week_range.end.format("%Y-%m-%d")
    );
    println!("{}", "=".repeat(40));
    for block in &result.blocks {
        println!(
            "  {:<12} {:>5}h  {} line(s)",
            block.date.as_deref().unwrap_or("(undated)"),
            block.hours,
            block.content.len()
        );
    }
    println!("  Total hours: {}", result.total_hours());
    println!();

    for category in Category::ALL {
        let entries = result.entries(category);
        println!("{} ({})", category.report_heading(), entries.len());
        for entry in entries {
            println!("  - {entry}");
        }
    }

    Ok(())
}
