//! CLI `validate` commands: structural checks on a report or OKR file.

use anyhow::Result;
use std::path::Path;

use crate::validate::{validate_okr, validate_report};

/// Check a weekly report. Returns whether it is valid.
pub fn report(path: &Path, json: bool) -> Result<bool> {
    let text = super::read_input(path)?;
    let result = validate_report(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result.valid);
    }

    println!("Weekly report: {}", if result.valid { "VALID" } else { "INVALID" });
    println!("  Section order:   {}", if result.order_valid { "ok" } else { "out of order" });
    if result.missing_sections.is_empty() {
        println!("  Missing:         none");
    } else {
        println!("  Missing:");
        for section in &result.missing_sections {
            println!("    - {section}");
        }
    }
    Ok(result.valid)
}

/// Check an OKR. Returns whether it is valid.
pub fn okr(path: &Path, json: bool) -> Result<bool> {
    let text = super::read_input(path)?;
    let result = validate_okr(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result.valid);
    }

    println!("OKR: {}", if result.valid { "VALID" } else { "INVALID" });
    println!(
        "  Objectives:      {}{}",
        result.objective_count,
        if result.objectives_valid { "" } else { " (expected 2-3)" }
    );
    println!("  Date nodes:      {}", result.date_nodes_count);
    println!(
        "  Quantitative:    {}",
        if result.has_quantitative {
            result.quantitative_expressions.join(", ")
        } else {
            "none".to_string()
        }
    );
    println!("  Milestones:      {}", if result.has_milestones { "yes" } else { "no" });
    Ok(result.valid)
}
