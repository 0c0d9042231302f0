//! CLI `generate` commands: draft a weekly report or OKR from a file.

use anyhow::Result;
use std::path::Path;

use crate::config::WorkPilotConfig;
use crate::generate::{self, GenerationSource};
use crate::llm;

fn note_source(source: GenerationSource, gateway: &str, warning: Option<&str>) {
    match source {
        GenerationSource::Llm => eprintln!("Generated by the {gateway} model."),
        GenerationSource::Fallback => eprintln!(
            "Model unavailable ({}), used the built-in fallback.",
            warning.unwrap_or("unknown error")
        ),
    }
}

/// Print a weekly report to stdout; validation notes go to stderr.
pub fn weekly(config: &WorkPilotConfig, path: &Path, use_mock: bool) -> Result<()> {
    let content = super::read_input(path)?;
    let gateway = llm::create_gateway(&config.llm, use_mock);
    let generated = generate::generate_weekly_report(
        &content,
        super::today(),
        gateway.as_ref(),
        config.report.max_input_chars,
    )?;

    println!("{}", generated.report);
    note_source(generated.source, generated.gateway, generated.warning.as_deref());
    if !generated.validation.valid {
        eprintln!(
            "WARNING: report failed validation (missing: {}; order ok: {})",
            generated.validation.missing_sections.join(", "),
            generated.validation.order_valid
        );
    }
    Ok(())
}

/// Print an OKR for `quarter` (default: the configured quarter).
pub fn okr(
    config: &WorkPilotConfig,
    path: &Path,
    quarter: Option<&str>,
    use_mock: bool,
) -> Result<()> {
    let content = super::read_input(path)?;
    let quarter = quarter.unwrap_or(config.report.default_quarter.as_str());
    let gateway = llm::create_gateway(&config.llm, use_mock);
    let generated = generate::generate_okr(
        &content,
        quarter,
        super::today(),
        gateway.as_ref(),
        config.report.max_input_chars,
    )?;

    println!("{}", generated.okr);
    note_source(generated.source, generated.gateway, generated.warning.as_deref());
    if !generated.validation.valid {
        eprintln!(
            "WARNING: OKR failed validation ({} objective(s), {} date node(s))",
            generated.validation.objective_count, generated.validation.date_nodes_count
        );
    }
    Ok(())
}
