//! CLI `doctor` command: database diagnostics and LLM configuration report.

use anyhow::{Context, Result};

use std::path::Path;

use crate::config::WorkPilotConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &WorkPilotConfig, config_path: &Path) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WorkPilot Health Report");
    println!("=======================");
    println!();
    println!(
        "Config file:       {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("LLM endpoint:");
    if config.llm.is_configured() {
        println!("  URL:             {}", config.llm.api_url);
        println!("  Model:           {}", config.llm.model);
        println!(
            "  Timeout/retry:   {}s / {}",
            config.llm.timeout_secs, config.llm.retry
        );
    } else {
        println!("  Not configured. Generation will use the mock model.");
        println!("  Set LLM_API_URL + LLM_API_KEY (or DEEPSEEK_API_KEY) to enable.");
    }
    println!();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `workpilot serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Daily reports:   {}", report.daily_report_count);
    println!("  Weekly reports:  {}", report.weekly_report_count);
    println!("  OKR reports:     {}", report.okr_report_count);
    println!("  TODO items:      {}", report.todo_count);
    println!("  Projects:        {}", report.project_count);
    println!("  Work items:      {}", report.work_item_count);
    println!("  Skills:          {}", report.skill_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.workpilot/workpilot.db");
        println!("  2. Or export what is still readable: workpilot export > backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
