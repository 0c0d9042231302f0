use anyhow::Result;

use crate::config::WorkPilotConfig;

/// Export every ledger table as JSON to stdout.
pub fn export(config: &WorkPilotConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let data = crate::ledger::export_ledger(&conn)?;

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} daily report(s), {} weekly report(s), {} project(s), {} work item(s), {} skill(s).",
        data.daily_reports.len(),
        data.weekly_reports.len(),
        data.projects.len(),
        data.work_items.len(),
        data.skills.len()
    );

    Ok(())
}
