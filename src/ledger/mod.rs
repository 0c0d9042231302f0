//! Persistence for reports and career assets.
//!
//! Every function takes a borrowed [`rusqlite::Connection`]; callers own
//! locking. Multi-statement writes (`link_work_item`, `merge_projects`) take
//! `&mut Connection` and run in a transaction.

pub mod assets;
pub mod reports;
pub mod types;

use anyhow::Result;
use rusqlite::Connection;

pub use assets::{
    create_project, delete_project, find_similar_project_groups, get_project, infer_skill_category,
    link_work_item, list_projects, list_skills, list_work_items, merge_projects,
    set_project_status, skills_stats, upsert_skill,
};
pub use reports::{
    create_todo, delete_daily_report, delete_okr_report, delete_todo, delete_weekly_report,
    get_daily_report, get_okr_report, get_todo, get_weekly_report, latest_okr_report,
    latest_weekly_report, list_daily_reports, list_okr_reports, list_todos, list_weekly_reports,
    save_daily_report, save_okr_report, save_weekly_report, update_todo,
};
pub use types::*;

/// Snapshot every table.
pub fn export_ledger(conn: &Connection) -> Result<LedgerExport> {
    let mut daily = conn.prepare("SELECT MIN(entry_date), MAX(entry_date) FROM daily_reports")?;
    let (first, last): (Option<String>, Option<String>) =
        daily.query_row([], |r| Ok((r.get(0)?, r.get(1)?)))?;
    let daily_reports = match (first, last) {
        (Some(first), Some(last)) => reports::list_daily_reports(conn, &first, &last)?,
        _ => Vec::new(),
    };

    Ok(LedgerExport {
        exported_at: chrono::Utc::now().to_rfc3339(),
        schema_version: crate::db::migrations::get_schema_version(conn)?,
        daily_reports,
        weekly_reports: reports::list_weekly_reports(conn)?,
        okr_reports: reports::list_okr_reports(conn)?,
        todo_items: reports::list_todos(conn)?,
        projects: assets::list_projects(conn, None)?,
        work_items: assets::list_work_items(conn, None)?,
        skills: assets::list_skills(conn)?,
    })
}
