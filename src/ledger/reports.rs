//! Daily, weekly, and OKR report storage plus the TODO list.
//!
//! Saves are upserts keyed by date: the last write wins.

use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{DailyReport, OkrReport, TodoItem, WeeklyReport};

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn daily_from_row(row: &Row) -> rusqlite::Result<DailyReport> {
    Ok(DailyReport {
        entry_date: row.get(0)?,
        content: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn weekly_from_row(row: &Row) -> rusqlite::Result<WeeklyReport> {
    Ok(WeeklyReport {
        start_date: row.get(0)?,
        end_date: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn okr_from_row(row: &Row) -> rusqlite::Result<OkrReport> {
    Ok(OkrReport {
        creation_date: row.get(0)?,
        content: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn todo_from_row(row: &Row) -> rusqlite::Result<TodoItem> {
    Ok(TodoItem {
        id: row.get(0)?,
        content: row.get(1)?,
        completed: row.get::<_, i64>(2)? != 0,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        completed_at: row.get(6)?,
    })
}

const DAILY_COLUMNS: &str = "entry_date, content, created_at, updated_at";
const WEEKLY_COLUMNS: &str = "start_date, end_date, content, created_at, updated_at";
const OKR_COLUMNS: &str = "creation_date, content, created_at, updated_at";
const TODO_COLUMNS: &str =
    "id, content, completed, sort_order, created_at, updated_at, completed_at";

// --- daily reports ---

pub fn save_daily_report(conn: &Connection, entry_date: &str, content: &str) -> Result<DailyReport> {
    let now = now();
    conn.execute(
        "INSERT INTO daily_reports (entry_date, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
         ON CONFLICT(entry_date) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        params![entry_date, content, now],
    )?;
    tracing::debug!(entry_date, chars = content.chars().count(), "daily report saved");

    match get_daily_report(conn, entry_date)? {
        Some(report) => Ok(report),
        None => bail!("daily report {entry_date} vanished after save"),
    }
}

pub fn get_daily_report(conn: &Connection, entry_date: &str) -> Result<Option<DailyReport>> {
    let report = conn
        .query_row(
            &format!("SELECT {DAILY_COLUMNS} FROM daily_reports WHERE entry_date = ?1"),
            params![entry_date],
            daily_from_row,
        )
        .optional()?;
    Ok(report)
}

/// Reports with `start <= entry_date <= end`, oldest first.
pub fn list_daily_reports(conn: &Connection, start: &str, end: &str) -> Result<Vec<DailyReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DAILY_COLUMNS} FROM daily_reports WHERE entry_date BETWEEN ?1 AND ?2 ORDER BY entry_date"
    ))?;
    let rows = stmt
        .query_map(params![start, end], daily_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns `true` if a report was deleted.
pub fn delete_daily_report(conn: &Connection, entry_date: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM daily_reports WHERE entry_date = ?1",
        params![entry_date],
    )?;
    Ok(rows > 0)
}

// --- weekly reports ---

pub fn save_weekly_report(
    conn: &Connection,
    start_date: &str,
    end_date: &str,
    content: &str,
) -> Result<WeeklyReport> {
    let now = now();
    conn.execute(
        "INSERT INTO weekly_reports (start_date, end_date, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) \
         ON CONFLICT(start_date, end_date) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        params![start_date, end_date, content, now],
    )?;

    match get_weekly_report(conn, start_date, end_date)? {
        Some(report) => Ok(report),
        None => bail!("weekly report {start_date}..{end_date} vanished after save"),
    }
}

pub fn get_weekly_report(
    conn: &Connection,
    start_date: &str,
    end_date: &str,
) -> Result<Option<WeeklyReport>> {
    let report = conn
        .query_row(
            &format!(
                "SELECT {WEEKLY_COLUMNS} FROM weekly_reports WHERE start_date = ?1 AND end_date = ?2"
            ),
            params![start_date, end_date],
            weekly_from_row,
        )
        .optional()?;
    Ok(report)
}

/// The report with the latest start date.
pub fn latest_weekly_report(conn: &Connection) -> Result<Option<WeeklyReport>> {
    let report = conn
        .query_row(
            &format!(
                "SELECT {WEEKLY_COLUMNS} FROM weekly_reports ORDER BY start_date DESC, end_date DESC LIMIT 1"
            ),
            [],
            weekly_from_row,
        )
        .optional()?;
    Ok(report)
}

pub fn list_weekly_reports(conn: &Connection) -> Result<Vec<WeeklyReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {WEEKLY_COLUMNS} FROM weekly_reports ORDER BY start_date DESC"
    ))?;
    let rows = stmt
        .query_map([], weekly_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_weekly_report(conn: &Connection, start_date: &str, end_date: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM weekly_reports WHERE start_date = ?1 AND end_date = ?2",
        params![start_date, end_date],
    )?;
    Ok(rows > 0)
}

// --- OKR reports ---

pub fn save_okr_report(conn: &Connection, creation_date: &str, content: &str) -> Result<OkrReport> {
    let now = now();
    conn.execute(
        "INSERT INTO okr_reports (creation_date, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
         ON CONFLICT(creation_date) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        params![creation_date, content, now],
    )?;

    match get_okr_report(conn, creation_date)? {
        Some(report) => Ok(report),
        None => bail!("OKR report {creation_date} vanished after save"),
    }
}

pub fn get_okr_report(conn: &Connection, creation_date: &str) -> Result<Option<OkrReport>> {
    let report = conn
        .query_row(
            &format!("SELECT {OKR_COLUMNS} FROM okr_reports WHERE creation_date = ?1"),
            params![creation_date],
            okr_from_row,
        )
        .optional()?;
    Ok(report)
}

pub fn latest_okr_report(conn: &Connection) -> Result<Option<OkrReport>> {
    let report = conn
        .query_row(
            &format!("SELECT {OKR_COLUMNS} FROM okr_reports ORDER BY creation_date DESC LIMIT 1"),
            [],
            okr_from_row,
        )
        .optional()?;
    Ok(report)
}

pub fn list_okr_reports(conn: &Connection) -> Result<Vec<OkrReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OKR_COLUMNS} FROM okr_reports ORDER BY creation_date DESC"
    ))?;
    let rows = stmt
        .query_map([], okr_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_okr_report(conn: &Connection, creation_date: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM okr_reports WHERE creation_date = ?1",
        params![creation_date],
    )?;
    Ok(rows > 0)
}

// --- TODO items ---

/// Append a TODO at the end of the list.
pub fn create_todo(conn: &Connection, content: &str) -> Result<TodoItem> {
    if content.trim().is_empty() {
        bail!("todo content must not be empty");
    }
    let now = now();
    conn.execute(
        "INSERT INTO todo_items (content, completed, sort_order, created_at, updated_at) \
         VALUES (?1, 0, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM todo_items), ?2, ?2)",
        params![content, now],
    )?;
    let id = conn.last_insert_rowid();

    match get_todo(conn, id)? {
        Some(item) => Ok(item),
        None => bail!("todo {id} vanished after insert"),
    }
}

pub fn get_todo(conn: &Connection, id: i64) -> Result<Option<TodoItem>> {
    let item = conn
        .query_row(
            &format!("SELECT {TODO_COLUMNS} FROM todo_items WHERE id = ?1"),
            params![id],
            todo_from_row,
        )
        .optional()?;
    Ok(item)
}

/// All TODOs in list order.
pub fn list_todos(conn: &Connection) -> Result<Vec<TodoItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TODO_COLUMNS} FROM todo_items ORDER BY sort_order ASC, id ASC"
    ))?;
    let rows = stmt
        .query_map([], todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Change content and/or completion. `None` leaves a field alone; returns
/// `None` if the item does not exist.
pub fn update_todo(
    conn: &Connection,
    id: i64,
    content: Option<&str>,
    completed: Option<bool>,
) -> Result<Option<TodoItem>> {
    let Some(existing) = get_todo(conn, id)? else {
        return Ok(None);
    };
    if content.is_none() && completed.is_none() {
        return Ok(Some(existing));
    }

    let now = now();
    let content = content.unwrap_or(existing.content.as_str());
    let completed = completed.unwrap_or(existing.completed);
    let completed_at = match (existing.completed, completed) {
        (false, true) => Some(now.clone()),
        (_, false) => None,
        (true, true) => existing.completed_at.clone(),
    };

    conn.execute(
        "UPDATE todo_items SET content = ?1, completed = ?2, completed_at = ?3, updated_at = ?4 WHERE id = ?5",
        params![content, completed as i64, completed_at, now, id],
    )?;
    get_todo(conn, id)
}

pub fn delete_todo(conn: &Connection, id: i64) -> Result<bool> {
    let rows = conn.execute("DELETE FROM todo_items WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}
