//! SQL DDL for all WorkPilot tables.
//!
//! Defines the report tables (`daily_reports`, `weekly_reports`,
//! `okr_reports`, `todo_items`), the career-asset tables (`projects`,
//! `work_items`, `skills`), and `schema_meta`. All DDL uses `IF NOT EXISTS`
//! for idempotent initialization. Columns added later arrive through
//! [`super::migrations`].

use rusqlite::Connection;

/// Version-1 DDL. Never edit in place; add a migration instead.
const SCHEMA_SQL: &str = r#"
-- Raw daily logs, one per calendar day
CREATE TABLE IF NOT EXISTS daily_reports (
    entry_date TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Saved weekly reports, keyed by their Monday to Friday span
CREATE TABLE IF NOT EXISTS weekly_reports (
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (start_date, end_date)
);

CREATE TABLE IF NOT EXISTS okr_reports (
    creation_date TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todo_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Career assets
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','archived')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS work_items (
    id TEXT PRIMARY KEY,
    raw_log_date TEXT NOT NULL,
    project_id TEXT REFERENCES projects(id) ON DELETE SET NULL,
    action TEXT,
    problem TEXT,
    result_metric TEXT,
    skills_tags TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_work_items_project ON work_items(project_id);
CREATE INDEX IF NOT EXISTS idx_work_items_date ON work_items(raw_log_date);

CREATE TABLE IF NOT EXISTS skills (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    category TEXT CHECK(category IN ('tech','soft','domain')),
    count INTEGER NOT NULL DEFAULT 0,
    first_used_date TEXT,
    last_used_date TEXT
);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
