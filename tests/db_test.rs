mod helpers;

use rusqlite::{params, Connection};
use workpilot::db::{self, migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION}};
use workpilot::ledger;

fn table_names(conn: &Connection) -> Vec<String> {
    conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn fresh_db_has_every_table_at_current_version() {
    let conn = helpers::test_db();
    let tables = table_names(&conn);
    for table in [
        "daily_reports",
        "weekly_reports",
        "okr_reports",
        "todo_items",
        "projects",
        "work_items",
        "skills",
        "schema_meta",
    ] {
        assert!(tables.iter().any(|t| t == table), "missing table {table}");
    }
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn on_disk_db_creates_parent_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("workpilot.db");

    {
        let conn = db::open_database(&path).unwrap();
        ledger::save_daily_report(&conn, "2025-12-08", "完成部署").unwrap();
    }

    let conn = db::open_database(&path).unwrap();
    let report = ledger::get_daily_report(&conn, "2025-12-08").unwrap().unwrap();
    assert_eq!(report.content, "完成部署");
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn v1_database_gains_completed_at_with_backfill() {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), 1);

    conn.execute(
        "INSERT INTO todo_items (content, completed, sort_order, created_at, updated_at) VALUES (?1, 1, 1, ?2, ?2)",
        params!["done", "2025-12-01T00:00:00+00:00"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO todo_items (content, completed, sort_order, created_at, updated_at) VALUES (?1, 0, 2, ?2, ?2)",
        params!["open", "2025-12-02T00:00:00+00:00"],
    )
    .unwrap();

    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

    let todos = ledger::list_todos(&conn).unwrap();
    assert_eq!(todos[0].completed_at.as_deref(), Some("2025-12-01T00:00:00+00:00"));
    assert!(todos[1].completed_at.is_none());

    // second run is a no-op
    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn health_report_counts_rows() {
    let mut conn = helpers::test_db();
    ledger::save_okr_report(&conn, "2025-12-12", "OKR").unwrap();
    ledger::link_work_item(
        &mut conn,
        &helpers::draft("2025-12-08", Some("订单中心"), &["SQL", "Redis"]),
        0.6,
    )
    .unwrap();

    let health = db::check_database_health(&conn).unwrap();
    assert!(health.integrity_ok);
    assert_eq!(health.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(health.okr_report_count, 1);
    assert_eq!(health.project_count, 1);
    assert_eq!(health.work_item_count, 1);
    assert_eq!(health.skill_count, 2);
    assert_eq!(health.daily_report_count, 0);
}
