mod helpers;

use helpers::draft;
use workpilot::ledger::{self, ProjectStatus, SkillCategory};
use workpilot::similarity::DEFAULT_THRESHOLD;

#[test]
fn work_items_collapse_onto_similar_project() {
    let mut conn = helpers::test_db();

    let first = ledger::link_work_item(
        &mut conn,
        &draft("2025-12-08", Some("文档提取系统"), &["Python"]),
        DEFAULT_THRESHOLD,
    )
    .unwrap();
    assert!(first.project_created);
    let project = first.project.unwrap();
    assert_eq!(project.name, "文档提取系统");

    let second = ledger::link_work_item(
        &mut conn,
        &draft("2025-12-09", Some("文档提取"), &["python"]),
        DEFAULT_THRESHOLD,
    )
    .unwrap();
    assert!(!second.project_created);
    assert_eq!(second.project.as_ref().map(|p| p.id.as_str()), Some(project.id.as_str()));
    let score = second.match_score.unwrap();
    assert!((score - 4.0 / 6.0).abs() < 1e-9);

    assert_eq!(ledger::list_projects(&conn, None).unwrap().len(), 1);
    assert_eq!(ledger::list_work_items(&conn, Some(&project.id)).unwrap().len(), 2);
}

#[test]
fn exact_name_scores_one() {
    let mut conn = helpers::test_db();
    ledger::create_project(&conn, "订单中心", Some("core orders")).unwrap();

    let linked = ledger::link_work_item(&mut conn, &draft("2025-12-08", Some(" 订单中心 "), &[]), DEFAULT_THRESHOLD)
        .unwrap();
    assert_eq!(linked.match_score, Some(1.0));
    assert!(!linked.project_created);
}

#[test]
fn dissimilar_name_creates_new_project() {
    let mut conn = helpers::test_db();
    ledger::create_project(&conn, "订单中心", None).unwrap();

    let linked = ledger::link_work_item(&mut conn, &draft("2025-12-08", Some("用户画像"), &[]), DEFAULT_THRESHOLD)
        .unwrap();
    assert!(linked.project_created);
    assert!(linked.match_score.is_none());
    assert_eq!(ledger::list_projects(&conn, None).unwrap().len(), 2);
}

#[test]
fn placeholder_project_leaves_item_unlinked() {
    let mut conn = helpers::test_db();
    let linked = ledger::link_work_item(&mut conn, &draft("2025-12-08", Some("待补充"), &["null", "SQL"]), DEFAULT_THRESHOLD)
        .unwrap();

    assert!(linked.project.is_none());
    assert!(linked.work_item.project_id.is_none());
    assert_eq!(linked.work_item.skills, vec!["SQL"]);
    assert!(ledger::list_projects(&conn, None).unwrap().is_empty());
}

#[test]
fn invalid_log_date_is_rejected_without_writes() {
    let mut conn = helpers::test_db();
    let result = ledger::link_work_item(&mut conn, &draft("2025/12/08", Some("订单中心"), &["SQL"]), DEFAULT_THRESHOLD);

    assert!(result.is_err());
    assert!(ledger::list_projects(&conn, None).unwrap().is_empty());
    assert!(ledger::list_skills(&conn).unwrap().is_empty());
}

#[test]
fn skills_accumulate_with_date_bounds() {
    let mut conn = helpers::test_db();
    for (date, skills) in [
        ("2025-12-09", vec!["Redis", "跨部门沟通"]),
        ("2025-12-01", vec!["Redis"]),
        ("2025-12-15", vec!["Redis", "供应链"]),
    ] {
        ledger::link_work_item(&mut conn, &draft(date, None, &skills), DEFAULT_THRESHOLD).unwrap();
    }

    let skills = ledger::list_skills(&conn).unwrap();
    let redis = &skills[0];
    assert_eq!(redis.name, "Redis");
    assert_eq!(redis.count, 3);
    assert_eq!(redis.category, Some(SkillCategory::Tech));
    assert_eq!(redis.first_used_date.as_deref(), Some("2025-12-01"));
    assert_eq!(redis.last_used_date.as_deref(), Some("2025-12-15"));

    let stats = ledger::skills_stats(&conn).unwrap();
    assert_eq!(stats.total_unique, 3);
    assert_eq!(stats.top_skills[0].name, "Redis");
    assert_eq!(stats.by_category.get(&SkillCategory::Tech), Some(&3));
    assert_eq!(stats.by_category.get(&SkillCategory::Soft), Some(&1));
    assert_eq!(stats.by_category.get(&SkillCategory::Domain), Some(&1));
}

#[test]
fn explicit_category_is_not_overwritten() {
    let conn = helpers::test_db();
    ledger::upsert_skill(&conn, "文档", Some(SkillCategory::Domain), "2025-12-01").unwrap();
    let skill = ledger::upsert_skill(&conn, "文档", None, "2025-12-02").unwrap().unwrap();

    assert_eq!(skill.category, Some(SkillCategory::Domain));
    assert_eq!(skill.count, 2);
    assert!(ledger::upsert_skill(&conn, "none", None, "2025-12-02").unwrap().is_none());
}

#[test]
fn similar_groups_then_merge() {
    let mut conn = helpers::test_db();
    for name in ["文档提取系统", "文档提取", "订单中心", "文档提取系统优化"] {
        ledger::link_work_item(&mut conn, &draft("2025-12-08", Some(name), &[]), 0.99).unwrap();
    }
    assert_eq!(ledger::list_projects(&conn, None).unwrap().len(), 4);

    let groups = ledger::find_similar_project_groups(&conn, DEFAULT_THRESHOLD).unwrap();
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.recommended_target.name, "文档提取");
    assert_eq!(group.members.len(), 3);

    let target = group.recommended_target.id.clone();
    let mut sources = group.member_ids.clone();
    sources.push(target.clone());

    let result = ledger::merge_projects(&mut conn, &target, &sources).unwrap();
    assert_eq!(result.target_id, target);
    assert_eq!(result.deleted_projects, 2);
    assert_eq!(result.merged_work_items, 2);

    let remaining = ledger::list_projects(&conn, None).unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().any(|p| p.id == target));
    assert_eq!(ledger::list_work_items(&conn, Some(&target)).unwrap().len(), 3);
}

#[test]
fn merge_into_missing_target_fails() {
    let mut conn = helpers::test_db();
    let p = ledger::create_project(&conn, "订单中心", None).unwrap();
    assert!(ledger::merge_projects(&mut conn, "no-such-id", &[p.id.clone()]).is_err());
    assert!(ledger::get_project(&conn, &p.id).unwrap().is_some());
}

#[test]
fn deleting_project_unlinks_work_items() {
    let mut conn = helpers::test_db();
    let linked = ledger::link_work_item(&mut conn, &draft("2025-12-08", Some("订单中心"), &[]), DEFAULT_THRESHOLD)
        .unwrap();
    let project_id = linked.project.unwrap().id;

    assert!(ledger::delete_project(&conn, &project_id).unwrap());
    let items = ledger::list_work_items(&conn, None).unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].project_id.is_none());
}

#[test]
fn archived_projects_filter() {
    let conn = helpers::test_db();
    let a = ledger::create_project(&conn, "订单中心", None).unwrap();
    ledger::create_project(&conn, "用户画像", None).unwrap();
    assert!(ledger::assets::set_project_status(&conn, &a.id, ProjectStatus::Archived).unwrap());

    let active = ledger::list_projects(&conn, Some(ProjectStatus::Active)).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "用户画像");
    assert!(ledger::create_project(&conn, "订单中心", None).is_err());
}

#[test]
fn reports_and_todos_round_through_export() {
    let conn = helpers::test_db();
    ledger::save_daily_report(&conn, "2025-12-08", "A").unwrap();
    ledger::save_daily_report(&conn, "2025-12-09", "B").unwrap();
    ledger::save_weekly_report(&conn, "2025-12-08", "2025-12-12", "周报").unwrap();
    ledger::save_okr_report(&conn, "2025-12-12", "OKR").unwrap();
    let todo = ledger::create_todo(&conn, "写周报").unwrap();
    let done = ledger::update_todo(&conn, todo.id, None, Some(true)).unwrap().unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    let export = ledger::export_ledger(&conn).unwrap();
    assert_eq!(export.schema_version, workpilot::db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(export.daily_reports.len(), 2);
    assert_eq!(export.weekly_reports.len(), 1);
    assert_eq!(export.okr_reports.len(), 1);
    assert_eq!(export.todo_items.len(), 1);

    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["todo_items"][0]["content"], "写周报");
}
