//! Career assets: projects, work items, and skills.
//!
//! Work items arrive as drafts naming a project loosely ("文档提取", "文档提取系统").
//! [`link_work_item`] resolves that name against existing projects with the
//! similarity matcher so near-duplicates collapse onto one project instead of
//! multiplying. [`find_similar_project_groups`] and [`merge_projects`] clean
//! up whatever slipped through.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{
    LinkedWorkItem, MergeResult, Project, ProjectStatus, Skill, SkillCategory, SkillCount,
    SkillsStats, WorkItem, WorkItemDraft,
};
use crate::similarity::{best_match, find_groups, SimilarityGroup};

/// Names treated as "no value" for projects and skills.
const PLACEHOLDER_NAMES: &[&str] = &["", "null", "none", "undefined", "待补充"];

pub fn is_placeholder_name(name: &str) -> bool {
    let folded = name.trim().to_lowercase();
    PLACEHOLDER_NAMES.contains(&folded.as_str())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// --- projects ---

const PROJECT_COLUMNS: &str = "id, name, description, status, created_at, updated_at";

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    let status: String = row.get(3)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: status.parse().unwrap_or(ProjectStatus::Active),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn create_project(conn: &Connection, name: &str, description: Option<&str>) -> Result<Project> {
    let name = name.trim();
    if is_placeholder_name(name) {
        bail!("project name must not be empty or a placeholder");
    }

    let id = uuid::Uuid::now_v7().to_string();
    let now = now();
    conn.execute(
        "INSERT INTO projects (id, name, description, status, created_at, updated_at) VALUES (?1, ?2, ?3, 'active', ?4, ?4)",
        params![id, name, description, now],
    )
    .with_context(|| format!("failed to create project {name:?}"))?;
    tracing::info!(project_id = %id, name, "project created");

    match get_project(conn, &id)? {
        Some(project) => Ok(project),
        None => bail!("project {id} vanished after insert"),
    }
}

pub fn get_project(conn: &Connection, id: &str) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

pub fn get_project_by_name(conn: &Connection, name: &str) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE name = ?1"),
            params![name.trim()],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

/// Projects in creation order, optionally filtered by status.
pub fn list_projects(conn: &Connection, status: Option<ProjectStatus>) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE ?1 IS NULL OR status = ?1 ORDER BY created_at, id"
    ))?;
    let rows = stmt
        .query_map(params![status.map(|s| s.as_str())], project_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn set_project_status(conn: &Connection, id: &str, status: ProjectStatus) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now(), id],
    )?;
    Ok(rows > 0)
}

/// Delete a project. Its work items stay, unlinked.
pub fn delete_project(conn: &Connection, id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

// --- work items ---

const WORK_ITEM_COLUMNS: &str =
    "id, raw_log_date, project_id, action, problem, result_metric, skills_tags, created_at";

fn work_item_from_row(row: &Row) -> rusqlite::Result<WorkItem> {
    let tags: Option<String> = row.get(6)?;
    Ok(WorkItem {
        id: row.get(0)?,
        raw_log_date: row.get(1)?,
        project_id: row.get(2)?,
        action: row.get(3)?,
        problem: row.get(4)?,
        result_metric: row.get(5)?,
        skills: tags
            .and_then(|t| serde_json::from_str(&t).ok())
            .unwrap_or_default(),
        created_at: row.get(7)?,
    })
}

/// Find the project a draft's name refers to, creating one when nothing is
/// close enough. Returns `(project, created, score)`.
fn resolve_project(
    conn: &Connection,
    name: Option<&str>,
    threshold: f64,
) -> Result<(Option<Project>, bool, Option<f64>)> {
    let Some(name) = name.map(str::trim).filter(|n| !is_placeholder_name(n)) else {
        return Ok((None, false, None));
    };

    if let Some(project) = get_project_by_name(conn, name)? {
        return Ok((Some(project), false, Some(1.0)));
    }

    let projects = list_projects(conn, None)?;
    if let Some(m) = best_match(name, &projects, threshold) {
        tracing::debug!(draft = name, matched = %m.candidate.name, score = m.score, "project name matched");
        return Ok((Some(m.candidate.clone()), false, Some(m.score)));
    }

    let project = create_project(conn, name, None)?;
    Ok((Some(project), true, None))
}

/// Store a work item under the project its draft names, and count its skills.
///
/// Runs in one transaction.
pub fn link_work_item(
    conn: &mut Connection,
    draft: &WorkItemDraft,
    threshold: f64,
) -> Result<LinkedWorkItem> {
    NaiveDate::parse_from_str(&draft.raw_log_date, "%Y-%m-%d")
        .with_context(|| format!("invalid raw_log_date {:?}", draft.raw_log_date))?;

    let tx = conn.transaction()?;

    let (project, project_created, match_score) =
        resolve_project(&tx, draft.project_name.as_deref(), threshold)?;

    let skills: Vec<String> = draft
        .skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !is_placeholder_name(s))
        .collect();

    let id = uuid::Uuid::now_v7().to_string();
    let project_id = project.as_ref().map(|p| p.id.clone());
    tx.execute(
        "INSERT INTO work_items (id, raw_log_date, project_id, action, problem, result_metric, skills_tags, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            draft.raw_log_date,
            project_id,
            draft.action,
            draft.problem,
            draft.result_metric,
            serde_json::to_string(&skills)?,
            now(),
        ],
    )?;

    for skill in &skills {
        upsert_skill(&tx, skill, None, &draft.raw_log_date)?;
    }

    let work_item = tx.query_row(
        &format!("SELECT {WORK_ITEM_COLUMNS} FROM work_items WHERE id = ?1"),
        params![id],
        work_item_from_row,
    )?;
    tx.commit()?;

    tracing::info!(
        work_item = %work_item.id,
        project = project.as_ref().map(|p| p.name.as_str()).unwrap_or("-"),
        project_created,
        skills = skills.len(),
        "work item linked"
    );

    Ok(LinkedWorkItem {
        work_item,
        project,
        project_created,
        match_score,
    })
}

/// Work items for one project, or all of them, oldest log date first.
pub fn list_work_items(conn: &Connection, project_id: Option<&str>) -> Result<Vec<WorkItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {WORK_ITEM_COLUMNS} FROM work_items WHERE ?1 IS NULL OR project_id = ?1 ORDER BY raw_log_date, id"
    ))?;
    let rows = stmt
        .query_map(params![project_id], work_item_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// --- skills ---

const TECH_KEYWORDS: &[&str] = &[
    "python", "java", "javascript", "typescript", "react", "vue", "angular", "node", "sql",
    "mysql", "postgresql", "mongodb", "redis", "docker", "kubernetes", "k8s", "aws", "azure",
    "gcp", "git", "linux", "shell", "api", "rest", "graphql", "json", "xml", "html", "css",
    "sass", "webpack", "nginx", "apache", "flask", "django", "spring", "golang", "rust", "c++",
    "c#", ".net", "swift", "kotlin", "flutter", "dart", "tensorflow", "pytorch", "ai", "ml",
    "机器学习", "深度学习", "算法", "前端", "后端", "全栈", "架构", "数据库", "缓存", "微服务",
    "容器", "代码", "开发", "编程", "测试", "自动化", "ci", "cd", "devops", "性能优化", "重构",
    "调试", "debug", "接口", "系统", "服务", "部署", "excel", "vba", "power bi", "tableau",
    "数据分析", "可视化",
];

const SOFT_KEYWORDS: &[&str] = &[
    "沟通", "协调", "汇报", "表达", "演讲", "培训", "指导", "带教", "团队", "协作", "配合",
    "管理", "领导", "规划", "计划", "组织", "分析", "思考", "解决问题", "决策", "判断", "创新",
    "学习", "时间管理", "项目管理", "文档", "写作", "总结", "复盘", "反思", "跨部门", "对接",
    "推进", "跟进", "落地", "执行", "谈判", "需求分析",
];

const DOMAIN_KEYWORDS: &[&str] = &[
    "财务", "会计", "预算", "成本", "审计", "税务", "报表", "人力", "hr", "招聘", "绩效",
    "薪酬", "培训", "销售", "营销", "市场", "客户", "运营", "产品", "供应链", "采购", "物流",
    "仓储", "生产", "制造", "质量", "法务", "合规", "知识产权", "行政", "后勤", "业务", "流程",
    "制度", "标准", "规范", "汽车", "零部件", "检验", "控制计划", "工艺", "设备",
];

/// Guess a skill's category from its name. Tables are tried tech, soft, then
/// domain; the first substring hit wins.
pub fn infer_skill_category(name: &str) -> Option<SkillCategory> {
    let folded = name.to_lowercase();
    [
        (SkillCategory::Tech, TECH_KEYWORDS),
        (SkillCategory::Soft, SOFT_KEYWORDS),
        (SkillCategory::Domain, DOMAIN_KEYWORDS),
    ]
    .into_iter()
    .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
    .map(|(category, _)| category)
}

const SKILL_COLUMNS: &str = "id, name, category, count, first_used_date, last_used_date";

fn skill_from_row(row: &Row) -> rusqlite::Result<Skill> {
    let category: Option<String> = row.get(2)?;
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        category: category.and_then(|c| c.parse().ok()),
        count: row.get(3)?,
        first_used_date: row.get(4)?,
        last_used_date: row.get(5)?,
    })
}

/// Count one use of a skill on `used_on`.
///
/// Placeholder names are ignored (`Ok(None)`). A missing category is inferred
/// from the name; an existing category is never overwritten.
pub fn upsert_skill(
    conn: &Connection,
    name: &str,
    category: Option<SkillCategory>,
    used_on: &str,
) -> Result<Option<Skill>> {
    if is_placeholder_name(name) {
        return Ok(None);
    }
    let name = name.trim();
    let category = category.or_else(|| infer_skill_category(name));

    conn.execute(
        "INSERT INTO skills (id, name, category, count, first_used_date, last_used_date) VALUES (?1, ?2, ?3, 1, ?4, ?4) \
         ON CONFLICT(name) DO UPDATE SET \
             count = count + 1, \
             category = COALESCE(category, excluded.category), \
             first_used_date = MIN(COALESCE(first_used_date, excluded.first_used_date), excluded.first_used_date), \
             last_used_date = MAX(COALESCE(last_used_date, excluded.last_used_date), excluded.last_used_date)",
        params![
            uuid::Uuid::now_v7().to_string(),
            name,
            category.map(|c| c.as_str()),
            used_on,
        ],
    )?;

    let skill = conn
        .query_row(
            &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE name = ?1"),
            params![name],
            skill_from_row,
        )
        .optional()?;
    Ok(skill)
}

/// Skills by usage, most used first.
pub fn list_skills(conn: &Connection) -> Result<Vec<Skill>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills ORDER BY count DESC, name ASC"
    ))?;
    let rows = stmt
        .query_map([], skill_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn skills_stats(conn: &Connection) -> Result<SkillsStats> {
    let skills = list_skills(conn)?;

    let mut by_category = std::collections::BTreeMap::new();
    for skill in &skills {
        if let Some(category) = skill.category {
            *by_category.entry(category).or_insert(0) += skill.count;
        }
    }

    Ok(SkillsStats {
        total_unique: skills.len() as i64,
        top_skills: skills
            .iter()
            .take(10)
            .map(|s| SkillCount {
                name: s.name.clone(),
                count: s.count,
            })
            .collect(),
        by_category,
    })
}

// --- consolidation ---

/// Groups of projects whose names look alike. Placeholder names are skipped.
pub fn find_similar_project_groups(
    conn: &Connection,
    threshold: f64,
) -> Result<Vec<SimilarityGroup<Project, String>>> {
    let projects: Vec<Project> = list_projects(conn, None)?
        .into_iter()
        .filter(|p| !is_placeholder_name(&p.name))
        .collect();
    Ok(find_groups(&projects, threshold))
}

/// Move every work item of `source_ids` onto `target_id`, then delete the
/// sources. The target is never deleted even if listed as a source.
pub fn merge_projects(
    conn: &mut Connection,
    target_id: &str,
    source_ids: &[String],
) -> Result<MergeResult> {
    let tx = conn.transaction()?;

    let Some(target) = get_project(&tx, target_id)? else {
        bail!("target project {target_id} not found");
    };

    let mut sources: Vec<&str> = source_ids
        .iter()
        .map(String::as_str)
        .filter(|id| *id != target_id)
        .collect();
    sources.sort_unstable();
    sources.dedup();

    let mut merged_work_items = 0;
    let mut deleted_projects = 0;
    for source in &sources {
        merged_work_items += tx.execute(
            "UPDATE work_items SET project_id = ?1 WHERE project_id = ?2",
            params![target_id, source],
        )?;
        deleted_projects += tx.execute("DELETE FROM projects WHERE id = ?1", params![source])?;
    }

    if deleted_projects > 0 {
        tx.execute(
            "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
            params![now(), target_id],
        )?;
    }
    tx.commit()?;

    tracing::info!(
        target = %target.name,
        merged_work_items,
        deleted_projects,
        "projects merged"
    );

    Ok(MergeResult {
        target_id: target.id,
        merged_work_items,
        deleted_projects,
    })
}
