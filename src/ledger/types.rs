//! Ledger record types.
//!
//! Report rows ([`DailyReport`], [`WeeklyReport`], [`OkrReport`], [`TodoItem`])
//! and career-asset rows ([`Project`], [`WorkItem`], [`Skill`]). Timestamps
//! are RFC 3339 strings; calendar dates are `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::similarity::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub entry_date: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub start_date: String,
    pub end_date: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkrReport {
    pub creation_date: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub content: String,
    pub completed: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
    /// Set when `completed` flips to true, cleared when it flips back.
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("unknown project status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Candidate for Project {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A work item before it is linked to a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkItemDraft {
    /// Date of the daily log the item came from (YYYY-MM-DD).
    pub raw_log_date: String,
    /// Free-form project name; resolved against existing projects by similarity.
    pub project_name: Option<String>,
    pub action: Option<String>,
    pub problem: Option<String>,
    pub result_metric: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub raw_log_date: String,
    pub project_id: Option<String>,
    pub action: Option<String>,
    pub problem: Option<String>,
    pub result_metric: Option<String>,
    pub skills: Vec<String>,
    pub created_at: String,
}

/// Result of [`super::assets::link_work_item`].
#[derive(Debug, Serialize)]
pub struct LinkedWorkItem {
    pub work_item: WorkItem,
    pub project: Option<Project>,
    /// No existing project scored at or above the threshold.
    pub project_created: bool,
    /// Similarity of the draft's project name to the project it was linked to.
    pub match_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Tech,
    Soft,
    Domain,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Soft => "soft",
            Self::Domain => "domain",
        }
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tech" => Ok(Self::Tech),
            "soft" => Ok(Self::Soft),
            "domain" => Ok(Self::Domain),
            _ => Err(format!("unknown skill category: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: Option<SkillCategory>,
    pub count: i64,
    pub first_used_date: Option<String>,
    pub last_used_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct SkillsStats {
    /// Ten most-used skills.
    pub top_skills: Vec<SkillCount>,
    /// Summed usage per category; uncategorised skills are left out.
    pub by_category: BTreeMap<SkillCategory, i64>,
    pub total_unique: i64,
}

#[derive(Debug, Serialize)]
pub struct MergeResult {
    pub target_id: String,
    pub merged_work_items: usize,
    pub deleted_projects: usize,
}

/// Every ledger table, for `workpilot export`.
#[derive(Debug, Serialize)]
pub struct LedgerExport {
    pub exported_at: String,
    pub schema_version: u32,
    pub daily_reports: Vec<DailyReport>,
    pub weekly_reports: Vec<WeeklyReport>,
    pub okr_reports: Vec<OkrReport>,
    pub todo_items: Vec<TodoItem>,
    pub projects: Vec<Project>,
    pub work_items: Vec<WorkItem>,
    pub skills: Vec<Skill>,
}
