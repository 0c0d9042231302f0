//! JSON HTTP API.
//!
//! Thin handlers over the journal pipeline, validators, generators, and ledger.
//! Blocking work (SQLite, LLM calls) runs on `spawn_blocking`. Request bodies
//! are explicit structs; optional keys are `Option` fields.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::WorkPilotConfig;
use crate::error::ParseError;
use crate::generate::{self, GeneratedOkr, GeneratedReport};
use crate::journal::{self, ParseResult, WeekRange};
use crate::ledger::{
    self, DailyReport, LinkedWorkItem, MergeResult, OkrReport, Project, ProjectStatus, Skill,
    SkillsStats, TodoItem, WeeklyReport, WorkItem, WorkItemDraft,
};
use crate::llm;
use crate::similarity::SimilarityGroup;
use crate::validate::{self, OkrValidation, ReportValidation};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: Arc<WorkPilotConfig>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler failure, mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date {value:?}, expected YYYY-MM-DD")))
}

/// Run `f` against the database on the blocking pool.
async fn with_db<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> anyhow::Result<T> + Send + 'static,
{
    let db = Arc::clone(&state.db);
    tokio::task::spawn_blocking(move || {
        let mut conn = db
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("db task failed: {e}")))?
    .map_err(ApiError::Internal)
}

/// Build the `/api` router with permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/week-range", get(week_range))
        .route("/api/parse", post(parse))
        .route("/api/generate/weekly-report", post(generate_weekly_report))
        .route("/api/generate/okr", post(generate_okr))
        .route("/api/validate/weekly-report", post(validate_weekly_report))
        .route("/api/validate/okr", post(validate_okr))
        .route("/api/daily-reports", get(list_daily_reports))
        .route(
            "/api/daily-reports/{date}",
            get(get_daily_report).put(save_daily_report).delete(delete_daily_report),
        )
        .route(
            "/api/weekly-reports",
            get(list_weekly_reports)
                .post(save_weekly_report)
                .delete(delete_weekly_report),
        )
        .route("/api/weekly-reports/latest", get(latest_weekly_report))
        .route("/api/weekly-reports/query", get(get_weekly_report))
        .route("/api/okr-reports", get(list_okr_reports).post(save_okr_report))
        .route("/api/okr-reports/latest", get(latest_okr_report))
        .route(
            "/api/okr-reports/{date}",
            get(get_okr_report).delete(delete_okr_report),
        )
        .route("/api/todo-items", get(list_todos).post(create_todo))
        .route("/api/todo-items/{id}", put(update_todo).delete(delete_todo))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/similar", get(similar_projects))
        .route("/api/projects/merge", post(merge_projects))
        .route(
            "/api/projects/{id}",
            put(update_project).delete(delete_project),
        )
        .route("/api/work-items", get(list_work_items).post(link_work_item))
        .route("/api/skills", get(list_skills))
        .route("/api/skills/stats", get(skills_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// --- request / response bodies ---

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_configured: bool,
    pub max_input_chars: usize,
}

#[derive(Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct GenerateWeeklyRequest {
    pub content: String,
    pub use_mock: Option<bool>,
    /// Store the result under the parsed week range.
    pub save: Option<bool>,
}

#[derive(Deserialize)]
pub struct GenerateOkrRequest {
    pub content: String,
    pub next_quarter: Option<String>,
    pub use_mock: Option<bool>,
    /// Store the result under today's date.
    pub save: Option<bool>,
}

#[derive(Deserialize)]
pub struct ValidateReportRequest {
    pub report: String,
}

#[derive(Deserialize)]
pub struct ValidateOkrRequest {
    pub okr: String,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<f64>,
}

#[derive(Deserialize)]
pub struct ProjectQuery {
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
pub struct MergeRequest {
    pub target_id: String,
    pub source_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize)]
pub struct SaveWeeklyRequest {
    pub start_date: String,
    pub end_date: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct SaveOkrRequest {
    pub creation_date: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub content: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub status: ProjectStatus,
}

// --- stateless endpoints ---

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        llm_configured: state.config.llm.is_configured(),
        max_input_chars: state.config.report.max_input_chars,
    })
}

async fn week_range() -> Json<WeekRange> {
    Json(journal::current_week_range(today()))
}

async fn parse(
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> ApiResult<ParseResult> {
    journal::check_input_len(&req.content, state.config.report.max_input_chars)?;
    let result = journal::parse(&req.content, today())?;
    tracing::info!(blocks = result.blocks.len(), "parse served");
    Ok(Json(result))
}

async fn validate_weekly_report(Json(req): Json<ValidateReportRequest>) -> Json<ReportValidation> {
    Json(validate::validate_report(&req.report))
}

async fn validate_okr(Json(req): Json<ValidateOkrRequest>) -> Json<OkrValidation> {
    Json(validate::validate_okr(&req.okr))
}

// --- generation ---

async fn generate_weekly_report(
    State(state): State<AppState>,
    Json(req): Json<GenerateWeeklyRequest>,
) -> ApiResult<GeneratedReport> {
    let config = Arc::clone(&state.config);
    let use_mock = req.use_mock.unwrap_or(false);
    let save = req.save.unwrap_or(false);

    let generated = tokio::task::spawn_blocking(move || {
        let gateway = llm::create_gateway(&config.llm, use_mock);
        generate::generate_weekly_report(
            &req.content,
            today(),
            gateway.as_ref(),
            config.report.max_input_chars,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("generation task failed: {e}")))??;

    if save {
        let week = &generated.parsed.week_range;
        let (start, end) = (week.start.to_string(), week.end.to_string());
        let report = generated.report.clone();
        let saved =
            with_db(&state, move |conn| ledger::save_weekly_report(conn, &start, &end, &report))
                .await?;
        tracing::info!(start = %saved.start_date, end = %saved.end_date, "generated weekly report saved");
    }

    Ok(Json(generated))
}

async fn generate_okr(
    State(state): State<AppState>,
    Json(req): Json<GenerateOkrRequest>,
) -> ApiResult<GeneratedOkr> {
    let config = Arc::clone(&state.config);
    let use_mock = req.use_mock.unwrap_or(false);
    let save = req.save.unwrap_or(false);
    let quarter = req
        .next_quarter
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| config.report.default_quarter.clone());

    let generated = tokio::task::spawn_blocking(move || {
        let gateway = llm::create_gateway(&config.llm, use_mock);
        generate::generate_okr(
            &req.content,
            &quarter,
            today(),
            gateway.as_ref(),
            config.report.max_input_chars,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("generation task failed: {e}")))??;

    if save {
        let created = today().to_string();
        let okr = generated.okr.clone();
        let saved = with_db(&state, move |conn| ledger::save_okr_report(conn, &created, &okr)).await?;
        tracing::info!(date = %saved.creation_date, "generated OKR saved");
    }

    Ok(Json(generated))
}

// --- daily reports ---

async fn get_daily_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<DailyReport> {
    parse_date(&date)?;
    let lookup = date.clone();
    match with_db(&state, move |conn| ledger::get_daily_report(conn, &lookup)).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound(format!("no daily report for {date}"))),
    }
}

async fn save_daily_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<ContentRequest>,
) -> ApiResult<DailyReport> {
    parse_date(&date)?;
    journal::check_input_len(&req.content, state.config.report.max_input_chars)?;
    let report =
        with_db(&state, move |conn| ledger::save_daily_report(conn, &date, &req.content)).await?;
    Ok(Json(report))
}

async fn delete_daily_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, ApiError> {
    parse_date(&date)?;
    let lookup = date.clone();
    if with_db(&state, move |conn| ledger::delete_daily_report(conn, &lookup)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("no daily report for {date}")))
    }
}

/// Defaults to the current Monday to Friday week.
async fn list_daily_reports(
    State(state): State<AppState>,
    Query(q): Query<DateRangeQuery>,
) -> ApiResult<Vec<DailyReport>> {
    let week = journal::current_week_range(today());
    let start = match q.start {
        Some(s) => parse_date(&s)?,
        None => week.start,
    };
    let end = match q.end {
        Some(s) => parse_date(&s)?,
        None => week.end,
    };
    let (start, end) = (start.to_string(), end.to_string());
    let reports = with_db(&state, move |conn| ledger::list_daily_reports(conn, &start, &end)).await?;
    Ok(Json(reports))
}

// --- weekly reports ---

fn parse_week(start: &str, end: &str) -> Result<(), ApiError> {
    if parse_date(start)? > parse_date(end)? {
        return Err(ApiError::BadRequest(format!("start {start} is after end {end}")));
    }
    Ok(())
}

async fn list_weekly_reports(State(state): State<AppState>) -> ApiResult<Vec<WeeklyReport>> {
    let reports = with_db(&state, |conn| ledger::list_weekly_reports(conn)).await?;
    Ok(Json(reports))
}

async fn save_weekly_report(
    State(state): State<AppState>,
    Json(req): Json<SaveWeeklyRequest>,
) -> ApiResult<WeeklyReport> {
    parse_week(&req.start_date, &req.end_date)?;
    journal::check_input_len(&req.content, state.config.report.max_input_chars)?;
    let report = with_db(&state, move |conn| {
        ledger::save_weekly_report(conn, &req.start_date, &req.end_date, &req.content)
    })
    .await?;
    Ok(Json(report))
}

async fn get_weekly_report(
    State(state): State<AppState>,
    Query(q): Query<WeekQuery>,
) -> ApiResult<WeeklyReport> {
    parse_week(&q.start_date, &q.end_date)?;
    let (start, end) = (q.start_date.clone(), q.end_date.clone());
    match with_db(&state, move |conn| ledger::get_weekly_report(conn, &start, &end)).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound(format!(
            "no weekly report for {}..{}",
            q.start_date, q.end_date
        ))),
    }
}

async fn latest_weekly_report(State(state): State<AppState>) -> ApiResult<WeeklyReport> {
    match with_db(&state, |conn| ledger::latest_weekly_report(conn)).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound("no weekly reports saved".into())),
    }
}

async fn delete_weekly_report(
    State(state): State<AppState>,
    Query(q): Query<WeekQuery>,
) -> Result<StatusCode, ApiError> {
    parse_week(&q.start_date, &q.end_date)?;
    let (start, end) = (q.start_date.clone(), q.end_date.clone());
    if with_db(&state, move |conn| ledger::delete_weekly_report(conn, &start, &end)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "no weekly report for {}..{}",
            q.start_date, q.end_date
        )))
    }
}

// --- OKR reports ---

async fn list_okr_reports(State(state): State<AppState>) -> ApiResult<Vec<OkrReport>> {
    let reports = with_db(&state, |conn| ledger::list_okr_reports(conn)).await?;
    Ok(Json(reports))
}

/// Upsert keyed by creation date; also serves as update.
async fn save_okr_report(
    State(state): State<AppState>,
    Json(req): Json<SaveOkrRequest>,
) -> ApiResult<OkrReport> {
    parse_date(&req.creation_date)?;
    journal::check_input_len(&req.content, state.config.report.max_input_chars)?;
    let report = with_db(&state, move |conn| {
        ledger::save_okr_report(conn, &req.creation_date, &req.content)
    })
    .await?;
    Ok(Json(report))
}

async fn get_okr_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<OkrReport> {
    parse_date(&date)?;
    let lookup = date.clone();
    match with_db(&state, move |conn| ledger::get_okr_report(conn, &lookup)).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound(format!("no OKR report for {date}"))),
    }
}

async fn latest_okr_report(State(state): State<AppState>) -> ApiResult<OkrReport> {
    match with_db(&state, |conn| ledger::latest_okr_report(conn)).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::NotFound("no OKR reports saved".into())),
    }
}

async fn delete_okr_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, ApiError> {
    parse_date(&date)?;
    let lookup = date.clone();
    if with_db(&state, move |conn| ledger::delete_okr_report(conn, &lookup)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("no OKR report for {date}")))
    }
}

// --- TODO items ---

async fn list_todos(State(state): State<AppState>) -> ApiResult<Vec<TodoItem>> {
    let items = with_db(&state, |conn| ledger::list_todos(conn)).await?;
    Ok(Json(items))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> ApiResult<TodoItem> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("todo content must not be empty".into()));
    }
    let item = with_db(&state, move |conn| ledger::create_todo(conn, &req.content)).await?;
    Ok(Json(item))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<TodoItem> {
    if req.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ApiError::BadRequest("todo content must not be empty".into()));
    }
    let updated = with_db(&state, move |conn| {
        ledger::update_todo(conn, id, req.content.as_deref(), req.completed)
    })
    .await?;
    updated
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("todo {id} not found")))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if with_db(&state, move |conn| ledger::delete_todo(conn, id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("todo {id} not found")))
    }
}

// --- career assets ---

async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = with_db(&state, |conn| ledger::list_projects(conn, None)).await?;
    Ok(Json(projects))
}

async fn similar_projects(
    State(state): State<AppState>,
    Query(q): Query<ThresholdQuery>,
) -> ApiResult<Vec<SimilarityGroup<Project, String>>> {
    let threshold = q
        .threshold
        .unwrap_or(state.config.report.similarity_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ApiError::BadRequest("threshold must be between 0.0 and 1.0".into()));
    }
    let groups = with_db(&state, move |conn| {
        ledger::find_similar_project_groups(conn, threshold)
    })
    .await?;
    Ok(Json(groups))
}

async fn merge_projects(
    State(state): State<AppState>,
    Json(req): Json<MergeRequest>,
) -> ApiResult<MergeResult> {
    let target = req.target_id.clone();
    // Lookup and merge run under one lock.
    let merged = with_db(&state, move |conn| {
        if ledger::get_project(conn, &req.target_id)?.is_none() {
            return Ok(None);
        }
        ledger::merge_projects(conn, &req.target_id, &req.source_ids).map(Some)
    })
    .await?;
    merged
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("project {target} not found")))
}

/// Archive or reactivate a project.
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Project> {
    let lookup = id.clone();
    let updated = with_db(&state, move |conn| {
        if !ledger::set_project_status(conn, &lookup, req.status)? {
            return Ok(None);
        }
        ledger::get_project(conn, &lookup)
    })
    .await?;
    updated
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let lookup = id.clone();
    if with_db(&state, move |conn| ledger::delete_project(conn, &lookup)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("project {id} not found")))
    }
}

async fn link_work_item(
    State(state): State<AppState>,
    Json(draft): Json<WorkItemDraft>,
) -> ApiResult<LinkedWorkItem> {
    parse_date(&draft.raw_log_date)?;
    let threshold = state.config.report.similarity_threshold;
    let linked = with_db(&state, move |conn| ledger::link_work_item(conn, &draft, threshold)).await?;
    Ok(Json(linked))
}

async fn list_work_items(
    State(state): State<AppState>,
    Query(q): Query<ProjectQuery>,
) -> ApiResult<Vec<WorkItem>> {
    let items = with_db(&state, move |conn| {
        ledger::list_work_items(conn, q.project_id.as_deref())
    })
    .await?;
    Ok(Json(items))
}

async fn list_skills(State(state): State<AppState>) -> ApiResult<Vec<Skill>> {
    let skills = with_db(&state, |conn| ledger::list_skills(conn)).await?;
    Ok(Json(skills))
}

async fn skills_stats(State(state): State<AppState>) -> ApiResult<SkillsStats> {
    let stats = with_db(&state, |conn| ledger::skills_stats(conn)).await?;
    Ok(Json(stats))
}
