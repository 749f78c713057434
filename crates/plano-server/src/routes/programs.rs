use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use plano_core::action::{Action, Project};
use plano_core::dashboard::{ProgramSummary, Snapshot};
use plano_core::indicator::Indicator;
use plano_core::program::Program;
use plano_core::readiness::{self, Readiness};
use plano_core::repository::RepositoryExt;
use plano_core::risk::Risk;
use serde::Deserialize;

use super::{created, viewer, ViewerQuery};
use crate::error::{blocking, AppError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProgramListQuery {
    pub unit: Option<String>,
    pub user: Option<String>,
}

/// GET /api/programs: list programs, optionally for one unit and scoped to
/// what `?user=` may see.
pub async fn list_programs(
    State(app): State<AppState>,
    Query(q): Query<ProgramListQuery>,
) -> Result<Json<Vec<Program>>, AppError> {
    let repo = app.repo.clone();
    let programs = blocking(move || {
        let viewer = viewer(repo.as_ref(), q.user.as_deref())?;
        let programs = match &q.unit {
            Some(unit) => repo.list_by::<Program>(unit)?,
            None => repo.list_all::<Program>()?,
        };
        Ok(programs
            .into_iter()
            .filter(|p| viewer.as_ref().map_or(true, |v| v.can_view(&p.unit_id)))
            .collect())
    })
    .await?;
    Ok(Json(programs))
}

#[derive(Deserialize)]
pub struct CreateProgramBody {
    pub unit_id: String,
    pub axis_id: String,
    pub name: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub target_audience: String,
}

/// POST /api/programs: create a program within the per-unit limit.
pub async fn create_program(
    State(app): State<AppState>,
    Json(body): Json<CreateProgramBody>,
) -> Result<(StatusCode, Json<Program>), AppError> {
    let repo = app.repo.clone();
    let limit = app.config.limits.programs_per_unit;
    let program = blocking(move || {
        let mut program = Program::new(body.unit_id, body.axis_id, body.name);
        program.objective = body.objective;
        program.problem = body.problem;
        program.target_audience = body.target_audience;
        Program::create(repo.as_ref(), &program, limit)?;
        Ok(program)
    })
    .await?;
    created(program)
}

/// GET /api/programs/{id}: program with its direct children. With
/// `?user=`, `editable` says whether that user gets edit affordances.
pub async fn get_program(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ViewerQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = app.repo.clone();
    let result = blocking(move || {
        let program: Program = repo.load(&id)?;
        let editable = viewer(repo.as_ref(), q.user.as_deref())?
            .map(|v| v.can_edit(&program.unit_id));
        Ok(serde_json::json!({
            "editable": editable,
            "program": program,
            "projects": repo.list_by::<Project>(&id)?,
            "actions": repo.list_by::<Action>(&id)?,
            "indicators": repo.list_by::<Indicator>(&id)?,
            "risks": repo.list_by::<Risk>(&id)?,
        }))
    })
    .await?;
    Ok(Json(result))
}

/// GET /api/programs/{id}/validate: readiness check.
pub async fn validate_program(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Readiness>, AppError> {
    let repo = app.repo.clone();
    let readiness = blocking(move || readiness::validate(repo.as_ref(), &id)).await?;
    Ok(Json(readiness))
}

/// GET /api/programs/{id}/dashboard: program summary.
pub async fn program_dashboard(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgramSummary>, AppError> {
    let repo = app.repo.clone();
    let summary = blocking(move || {
        let program: Program = repo.load(&id)?;
        Ok(Snapshot::load(repo.as_ref())?.program_summary(&program))
    })
    .await?;
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// GET /api/programs/{id}/projects
pub async fn list_projects(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Project>>, AppError> {
    let repo = app.repo.clone();
    let projects = blocking(move || repo.list_by::<Project>(&id)).await?;
    Ok(Json(projects))
}

#[derive(Deserialize)]
pub struct CreateProjectBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/programs/{id}/projects
pub async fn create_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let repo = app.repo.clone();
    let project = blocking(move || {
        let mut project = Project::new(id, body.name);
        project.description = body.description;
        repo.insert_child::<Program, _>(&project)?;
        Ok(project)
    })
    .await?;
    created(project)
}

/// GET /api/programs/{id}/actions
pub async fn list_actions(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Action>>, AppError> {
    let repo = app.repo.clone();
    let actions = blocking(move || repo.list_by::<Action>(&id)).await?;
    Ok(Json(actions))
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Deserialize)]
pub struct CreateActionBody {
    pub title: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_meeting_demand: bool,
}

/// POST /api/programs/{id}/actions: new actions always start `not_started`.
pub async fn create_action(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateActionBody>,
) -> Result<(StatusCode, Json<Action>), AppError> {
    let repo = app.repo.clone();
    let action = blocking(move || {
        let mut action = Action::new(id, body.title).with_dates(body.start_date, body.end_date);
        action.project_id = body.project_id;
        action.responsible = body.responsible;
        action.responsible_id = body.responsible_id;
        action.weight = body.weight;
        action.is_meeting_demand = body.is_meeting_demand;
        Action::create(repo.as_ref(), &action)?;
        Ok(action)
    })
    .await?;
    created(action)
}

/// GET /api/programs/{id}/indicators
pub async fn list_indicators(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Indicator>>, AppError> {
    let repo = app.repo.clone();
    let indicators = blocking(move || repo.list_by::<Indicator>(&id)).await?;
    Ok(Json(indicators))
}

#[derive(Deserialize)]
pub struct CreateIndicatorBody {
    pub name: String,
    pub baseline: f64,
    pub target: f64,
    pub unit_of_measure: String,
}

/// POST /api/programs/{id}/indicators
pub async fn create_indicator(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateIndicatorBody>,
) -> Result<(StatusCode, Json<Indicator>), AppError> {
    let repo = app.repo.clone();
    let indicator = blocking(move || {
        let indicator =
            Indicator::new(id, body.name, body.baseline, body.target, body.unit_of_measure);
        repo.insert_child::<Program, _>(&indicator)?;
        Ok(indicator)
    })
    .await?;
    created(indicator)
}

/// GET /api/programs/{id}/risks
pub async fn list_risks(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Risk>>, AppError> {
    let repo = app.repo.clone();
    let risks = blocking(move || repo.list_by::<Risk>(&id)).await?;
    Ok(Json(risks))
}

#[derive(Deserialize)]
pub struct CreateRiskBody {
    pub description: String,
    pub impact: u8,
    pub probability: u8,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// POST /api/programs/{id}/risks: severity is derived from the scores.
pub async fn create_risk(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateRiskBody>,
) -> Result<(StatusCode, Json<Risk>), AppError> {
    let repo = app.repo.clone();
    let risk = blocking(move || {
        let mut risk = Risk::new(id, body.description, body.impact, body.probability);
        risk.mitigation = body.mitigation;
        repo.insert_child::<Program, _>(&risk)?;
        Ok(risk)
    })
    .await?;
    created(risk)
}
