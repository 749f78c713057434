use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use plano_core::action::Action;
use plano_core::completion;
use plano_core::deliverable::Deliverable;
use plano_core::evidence::Evidence;
use plano_core::program::Program;
use plano_core::repository::RepositoryExt;
use plano_core::types::{ActionStatus, EvidenceKind};
use serde::Deserialize;

use super::{created, viewer, ViewerQuery};
use crate::error::{blocking, AppError};
use crate::state::AppState;

/// GET /api/actions/{id}: action with deliverables, evidence and whether it
/// may be completed. With `?user=`, `editable` follows the owning program's
/// unit.
pub async fn get_action(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ViewerQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = app.repo.clone();
    let result = blocking(move || {
        let action: Action = repo.load(&id)?;
        let editable = match viewer(repo.as_ref(), q.user.as_deref())? {
            Some(user) => {
                let program: Program = repo.load(&action.program_id)?;
                Some(user.can_edit(&program.unit_id))
            }
            None => None,
        };
        let evidence = repo.list_by::<Evidence>(&id)?;
        Ok(serde_json::json!({
            "editable": editable,
            "action": action,
            "deliverables": repo.list_by::<Deliverable>(&id)?,
            "can_complete": !evidence.is_empty(),
            "evidence": evidence,
        }))
    })
    .await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct SetStatusBody {
    pub status: String,
}

/// PUT /api/actions/{id}/status: manual status change through the
/// completion gate.
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<Action>, AppError> {
    let status: ActionStatus = body
        .status
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid status '{}'", body.status)))?;
    let repo = app.repo.clone();
    let action = blocking(move || completion::set_status(repo.as_ref(), &id, status)).await?;
    Ok(Json(action))
}

// ---------------------------------------------------------------------------
// Deliverables
// ---------------------------------------------------------------------------

/// GET /api/actions/{id}/deliverables
pub async fn list_deliverables(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Deliverable>>, AppError> {
    let repo = app.repo.clone();
    let deliverables = blocking(move || repo.list_by::<Deliverable>(&id)).await?;
    Ok(Json(deliverables))
}

#[derive(Deserialize)]
pub struct CreateDeliverableBody {
    pub description: String,
    pub quantity: f64,
    pub unit_of_measure: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// POST /api/actions/{id}/deliverables
pub async fn create_deliverable(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateDeliverableBody>,
) -> Result<(StatusCode, Json<Deliverable>), AppError> {
    let repo = app.repo.clone();
    let deliverable = blocking(move || {
        let mut d = Deliverable::new(id, body.description, body.quantity, body.unit_of_measure);
        d.date = body.date;
        repo.insert_child::<Action, _>(&d)?;
        Ok(d)
    })
    .await?;
    created(deliverable)
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// GET /api/actions/{id}/evidence
pub async fn list_evidence(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Evidence>>, AppError> {
    let repo = app.repo.clone();
    let evidence = blocking(move || repo.list_by::<Evidence>(&id)).await?;
    Ok(Json(evidence))
}

#[derive(Deserialize)]
pub struct CreateEvidenceBody {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub kind: EvidenceKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/actions/{id}/evidence: attach a file reference.
pub async fn create_evidence(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateEvidenceBody>,
) -> Result<(StatusCode, Json<Evidence>), AppError> {
    let repo = app.repo.clone();
    let evidence = blocking(move || {
        let mut ev = Evidence::new(id, body.title, body.url);
        ev.kind = body.kind;
        ev.description = body.description;
        repo.insert_child::<Action, _>(&ev)?;
        Ok(ev)
    })
    .await?;
    created(evidence)
}
