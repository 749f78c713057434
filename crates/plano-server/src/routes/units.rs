use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use plano_core::dashboard::{Snapshot, UnitSummary};
use plano_core::repository::RepositoryExt;
use plano_core::types::Role;
use plano_core::unit::{Axis, Unit};
use plano_core::user::UserProfile;
use serde::Deserialize;

use super::created;
use crate::error::{blocking, AppError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// GET /api/units: list all units.
pub async fn list_units(State(app): State<AppState>) -> Result<Json<Vec<Unit>>, AppError> {
    let repo = app.repo.clone();
    let units = blocking(move || repo.list_all::<Unit>()).await?;
    Ok(Json(units))
}

#[derive(Deserialize)]
pub struct CreateUnitBody {
    pub name: String,
    pub acronym: String,
}

/// POST /api/units: create a unit.
pub async fn create_unit(
    State(app): State<AppState>,
    Json(body): Json<CreateUnitBody>,
) -> Result<(StatusCode, Json<Unit>), AppError> {
    let repo = app.repo.clone();
    let unit = blocking(move || {
        let unit = Unit::new(body.name, body.acronym);
        repo.insert_record(&unit)?;
        Ok(unit)
    })
    .await?;
    created(unit)
}

/// GET /api/units/{id}: unit with its program summaries.
pub async fn get_unit(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UnitSummary>, AppError> {
    let repo = app.repo.clone();
    let summary = blocking(move || {
        let unit: Unit = repo.load(&id)?;
        Ok(Snapshot::load(repo.as_ref())?.unit_summary(&unit))
    })
    .await?;
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// GET /api/axes: list all axes.
pub async fn list_axes(State(app): State<AppState>) -> Result<Json<Vec<Axis>>, AppError> {
    let repo = app.repo.clone();
    let axes = blocking(move || repo.list_all::<Axis>()).await?;
    Ok(Json(axes))
}

#[derive(Deserialize)]
pub struct CreateAxisBody {
    pub name: String,
    pub color: String,
}

/// POST /api/axes: create an axis.
pub async fn create_axis(
    State(app): State<AppState>,
    Json(body): Json<CreateAxisBody>,
) -> Result<(StatusCode, Json<Axis>), AppError> {
    let repo = app.repo.clone();
    let axis = blocking(move || {
        let axis = Axis::new(body.name, body.color);
        repo.insert_record(&axis)?;
        Ok(axis)
    })
    .await?;
    created(axis)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/users: list all user profiles.
pub async fn list_users(
    State(app): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let repo = app.repo.clone();
    let users = blocking(move || repo.list_all::<UserProfile>()).await?;
    Ok(Json(users))
}

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
}

/// POST /api/users: register a user profile.
pub async fn create_user(
    State(app): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let repo = app.repo.clone();
    let user = blocking(move || {
        let mut user = UserProfile::new(body.display_name, body.role);
        user.email = body.email;
        user.unit_id = body.unit_id;
        repo.insert_child::<Unit, _>(&user)?;
        Ok(user)
    })
    .await?;
    created(user)
}
