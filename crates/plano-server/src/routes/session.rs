use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use plano_core::action::Action;
use plano_core::alerts::{self, AlertSession, DemandAlert};
use plano_core::automation::{AutomationReport, StatusAutomation};
use plano_core::repository::RepositoryExt;
use plano_core::user::UserProfile;
use serde::{Deserialize, Serialize};

use crate::error::{blocking, AppError};
use crate::state::{self, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct TodayQuery {
    pub today: Option<NaiveDate>,
}

/// POST /api/automation/run: recompute action statuses.
pub async fn run_automation(
    State(app): State<AppState>,
    Query(q): Query<TodayQuery>,
) -> Result<Json<AutomationReport>, AppError> {
    let today = q.today.unwrap_or_else(state::today);
    let repo = app.repo.clone();
    let automation = StatusAutomation::from_config(&app.config.automation);
    let report = blocking(move || Ok(automation.run(repo.as_ref(), today))).await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct StartSessionBody {
    pub user_id: String,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct SessionStart {
    pub user: UserProfile,
    pub automation: AutomationReport,
    /// Empty when this session already showed its alerts.
    pub alerts: Vec<DemandAlert>,
    pub alerts_already_shown: bool,
}

/// POST /api/session: session load: run the status automation, then hand
/// out the user's demand alerts once per session.
pub async fn start_session(
    State(app): State<AppState>,
    Json(body): Json<StartSessionBody>,
) -> Result<Json<SessionStart>, AppError> {
    let today = body.today.unwrap_or_else(state::today);
    let repo = app.repo.clone();
    let config = app.config.clone();
    let sessions = app.sessions.clone();

    let start = blocking(move || {
        let user: UserProfile = repo.load(&body.user_id)?;
        let automation =
            StatusAutomation::from_config(&config.automation).run(repo.as_ref(), today);
        // A failed read skips this load's alerts; the session stays unshown.
        let actions = match repo.list_all::<Action>() {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(user = %user.id, error = %e, "demand alerts skipped: could not load actions");
                Vec::new()
            }
        };
        let matcher = alerts::matcher_for(config.alerts.matcher);

        let mut sessions = sessions.lock().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .entry(user.id.clone())
            .or_insert_with(|| AlertSession::new(&user.id));
        let alerts_already_shown = session.already_shown();
        let alerts = session
            .take(&actions, &user, matcher.as_ref(), today)
            .unwrap_or_default();

        Ok(SessionStart {
            user,
            automation,
            alerts,
            alerts_already_shown,
        })
    })
    .await?;
    Ok(Json(start))
}

/// DELETE /api/session/{user_id}: end the session; the next login shows
/// alerts again.
pub async fn end_session(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    let ended = app
        .sessions
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .remove(&user_id)
        .is_some();
    Json(serde_json::json!({ "user_id": user_id, "ended": ended }))
}
