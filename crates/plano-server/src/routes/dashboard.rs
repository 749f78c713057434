use axum::extract::{Query, State};
use axum::Json;
use plano_core::dashboard::{Overview, Snapshot};

use super::{viewer, ViewerQuery};
use crate::error::{blocking, AppError};
use crate::state::AppState;

/// GET /api/dashboard: global overview, scoped by `?user=` when given.
pub async fn overview(
    State(app): State<AppState>,
    Query(q): Query<ViewerQuery>,
) -> Result<Json<Overview>, AppError> {
    let repo = app.repo.clone();
    let overview = blocking(move || {
        let viewer = viewer(repo.as_ref(), q.user.as_deref())?;
        Ok(Snapshot::load(repo.as_ref())?.overview(viewer.as_ref()))
    })
    .await?;
    Ok(Json(overview))
}
