pub mod actions;
pub mod dashboard;
pub mod programs;
pub mod records;
pub mod session;
pub mod units;

use crate::error::AppError;
use plano_core::repository::{Repository, RepositoryExt};
use plano_core::user::UserProfile;

#[derive(Debug, Default, serde::Deserialize)]
pub struct ViewerQuery {
    /// Scope results to what this user may see.
    pub user: Option<String>,
}

/// Resolve the optional `?user=` viewer.
pub(crate) fn viewer(
    repo: &dyn Repository,
    user_id: Option<&str>,
) -> plano_core::Result<Option<UserProfile>> {
    user_id.map(|id| repo.load::<UserProfile>(id)).transpose()
}

pub(crate) fn created<T: serde::Serialize>(
    value: T,
) -> Result<(axum::http::StatusCode, axum::Json<T>), AppError> {
    Ok((axum::http::StatusCode::CREATED, axum::Json(value)))
}
