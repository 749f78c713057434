//! Hard deletes. Nothing cascades: removing a program leaves its actions
//! in place.

use axum::extract::{Path, State};
use axum::Json;
use plano_core::record::Collection;
use plano_core::repository::Repository;

use crate::error::{blocking, AppError};
use crate::state::AppState;

async fn delete_in(
    app: AppState,
    collection: Collection,
    id: String,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = app.repo.clone();
    let key = id.clone();
    let removed = blocking(move || repo.delete(collection, &key)).await?;
    if !removed {
        return Err(AppError::not_found(format!("{collection} record not found: {id}")));
    }
    tracing::info!(collection = %collection, id = %id, "record deleted");
    Ok(Json(serde_json::json!({ "deleted": id, "collection": collection })))
}

/// DELETE /api/{collection}/{id}
pub async fn delete_record(
    State(app): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let collection: Collection = collection
        .parse()
        .map_err(|_| AppError::not_found(format!("unknown collection '{collection}'")))?;
    delete_in(app, collection, id).await
}

/// DELETE /api/units/{id}
pub async fn delete_unit(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    delete_in(app, Collection::Units, id).await
}

/// DELETE /api/programs/{id}
pub async fn delete_program(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    delete_in(app, Collection::Programs, id).await
}

/// DELETE /api/actions/{id}
pub async fn delete_action(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    delete_in(app, Collection::Actions, id).await
}
