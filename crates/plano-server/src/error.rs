use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use plano_core::error::PlanoError;

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain for request-shape problems.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

fn status_for(e: &PlanoError) -> StatusCode {
    match e {
        PlanoError::NotInitialized => StatusCode::BAD_REQUEST,
        PlanoError::UnitNotFound(_)
        | PlanoError::AxisNotFound(_)
        | PlanoError::ProgramNotFound(_)
        | PlanoError::ProjectNotFound(_)
        | PlanoError::ActionNotFound(_)
        | PlanoError::UserNotFound(_)
        | PlanoError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
        PlanoError::RecordExists { .. } | PlanoError::ProgramLimitExceeded { .. } => {
            StatusCode::CONFLICT
        }
        PlanoError::EvidenceRequired(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlanoError::InvalidStatus(_) | PlanoError::InvalidRole(_) | PlanoError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        PlanoError::Storage(_) | PlanoError::Io(_) | PlanoError::Yaml(_) | PlanoError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<BadRequestError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if self.0.downcast_ref::<NotFoundError>().is_some() {
            StatusCode::NOT_FOUND
        } else if let Some(e) = self.0.downcast_ref::<PlanoError>() {
            status_for(e)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Run blocking store work off the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, PlanoError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(result)
}
