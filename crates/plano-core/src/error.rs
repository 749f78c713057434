use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanoError {
    #[error("not initialized: run 'plano init'")]
    NotInitialized,

    #[error("unit not found: {0}")]
    UnitNotFound(String),

    #[error("axis not found: {0}")]
    AxisNotFound(String),

    #[error("program not found: {0}")]
    ProgramNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("{collection} record not found: {id}")]
    RecordNotFound { collection: String, id: String },

    #[error("{collection} record already exists: {id}")]
    RecordExists { collection: String, id: String },

    #[error("unit '{unit}' already has the maximum of {limit} programs")]
    ProgramLimitExceeded { unit: String, limit: usize },

    #[error("action '{0}' cannot be completed without at least 1 evidence attached")]
    EvidenceRequired(String),

    #[error("invalid action status: {0}")]
    InvalidStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlanoError {
    pub(crate) fn storage(e: impl std::fmt::Display) -> Self {
        PlanoError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlanoError>;
