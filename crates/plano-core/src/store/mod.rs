//! Storage adapters behind [`Repository`].

mod document;
mod sql;

pub use document::DocumentStore;
pub use sql::SqlStore;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::paths;
use crate::repository::Repository;
use std::path::Path;

/// Open the adapter for `backend` under `root/.plano/`.
pub fn open(root: &Path, backend: Backend) -> Result<Box<dyn Repository>> {
    let path = paths::database_path(root, backend);
    let repo: Box<dyn Repository> = match backend {
        Backend::Document => Box::new(DocumentStore::open(&path)?),
        Backend::Sql => Box::new(SqlStore::open(&path)?),
    };
    Ok(repo)
}

/// Open the adapter selected in `.plano/config.yaml`.
pub fn open_configured(root: &Path) -> Result<(Config, Box<dyn Repository>)> {
    let config = Config::load(root)?;
    let repo = open(root, config.storage.backend)?;
    Ok((config, repo))
}

// ---------------------------------------------------------------------------
// Tests: every assertion runs against both adapters
// ---------------------------------------------------------------------------
