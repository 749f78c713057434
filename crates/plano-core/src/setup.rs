//! Workspace initialization: `.plano/`, config and seeded axes.

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::repository::RepositoryExt;
use crate::store;
use crate::unit::{default_axes, Axis};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub config_created: bool,
    pub backend: Backend,
    pub axes_seeded: Vec<String>,
    pub axes_existing: usize,
}

/// Create `.plano/` under `root`, write the config if missing and seed the
/// default axes. Safe to re-run: an existing config is kept as is, so
/// `name` and `backend` only apply on first run.
pub fn init(root: &Path, name: &str, backend: Backend) -> Result<SetupReport> {
    io::ensure_dir(&paths::plano_dir(root))?;

    let config_created = !paths::config_path(root).exists();
    let config = if config_created {
        let mut config = Config::new(name);
        config.storage.backend = backend;
        config.save(root)?;
        config
    } else {
        Config::load(root)?
    };

    let repo = store::open(root, config.storage.backend)?;
    let mut axes_seeded = Vec::new();
    let mut axes_existing = 0;
    for axis in default_axes() {
        if repo.exists::<Axis>(&axis.id)? {
            axes_existing += 1;
            continue;
        }
        repo.insert_record(&axis)?;
        axes_seeded.push(axis.id);
    }

    tracing::info!(
        root = %root.display(),
        backend = %config.storage.backend,
        seeded = axes_seeded.len(),
        "workspace initialized"
    );

    Ok(SetupReport {
        config_created,
        backend: config.storage.backend,
        axes_seeded,
        axes_existing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_config_and_axes() {
        let dir = TempDir::new().unwrap();
        let report = init(dir.path(), "Prefeitura", Backend::Sql).unwrap();
        assert!(report.config_created);
        assert_eq!(report.axes_seeded.len(), 5);
        assert!(paths::database_path(dir.path(), Backend::Sql).exists());

        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.project.name, "Prefeitura");
        assert_eq!(cfg.storage.backend, Backend::Sql);
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), "Prefeitura", Backend::Document).unwrap();
        let again = init(dir.path(), "Outro nome", Backend::Sql).unwrap();
        assert!(!again.config_created);
        assert!(again.axes_seeded.is_empty());
        assert_eq!(again.axes_existing, 5);
        assert_eq!(again.backend, Backend::Document);

        let (_, repo) = store::open_configured(dir.path()).unwrap();
        assert_eq!(repo.list_all::<Axis>().unwrap().len(), 5);
    }
}
