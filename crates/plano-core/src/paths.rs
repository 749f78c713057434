use crate::config::Backend;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLANO_DIR: &str = ".plano";

pub const CONFIG_FILE: &str = ".plano/config.yaml";
pub const DOCUMENT_DB_FILE: &str = ".plano/documents.redb";
pub const SQL_DB_FILE: &str = ".plano/plano.sqlite";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn plano_dir(root: &Path) -> PathBuf {
    root.join(PLANO_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Database file used by `backend`.
pub fn database_path(root: &Path, backend: Backend) -> PathBuf {
    match backend {
        Backend::Document => root.join(DOCUMENT_DB_FILE),
        Backend::Sql => root.join(SQL_DB_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/pref");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/pref/.plano/config.yaml")
        );
        assert_eq!(
            database_path(root, Backend::Document),
            PathBuf::from("/tmp/pref/.plano/documents.redb")
        );
        assert_eq!(
            database_path(root, Backend::Sql),
            PathBuf::from("/tmp/pref/.plano/plano.sqlite")
        );
    }
}
