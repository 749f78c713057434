use chrono::NaiveDate;
use plano_core::alerts::AlertSession;
use plano_core::config::Config;
use plano_core::repository::Repository;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub repo: Arc<dyn Repository>,
    /// Open alert sessions keyed by user id.
    pub sessions: Arc<Mutex<HashMap<String, AlertSession>>>,
}

impl AppState {
    /// Load the config under `root` and open the store it selects.
    pub fn open(root: PathBuf) -> plano_core::Result<Self> {
        let (config, repo) = plano_core::store::open_configured(&root)?;
        Ok(Self::with_repo(root, config, Arc::from(repo)))
    }

    pub fn with_repo(root: PathBuf, config: Config, repo: Arc<dyn Repository>) -> Self {
        Self {
            root,
            config: Arc::new(config),
            repo,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Server-local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
