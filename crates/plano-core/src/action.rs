use crate::error::{PlanoError, Result};
use crate::program::Program;
use crate::record::{new_id, require, Collection, Record};
use crate::repository::{Repository, RepositoryExt};
use crate::types::ActionStatus;
use crate::user::UserProfile;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Groups related Actions under a Program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub program_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(program_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            program_id: program_id.into(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.program_id)
    }

    fn validate(&self) -> Result<()> {
        require("project name", &self.name)?;
        require("program", &self.program_id)
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::ProjectNotFound(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

fn default_weight() -> f64 {
    1.0
}

/// Execution-level task under a Program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub program_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub status: ActionStatus,
    /// Free-text responsible party as typed by the user.
    #[serde(default)]
    pub responsible: Option<String>,
    /// Responsible user, when one was picked from the user list.
    #[serde(default)]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_meeting_demand: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Action {
    pub fn new(program_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            program_id: program_id.into(),
            project_id: None,
            title: title.into(),
            status: ActionStatus::NotStarted,
            responsible: None,
            responsible_id: None,
            start_date: None,
            end_date: None,
            weight: default_weight(),
            is_meeting_demand: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_responsible(mut self, name: impl Into<String>) -> Self {
        self.responsible = Some(name.into());
        self
    }

    /// Persist a new action. Its program must exist, a given project must
    /// belong to that program and a given responsible user must exist.
    pub fn create<R: Repository + ?Sized>(repo: &R, action: &Action) -> Result<()> {
        repo.load::<Program>(&action.program_id)?;
        if let Some(project_id) = &action.project_id {
            let project: Project = repo.load(project_id)?;
            if project.program_id != action.program_id {
                return Err(PlanoError::Validation(format!(
                    "project '{}' belongs to another program",
                    project.name
                )));
            }
        }
        if let Some(user_id) = &action.responsible_id {
            repo.load::<UserProfile>(user_id)?;
        }
        repo.insert_record(action)
    }

    /// `end_date` strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| today > end)
    }
}

impl Record for Action {
    const COLLECTION: Collection = Collection::Actions;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.program_id)
    }

    fn validate(&self) -> Result<()> {
        require("action title", &self.title)?;
        require("program", &self.program_id)?;
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(PlanoError::Validation(format!(
                "action weight must be a non-negative number, got {}",
                self.weight
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(PlanoError::Validation(format!(
                    "action start date {start} is after end date {end}"
                )));
            }
        }
        Ok(())
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::ActionNotFound(id.to_string())
    }
}
