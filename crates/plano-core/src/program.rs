use crate::error::{PlanoError, Result};
use crate::record::{new_id, require, Collection, Record};
use crate::repository::{Repository, RepositoryExt};
use crate::unit::{Axis, Unit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default cap on programs per unit.
pub const DEFAULT_PROGRAMS_PER_UNIT: usize = 5;

/// A strategic initiative owned by a Unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub unit_id: String,
    pub axis_id: String,
    pub name: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub target_audience: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    pub fn new(
        unit_id: impl Into<String>,
        axis_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            unit_id: unit_id.into(),
            axis_id: axis_id.into(),
            name: name.into(),
            objective: String::new(),
            problem: String::new(),
            target_audience: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Persist a new program, enforcing that its unit and axis exist and
    /// that the unit holds fewer than `limit` programs. The count and the
    /// insert run in one store transaction, so concurrent creates cannot
    /// overshoot the limit. Nothing is written when a check fails.
    pub fn create<R: Repository + ?Sized>(repo: &R, program: &Program, limit: usize) -> Result<()> {
        program.validate()?;
        repo.load::<Unit>(&program.unit_id)?;
        repo.load::<Axis>(&program.axis_id)?;

        if !repo.insert_bounded_record(program, limit)? {
            return Err(PlanoError::ProgramLimitExceeded {
                unit: program.unit_id.clone(),
                limit,
            });
        }
        tracing::debug!(program = %program.id, unit = %program.unit_id, "program created");
        Ok(())
    }
}

impl Record for Program {
    const COLLECTION: Collection = Collection::Programs;

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
        Some(&self.unit_id)
    }

    fn validate(&self) -> Result<()> {
        require("program name", &self.name)?;
        require("unit", &self.unit_id)?;
        require("axis", &self.axis_id)
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::ProgramNotFound(id.to_string())
    }
}
