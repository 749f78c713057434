use crate::error::Result;
use crate::record::{new_id, require, Collection, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target metric for a Program: where it stands and where it should land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub baseline: f64,
    pub target: f64,
    pub unit_of_measure: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Indicator {
    pub fn new(
        program_id: impl Into<String>,
        name: impl Into<String>,
        baseline: f64,
        target: f64,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            program_id: program_id.into(),
            name: name.into(),
            baseline,
            target,
            unit_of_measure: unit_of_measure.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Indicator {
    const COLLECTION: Collection = Collection::Indicators;

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
        require("indicator name", &self.name)?;
        require("program", &self.program_id)?;
        require("unit of measure", &self.unit_of_measure)
    }
}
