use crate::error::{PlanoError, Result};
use crate::record::{new_id, require, Collection, Record};
use crate::types::SeverityLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored threat to a Program.
///
/// `severity` is always `impact × probability`; it is persisted so that
/// the stored documents can be sorted and filtered without recomputing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub id: String,
    pub program_id: String,
    pub description: String,
    pub impact: u8,
    pub probability: u8,
    pub severity: u8,
    #[serde(default)]
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Risk {
    pub fn new(
        program_id: impl Into<String>,
        description: impl Into<String>,
        impact: u8,
        probability: u8,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            program_id: program_id.into(),
            description: description.into(),
            impact,
            probability,
            severity: impact.saturating_mul(probability),
            mitigation: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_scores(&mut self, impact: u8, probability: u8) {
        self.impact = impact;
        self.probability = probability;
        self.severity = impact.saturating_mul(probability);
    }

    pub fn level(&self) -> SeverityLevel {
        SeverityLevel::from_score(self.severity)
    }
}

fn check_scale(field: &str, value: u8) -> Result<()> {
    if !(1..=5).contains(&value) {
        return Err(PlanoError::Validation(format!(
            "risk {field} must be between 1 and 5, got {value}"
        )));
    }
    Ok(())
}

impl Record for Risk {
    const COLLECTION: Collection = Collection::Risks;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.severity = self.impact.saturating_mul(self.probability);
        self.updated_at = Utc::now();
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.program_id)
    }

    fn validate(&self) -> Result<()> {
        require("risk description", &self.description)?;
        require("program", &self.program_id)?;
        check_scale("impact", self.impact)?;
        check_scale("probability", self.probability)?;
        if self.severity != self.impact * self.probability {
            return Err(PlanoError::Validation(format!(
                "risk severity {} does not match impact {} x probability {}",
                self.severity, self.impact, self.probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_product() {
        let r = Risk::new("p1", "Atraso na licitação", 4, 3);
        assert_eq!(r.severity, 12);
        assert_eq!(r.level(), SeverityLevel::High);
        r.validate().unwrap();
    }

    #[test]
    fn scores_outside_scale_rejected() {
        assert!(Risk::new("p1", "x", 0, 3).validate().is_err());
        assert!(Risk::new("p1", "x", 3, 6).validate().is_err());
    }

    #[test]
    fn set_scores_recomputes() {
        let mut r = Risk::new("p1", "Chuvas", 1, 1);
        r.set_scores(5, 5);
        assert_eq!(r.severity, 25);
        assert_eq!(r.level(), SeverityLevel::Critical);
    }

    #[test]
    fn touch_resyncs_severity() {
        let mut r = Risk::new("p1", "Chuvas", 2, 2);
        r.impact = 5;
        assert!(r.validate().is_err());
        r.touch();
        assert_eq!(r.severity, 10);
        r.validate().unwrap();
    }
}
