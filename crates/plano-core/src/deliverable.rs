use crate::error::{PlanoError, Result};
use crate::record::{new_id, require, Collection, Record};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A quantified output of an Action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: String,
    pub action_id: String,
    pub description: String,
    pub quantity: f64,
    pub unit_of_measure: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deliverable {
    pub fn new(
        action_id: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            action_id: action_id.into(),
            description: description.into(),
            quantity,
            unit_of_measure: unit_of_measure.into(),
            date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Deliverable {
    const COLLECTION: Collection = Collection::Deliverables;

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
        Some(&self.action_id)
    }

    fn validate(&self) -> Result<()> {
        require("deliverable description", &self.description)?;
        require("action", &self.action_id)?;
        require("unit of measure", &self.unit_of_measure)?;
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(PlanoError::Validation(format!(
                "deliverable quantity must be a non-negative number, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_non_negative() {
        assert!(Deliverable::new("a1", "Salas reformadas", 12.0, "salas")
            .validate()
            .is_ok());
        assert!(Deliverable::new("a1", "Salas reformadas", -1.0, "salas")
            .validate()
            .is_err());
        assert!(Deliverable::new("a1", "Salas reformadas", f64::NAN, "salas")
            .validate()
            .is_err());
    }

    #[test]
    fn unit_of_measure_required() {
        assert!(Deliverable::new("a1", "Salas", 1.0, "").validate().is_err());
    }
}
