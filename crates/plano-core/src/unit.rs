use crate::error::{PlanoError, Result};
use crate::record::{new_id, require, Collection, Record};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

/// An administrative secretariat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub acronym: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(name: impl Into<String>, acronym: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            acronym: acronym.into().trim().to_uppercase(),
            created_at: now,
            updated_at: now,
        }
    }
}

static ACRONYM_RE: OnceLock<Regex> = OnceLock::new();

fn acronym_re() -> &'static Regex {
    ACRONYM_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9]{1,15}$").unwrap())
}

impl Record for Unit {
    const COLLECTION: Collection = Collection::Units;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        require("unit name", &self.name)?;
        if !acronym_re().is_match(&self.acronym) {
            return Err(PlanoError::Validation(format!(
                "invalid acronym '{}': 2-16 upper-case letters or digits",
                self.acronym
            )));
        }
        Ok(())
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::UnitNotFound(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Strategic theme a Program is filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Axis {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Seeded axis with a stable id so `plano init` stays idempotent.
    fn seeded(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::new(name, color)
        }
    }
}

static COLOR_RE: OnceLock<Regex> = OnceLock::new();

fn color_re() -> &'static Regex {
    COLOR_RE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap())
}

impl Record for Axis {
    const COLLECTION: Collection = Collection::Axes;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        require("axis name", &self.name)?;
        if !color_re().is_match(&self.color) {
            return Err(PlanoError::Validation(format!(
                "invalid color '{}': expected #RRGGBB",
                self.color
            )));
        }
        Ok(())
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::AxisNotFound(id.to_string())
    }
}

/// Axes written by `plano init`.
pub fn default_axes() -> Vec<Axis> {
    vec![
        Axis::seeded("social", "Desenvolvimento Social", "#E4572E"),
        Axis::seeded("economia", "Desenvolvimento Econômico", "#17BEBB"),
        Axis::seeded("infraestrutura", "Infraestrutura e Mobilidade", "#FFC914"),
        Axis::seeded("ambiente", "Meio Ambiente e Sustentabilidade", "#76B041"),
        Axis::seeded("gestao", "Gestão e Governança", "#2E282A"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronym_is_normalized() {
        let unit = Unit::new("Secretaria de Educação", " semed ");
        assert_eq!(unit.acronym, "SEMED");
        unit.validate().unwrap();
    }

    #[test]
    fn invalid_acronym_rejected() {
        for acronym in ["", "S", "SE MED", "ÇA"] {
            let unit = Unit::new("Secretaria", acronym);
            assert!(unit.validate().is_err(), "expected invalid: {acronym}");
        }
    }

    #[test]
    fn axis_color_must_be_hex() {
        assert!(Axis::new("Saúde", "#00aa11").validate().is_ok());
        assert!(Axis::new("Saúde", "green").validate().is_err());
    }

    #[test]
    fn default_axes_are_valid_and_stable() {
        let first = default_axes();
        let second = default_axes();
        assert_eq!(first.len(), 5);
        for (a, b) in first.iter().zip(&second) {
            a.validate().unwrap();
            assert_eq!(a.id, b.id);
        }
    }
}
