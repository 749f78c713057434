//! Collection metadata shared by every persisted entity.
//!
//! Storage adapters only ever see [`Document`]s: an id, an optional parent
//! key and a JSON body. The [`Record`] trait maps typed entities onto that
//! shape so both adapters stay entity-agnostic.

use crate::error::{PlanoError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Units,
    Axes,
    Programs,
    Projects,
    Actions,
    Deliverables,
    Indicators,
    Risks,
    Evidence,
    Users,
}

impl Collection {
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Units,
            Collection::Axes,
            Collection::Programs,
            Collection::Projects,
            Collection::Actions,
            Collection::Deliverables,
            Collection::Indicators,
            Collection::Risks,
            Collection::Evidence,
            Collection::Users,
        ]
    }

    /// Table / key-space name used by the storage adapters.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Units => "units",
            Collection::Axes => "axes",
            Collection::Programs => "programs",
            Collection::Projects => "projects",
            Collection::Actions => "actions",
            Collection::Deliverables => "deliverables",
            Collection::Indicators => "indicators",
            Collection::Risks => "risks",
            Collection::Evidence => "evidence",
            Collection::Users => "users",
        }
    }

    /// Name of the field holding the parent id, if records are filtered by one.
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            Collection::Units | Collection::Axes => None,
            Collection::Programs | Collection::Users => Some("unit_id"),
            Collection::Projects
            | Collection::Actions
            | Collection::Indicators
            | Collection::Risks => Some("program_id"),
            Collection::Deliverables | Collection::Evidence => Some("action_id"),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = PlanoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PlanoError::Validation(format!("unknown collection '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Untyped record as stored by a [`crate::repository::Repository`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub parent_id: Option<String>,
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Bump `updated_at` before a write.
    fn touch(&mut self);

    fn parent_id(&self) -> Option<&str> {
        None
    }

    /// Field-level checks run before every insert and update.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::RecordNotFound {
            collection: Self::COLLECTION.to_string(),
            id: id.to_string(),
        }
    }

    fn to_document(&self) -> Result<Document> {
        Ok(Document {
            id: self.id().to_string(),
            parent_id: self.parent_id().map(str::to_string),
            body: serde_json::to_value(self)?,
        })
    }

    fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(doc.body)?)
    }
}

/// Fresh random id for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reject blank required text fields with a user-facing message.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlanoError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn collection_roundtrip() {
        for c in Collection::all() {
            assert_eq!(Collection::from_str(c.as_str()).unwrap(), *c);
        }
    }

    #[test]
    fn top_level_collections_have_no_parent() {
        assert_eq!(Collection::Units.parent_field(), None);
        assert_eq!(Collection::Axes.parent_field(), None);
        assert_eq!(Collection::Actions.parent_field(), Some("program_id"));
        assert_eq!(Collection::Evidence.parent_field(), Some("action_id"));
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("name", "  ").is_err());
        assert!(require("name", "Saúde").is_ok());
    }
}
