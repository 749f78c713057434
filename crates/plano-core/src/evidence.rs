use crate::error::Result;
use crate::record::{new_id, require, Collection, Record};
use crate::types::EvidenceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof artifact attached to an Action. Only the reference is stored;
/// the file itself lives wherever `url` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub action_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub kind: EvidenceKind,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        action_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            action_id: action_id.into(),
            title: title.into(),
            url: url.into(),
            kind: EvidenceKind::default(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Evidence {
    const COLLECTION: Collection = Collection::Evidence;

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
        require("evidence title", &self.title)?;
        require("action", &self.action_id)?;
        require("evidence url", &self.url)
    }
}
