use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    NotStarted,
    InProgress,
    Delayed,
    Completed,
}

impl ActionStatus {
    pub fn all() -> &'static [ActionStatus] {
        &[
            ActionStatus::NotStarted,
            ActionStatus::InProgress,
            ActionStatus::Delayed,
            ActionStatus::Completed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::NotStarted => "not_started",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Delayed => "delayed",
            ActionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = crate::error::PlanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" | "not-started" => Ok(ActionStatus::NotStarted),
            "in_progress" | "in-progress" => Ok(ActionStatus::InProgress),
            "delayed" => Ok(ActionStatus::Delayed),
            "completed" => Ok(ActionStatus::Completed),
            _ => Err(crate::error::PlanoError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Gestor,
    Focal,
    Controladoria,
    Prefeito,
    Leitura,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::Gestor,
            Role::Focal,
            Role::Controladoria,
            Role::Prefeito,
            Role::Leitura,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Gestor => "gestor",
            Role::Focal => "focal",
            Role::Controladoria => "controladoria",
            Role::Prefeito => "prefeito",
            Role::Leitura => "leitura",
        }
    }

    /// Roles that see every unit regardless of affiliation.
    pub fn sees_all_units(self) -> bool {
        matches!(
            self,
            Role::Admin | Role::Controladoria | Role::Prefeito | Role::Leitura
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::PlanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| crate::error::PlanoError::InvalidRole(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// EvidenceKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Photo,
    #[default]
    Document,
    Link,
    Other,
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EvidenceKind::Photo => "photo",
            EvidenceKind::Document => "document",
            EvidenceKind::Link => "link",
            EvidenceKind::Other => "other",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EvidenceKind {
    type Err = crate::error::PlanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(EvidenceKind::Photo),
            "document" => Ok(EvidenceKind::Document),
            "link" => Ok(EvidenceKind::Link),
            "other" => Ok(EvidenceKind::Other),
            _ => Err(crate::error::PlanoError::Validation(format!(
                "unknown evidence kind '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SeverityLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl SeverityLevel {
    /// Band for an `impact × probability` score in 1..=25.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => SeverityLevel::Low,
            5..=9 => SeverityLevel::Moderate,
            10..=16 => SeverityLevel::High,
            _ => SeverityLevel::Critical,
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeverityLevel::Low => "low",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::High => "high",
            SeverityLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_roundtrip() {
        for status in ActionStatus::all() {
            assert_eq!(ActionStatus::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn status_accepts_dashed_aliases() {
        assert_eq!(
            ActionStatus::from_str("in-progress").unwrap(),
            ActionStatus::InProgress
        );
        assert!(ActionStatus::from_str("done").is_err());
    }

    #[test]
    fn role_parse() {
        assert_eq!(Role::from_str("prefeito").unwrap(), Role::Prefeito);
        assert!(Role::from_str("mayor").is_err());
    }

    #[test]
    fn severity_bands() {
        assert_eq!(SeverityLevel::from_score(1), SeverityLevel::Low);
        assert_eq!(SeverityLevel::from_score(4), SeverityLevel::Low);
        assert_eq!(SeverityLevel::from_score(6), SeverityLevel::Moderate);
        assert_eq!(SeverityLevel::from_score(12), SeverityLevel::High);
        assert_eq!(SeverityLevel::from_score(16), SeverityLevel::High);
        assert_eq!(SeverityLevel::from_score(20), SeverityLevel::Critical);
        assert_eq!(SeverityLevel::from_score(25), SeverityLevel::Critical);
    }
}
