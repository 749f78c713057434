use crate::error::{PlanoError, Result};
use crate::record::{new_id, require, Collection, Record};
use crate::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity, role and optional unit affiliation of a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub unit_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(display_name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            display_name: display_name.into(),
            email: None,
            role,
            unit_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    fn is_own_unit(&self, unit_id: &str) -> bool {
        self.unit_id.as_deref() == Some(unit_id)
    }

    /// Whether records of `unit_id` should be shown to this user.
    pub fn can_view(&self, unit_id: &str) -> bool {
        self.role.sees_all_units() || self.is_own_unit(unit_id)
    }

    /// Whether edit affordances for `unit_id` should be offered.
    pub fn can_edit(&self, unit_id: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Gestor | Role::Focal => self.is_own_unit(unit_id),
            Role::Controladoria | Role::Prefeito | Role::Leitura => false,
        }
    }
}

impl Record for UserProfile {
    const COLLECTION: Collection = Collection::Users;

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
        self.unit_id.as_deref()
    }

    fn validate(&self) -> Result<()> {
        require("display name", &self.display_name)?;
        if matches!(self.role, Role::Gestor | Role::Focal) && self.unit_id.is_none() {
            return Err(PlanoError::Validation(format!(
                "role '{}' requires a unit",
                self.role
            )));
        }
        Ok(())
    }

    fn not_found(id: &str) -> PlanoError {
        PlanoError::UserNotFound(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gestor_scoped_to_own_unit() {
        let u = UserProfile::new("Ana Souza", Role::Gestor).in_unit("u1");
        assert!(u.can_view("u1"));
        assert!(u.can_edit("u1"));
        assert!(!u.can_view("u2"));
        assert!(!u.can_edit("u2"));
    }

    #[test]
    fn read_only_roles_see_everything_edit_nothing() {
        for role in [Role::Leitura, Role::Prefeito, Role::Controladoria] {
            let u = UserProfile::new("Leitor", role);
            assert!(u.can_view("u9"));
            assert!(!u.can_edit("u9"));
        }
    }

    #[test]
    fn admin_edits_everything() {
        let u = UserProfile::new("Root", Role::Admin);
        assert!(u.can_edit("any"));
    }

    #[test]
    fn focal_without_unit_is_invalid() {
        assert!(UserProfile::new("Carlos", Role::Focal).validate().is_err());
        assert!(UserProfile::new("Carlos", Role::Focal)
            .in_unit("u1")
            .validate()
            .is_ok());
    }
}
