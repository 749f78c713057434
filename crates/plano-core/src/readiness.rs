//! Program readiness: is a Program specified enough to be tracked?

use crate::action::Action;
use crate::deliverable::Deliverable;
use crate::error::Result;
use crate::indicator::Indicator;
use crate::program::Program;
use crate::repository::{Repository, RepositoryExt};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Readiness {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check the readiness rules over already-fetched children. Every rule is
/// evaluated; violations are collected, not short-circuited.
///
/// `deliverable_count` gives the number of deliverables of an action id.
pub fn evaluate<F>(indicators: &[Indicator], actions: &[Action], deliverable_count: F) -> Readiness
where
    F: Fn(&str) -> usize,
{
    let mut errors = Vec::new();

    if indicators.is_empty() {
        errors.push("Program must have at least 1 strategic indicator.".to_string());
    }
    if actions.is_empty() {
        errors.push("Program must have at least 1 action/project.".to_string());
    }
    for action in actions {
        if deliverable_count(&action.id) == 0 {
            errors.push(format!(
                "Action '{}' must have at least 1 deliverable.",
                action.title
            ));
        }
    }

    Readiness::from_errors(errors)
}

/// Load a Program's children and evaluate readiness. Read-only.
pub fn validate<R: Repository + ?Sized>(repo: &R, program_id: &str) -> Result<Readiness> {
    repo.load::<Program>(program_id)?;
    let indicators: Vec<Indicator> = repo.list_by(program_id)?;
    let actions: Vec<Action> = repo.list_by(program_id)?;

    let mut counts = std::collections::HashMap::new();
    for action in &actions {
        let n = repo.list_by::<Deliverable>(&action.id)?.len();
        counts.insert(action.id.as_str(), n);
    }

    Ok(evaluate(&indicators, &actions, |id| {
        counts.get(id).copied().unwrap_or(0)
    }))
}
