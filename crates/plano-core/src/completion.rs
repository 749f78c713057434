//! Evidence requirement for completing an Action.

use crate::action::Action;
use crate::error::{PlanoError, Result};
use crate::evidence::Evidence;
use crate::repository::{Repository, RepositoryExt};
use crate::types::ActionStatus;

/// True iff at least one Evidence record references `action_id`.
pub fn can_complete<R: Repository + ?Sized>(repo: &R, action_id: &str) -> Result<bool> {
    Ok(!repo.list_by::<Evidence>(action_id)?.is_empty())
}

/// Change an Action's status by hand.
///
/// Moving to `completed` requires attached evidence; otherwise the request
/// is rejected with [`PlanoError::EvidenceRequired`] and nothing is written.
pub fn set_status<R: Repository + ?Sized>(
    repo: &R,
    action_id: &str,
    status: ActionStatus,
) -> Result<Action> {
    let mut action: Action = repo.load(action_id)?;
    if action.status == status {
        return Ok(action);
    }
    if status == ActionStatus::Completed && !can_complete(repo, action_id)? {
        return Err(PlanoError::EvidenceRequired(action.title));
    }
    let from = action.status;
    action.status = status;
    repo.update_record(&mut action)?;
    tracing::debug!(action = %action.id, from = %from, to = %status, "action status changed");
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlStore;

    fn setup() -> (SqlStore, Action) {
        let repo = SqlStore::open_in_memory().unwrap();
        let action = Action::new("p1", "Entregar kits escolares");
        repo.insert_record(&action).unwrap();
        (repo, action)
    }

    #[test]
    fn can_complete_flips_with_first_evidence() {
        let (repo, action) = setup();
        assert!(!can_complete(&repo, &action.id).unwrap());

        let ev = Evidence::new(&action.id, "Foto da entrega", "https://files.example/1.jpg");
        repo.insert_record(&ev).unwrap();
        assert!(can_complete(&repo, &action.id).unwrap());
    }

    #[test]
    fn evidence_of_other_action_does_not_count() {
        let (repo, action) = setup();
        let ev = Evidence::new("other", "Foto", "https://files.example/2.jpg");
        repo.insert_record(&ev).unwrap();
        assert!(!can_complete(&repo, &action.id).unwrap());
    }

    #[test]
    fn completing_without_evidence_is_rejected_and_unchanged() {
        let (repo, action) = setup();
        let err = set_status(&repo, &action.id, ActionStatus::Completed).unwrap_err();
        assert!(matches!(err, PlanoError::EvidenceRequired(_)));
        assert!(err.to_string().contains("Entregar kits escolares"));

        let stored: Action = repo.load(&action.id).unwrap();
        assert_eq!(stored.status, ActionStatus::NotStarted);
    }

    #[test]
    fn completing_with_evidence_succeeds() {
        let (repo, action) = setup();
        let ev = Evidence::new(&action.id, "Ata", "https://files.example/ata.pdf");
        repo.insert_record(&ev).unwrap();

        let updated = set_status(&repo, &action.id, ActionStatus::Completed).unwrap();
        assert_eq!(updated.status, ActionStatus::Completed);
        let stored: Action = repo.load(&action.id).unwrap();
        assert_eq!(stored.status, ActionStatus::Completed);
    }

    #[test]
    fn other_transitions_need_no_evidence() {
        let (repo, action) = setup();
        let updated = set_status(&repo, &action.id, ActionStatus::InProgress).unwrap();
        assert_eq!(updated.status, ActionStatus::InProgress);
    }

    #[test]
    fn unknown_action_is_not_found() {
        let repo = SqlStore::open_in_memory().unwrap();
        assert!(matches!(
            set_status(&repo, "ghost", ActionStatus::InProgress),
            Err(PlanoError::ActionNotFound(_))
        ));
    }
}
