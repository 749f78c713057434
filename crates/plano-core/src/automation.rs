//! Calendar-driven Action status updates.
//!
//! Runs once per session load. Comparisons are date-only: an Action due
//! today is not late until tomorrow.

use crate::action::Action;
use crate::config::AutomationConfig;
use crate::repository::{Repository, RepositoryExt};
use crate::types::ActionStatus;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub action_id: String,
    pub title: String,
    pub from: ActionStatus,
    pub to: ActionStatus,
}

/// Outcome of [`StatusAutomation::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutomationReport {
    pub examined: usize,
    /// Changes that were written.
    pub changes: Vec<StatusChange>,
    /// Changes computed but not written because the store failed.
    pub failed: usize,
    /// Set when the action list itself could not be read.
    pub aborted: bool,
}

impl AutomationReport {
    pub fn changed(&self) -> usize {
        self.changes.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatusAutomation {
    revert_delayed: bool,
}

impl Default for StatusAutomation {
    fn default() -> Self {
        Self::from_config(&AutomationConfig::default())
    }
}

impl StatusAutomation {
    pub fn new(revert_delayed: bool) -> Self {
        Self { revert_delayed }
    }

    pub fn from_config(config: &AutomationConfig) -> Self {
        Self::new(config.revert_delayed)
    }

    /// New status for `action` as of `today`, or `None` if it stays put.
    pub fn derive(&self, action: &Action, today: NaiveDate) -> Option<ActionStatus> {
        let end = action.end_date?;
        match action.status {
            ActionStatus::Completed => None,
            ActionStatus::Delayed if today <= end && self.revert_delayed => {
                Some(ActionStatus::InProgress)
            }
            ActionStatus::Delayed => None,
            ActionStatus::NotStarted | ActionStatus::InProgress if today > end => {
                Some(ActionStatus::Delayed)
            }
            ActionStatus::NotStarted | ActionStatus::InProgress => None,
        }
    }

    /// Apply the rule in memory, returning what changed.
    pub fn apply(&self, actions: &mut [Action], today: NaiveDate) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for action in actions.iter_mut() {
            if let Some(to) = self.derive(action, today) {
                changes.push(StatusChange {
                    action_id: action.id.clone(),
                    title: action.title.clone(),
                    from: action.status,
                    to,
                });
                action.status = to;
            }
        }
        changes
    }

    /// Load every Action, apply the rule and persist what changed.
    ///
    /// Never fails: read and write errors are logged and counted so the
    /// caller can carry on loading.
    pub fn run<R: Repository + ?Sized>(&self, repo: &R, today: NaiveDate) -> AutomationReport {
        let mut report = AutomationReport::default();

        let mut actions = match repo.list_all::<Action>() {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, "status automation skipped: could not load actions");
                report.aborted = true;
                return report;
            }
        };
        report.examined = actions.len();

        for action in actions.iter_mut() {
            let Some(to) = self.derive(action, today) else {
                continue;
            };
            let from = action.status;
            action.status = to;
            match repo.update_record(action) {
                Ok(()) => report.changes.push(StatusChange {
                    action_id: action.id.clone(),
                    title: action.title.clone(),
                    from,
                    to,
                }),
                Err(e) => {
                    tracing::warn!(
                        action = %action.id,
                        from = %from,
                        to = %to,
                        error = %e,
                        "status automation could not persist change"
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            examined = report.examined,
            changed = report.changed(),
            failed = report.failed,
            backend = repo.backend(),
            "status automation finished"
        );
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlanoError, Result};
    use crate::record::{Collection, Document};
    use crate::store::{DocumentStore, SqlStore};
    use chrono::Duration;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn action(status: ActionStatus, end_offset_days: i64) -> Action {
        let mut a = Action::new("p1", format!("{status} {end_offset_days}"))
            .with_dates(None, Some(today() + Duration::days(end_offset_days)));
        a.status = status;
        a
    }

    #[test]
    fn past_due_open_actions_become_delayed() {
        let auto = StatusAutomation::default();
        for status in [ActionStatus::NotStarted, ActionStatus::InProgress] {
            assert_eq!(
                auto.derive(&action(status, -1), today()),
                Some(ActionStatus::Delayed)
            );
        }
    }

    #[test]
    fn completed_and_delayed_past_due_stay() {
        let auto = StatusAutomation::default();
        assert_eq!(auto.derive(&action(ActionStatus::Completed, -10), today()), None);
        assert_eq!(auto.derive(&action(ActionStatus::Delayed, -10), today()), None);
    }

    #[test]
    fn due_today_is_not_late() {
        let auto = StatusAutomation::default();
        assert_eq!(auto.derive(&action(ActionStatus::NotStarted, 0), today()), None);
        assert_eq!(
            auto.derive(&action(ActionStatus::Delayed, 0), today()),
            Some(ActionStatus::InProgress)
        );
    }

    #[test]
    fn extended_deadline_reverts_delayed() {
        let auto = StatusAutomation::default();
        assert_eq!(
            auto.derive(&action(ActionStatus::Delayed, 30), today()),
            Some(ActionStatus::InProgress)
        );
    }

    #[test]
    fn revert_can_be_disabled() {
        let auto = StatusAutomation::new(false);
        assert_eq!(auto.derive(&action(ActionStatus::Delayed, 30), today()), None);
        assert_eq!(
            auto.derive(&action(ActionStatus::InProgress, -1), today()),
            Some(ActionStatus::Delayed)
        );
    }

    #[test]
    fn no_end_date_never_changes() {
        let auto = StatusAutomation::default();
        let mut a = Action::new("p1", "sem prazo");
        a.status = ActionStatus::Delayed;
        assert_eq!(auto.derive(&a, today()), None);
    }

    #[test]
    fn apply_is_idempotent() {
        let auto = StatusAutomation::default();
        let mut actions = vec![
            action(ActionStatus::NotStarted, -3),
            action(ActionStatus::InProgress, 2),
            action(ActionStatus::Delayed, 5),
            action(ActionStatus::Completed, -7),
            action(ActionStatus::Delayed, -1),
        ];
        let first = auto.apply(&mut actions, today());
        assert_eq!(first.len(), 2);
        let snapshot: Vec<ActionStatus> = actions.iter().map(|a| a.status).collect();

        let second = auto.apply(&mut actions, today());
        assert!(second.is_empty());
        let after: Vec<ActionStatus> = actions.iter().map(|a| a.status).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn run_persists_changes_on_both_backends() {
        let dir = TempDir::new().unwrap();
        let doc = DocumentStore::open(&dir.path().join("d.redb")).unwrap();
        let sql = SqlStore::open_in_memory().unwrap();
        let repos: [&dyn Repository; 2] = [&doc, &sql];

        for repo in repos {
            let late = action(ActionStatus::NotStarted, -1);
            let extended = action(ActionStatus::Delayed, 10);
            let fine = action(ActionStatus::InProgress, 10);
            for a in [&late, &extended, &fine] {
                repo.insert_record(a).unwrap();
            }

            let report = StatusAutomation::default().run(repo, today());
            assert_eq!(report.examined, 3);
            assert_eq!(report.changed(), 2);
            assert_eq!(report.failed, 0);

            assert_eq!(
                repo.load::<Action>(&late.id).unwrap().status,
                ActionStatus::Delayed
            );
            assert_eq!(
                repo.load::<Action>(&extended.id).unwrap().status,
                ActionStatus::InProgress
            );

            let again = StatusAutomation::default().run(repo, today());
            assert_eq!(again.changed(), 0);
        }
    }

    /// Store whose reads work and whose writes always fail.
    struct ReadOnly(SqlStore);

    impl Repository for ReadOnly {
        fn backend(&self) -> &'static str {
            "read-only"
        }
        fn get(&self, c: Collection, id: &str) -> Result<Option<Document>> {
            self.0.get(c, id)
        }
        fn list(&self, c: Collection, parent: Option<&str>) -> Result<Vec<Document>> {
            self.0.list(c, parent)
        }
        fn insert(&self, _: Collection, _: &Document) -> Result<()> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn insert_bounded(&self, _: Collection, _: &Document, _: usize) -> Result<bool> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn update(&self, _: Collection, _: &Document) -> Result<()> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn delete(&self, _: Collection, _: &str) -> Result<bool> {
            Err(PlanoError::Storage("offline".into()))
        }
    }

    #[test]
    fn write_failures_are_swallowed() {
        let inner = SqlStore::open_in_memory().unwrap();
        let late = action(ActionStatus::NotStarted, -1);
        inner.insert_record(&late).unwrap();
        let repo = ReadOnly(inner);

        let report = StatusAutomation::default().run(&repo, today());
        assert_eq!(report.examined, 1);
        assert_eq!(report.changed(), 0);
        assert_eq!(report.failed, 1);
        assert!(!report.aborted);
    }

    /// Store that cannot even list.
    struct Offline;

    impl Repository for Offline {
        fn backend(&self) -> &'static str {
            "offline"
        }
        fn get(&self, _: Collection, _: &str) -> Result<Option<Document>> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn list(&self, _: Collection, _: Option<&str>) -> Result<Vec<Document>> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn insert(&self, _: Collection, _: &Document) -> Result<()> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn insert_bounded(&self, _: Collection, _: &Document, _: usize) -> Result<bool> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn update(&self, _: Collection, _: &Document) -> Result<()> {
            Err(PlanoError::Storage("offline".into()))
        }
        fn delete(&self, _: Collection, _: &str) -> Result<bool> {
            Err(PlanoError::Storage("offline".into()))
        }
    }

    #[test]
    fn unreadable_store_aborts_quietly() {
        let report = StatusAutomation::default().run(&Offline, today());
        assert!(report.aborted);
        assert_eq!(report.examined, 0);
    }
}
