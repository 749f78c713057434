//! Urgent and pending demand alerts shown to a user when a session starts.
//!
//! Which Actions belong to a user is decided by a [`ResponsibleMatcher`].
//! Meeting demands always use strict id equality, whatever the matcher.

use crate::action::Action;
use crate::config::MatcherKind;
use crate::types::ActionStatus;
use crate::user::UserProfile;
use chrono::NaiveDate;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

pub trait ResponsibleMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `user` is responsible for `action`.
    fn is_responsible(&self, action: &Action, user: &UserProfile) -> bool;
}

/// Bidirectional substring match of the free-text responsible field
/// against the user's display name, ignoring case and accents.
///
/// Deprecated: both over- and under-matches. Kept as the fallback for data
/// entered before `responsible_id` existed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyNameMatcher;

/// `action.responsible_id == user.id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdMatcher;

/// Lower-case and strip diacritics: "JOÃO Conceição" → "joao conceicao".
pub fn fold(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

pub fn names_match(a: &str, b: &str) -> bool {
    let (a, b) = (fold(a), fold(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

impl ResponsibleMatcher for FuzzyNameMatcher {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn is_responsible(&self, action: &Action, user: &UserProfile) -> bool {
        action
            .responsible
            .as_deref()
            .is_some_and(|name| names_match(name, &user.display_name))
    }
}

impl ResponsibleMatcher for IdMatcher {
    fn name(&self) -> &'static str {
        "id"
    }

    fn is_responsible(&self, action: &Action, user: &UserProfile) -> bool {
        action.responsible_id.as_deref() == Some(user.id.as_str())
    }
}

pub fn matcher_for(kind: MatcherKind) -> Box<dyn ResponsibleMatcher> {
    match kind {
        MatcherKind::Fuzzy => Box::new(FuzzyNameMatcher),
        MatcherKind::Id => Box::new(IdMatcher),
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    Delayed,
    /// In progress with the end date already past.
    Overdue,
    MeetingDemand,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemandAlert {
    pub action_id: String,
    pub program_id: String,
    pub title: String,
    pub status: ActionStatus,
    pub end_date: Option<NaiveDate>,
    pub reasons: Vec<AlertReason>,
}

fn reasons_for(
    action: &Action,
    user: &UserProfile,
    matcher: &dyn ResponsibleMatcher,
    today: NaiveDate,
) -> Vec<AlertReason> {
    let mut reasons = Vec::new();

    if matcher.is_responsible(action, user) {
        match action.status {
            ActionStatus::Delayed => reasons.push(AlertReason::Delayed),
            ActionStatus::InProgress if action.is_overdue(today) => {
                reasons.push(AlertReason::Overdue)
            }
            _ => {}
        }
    }

    if action.is_meeting_demand
        && action.status != ActionStatus::Completed
        && IdMatcher.is_responsible(action, user)
    {
        reasons.push(AlertReason::MeetingDemand);
    }

    reasons
}

/// Every Action that should be brought to `user`'s attention as of `today`.
pub fn detect(
    actions: &[Action],
    user: &UserProfile,
    matcher: &dyn ResponsibleMatcher,
    today: NaiveDate,
) -> Vec<DemandAlert> {
    actions
        .iter()
        .filter_map(|action| {
            let reasons = reasons_for(action, user, matcher, today);
            (!reasons.is_empty()).then(|| DemandAlert {
                action_id: action.id.clone(),
                program_id: action.program_id.clone(),
                title: action.title.clone(),
                status: action.status,
                end_date: action.end_date,
                reasons,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// AlertSession
// ---------------------------------------------------------------------------

/// Per-session alert state. Owned by whoever owns the session and passed in
/// explicitly; alerts are handed out at most once per session.
#[derive(Debug, Clone, Default)]
pub struct AlertSession {
    user_id: String,
    shown: bool,
}

impl AlertSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            shown: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn already_shown(&self) -> bool {
        self.shown
    }

    /// Alerts for this session's first non-empty scan; `None` afterwards or
    /// when there is nothing to show.
    ///
    /// An empty scan does not mark the session as shown. Alerts that appear
    /// later in the same session, because an action became delayed or was
    /// reassigned, are still handed out once.
    pub fn take(
        &mut self,
        actions: &[Action],
        user: &UserProfile,
        matcher: &dyn ResponsibleMatcher,
        today: NaiveDate,
    ) -> Option<Vec<DemandAlert>> {
        if self.shown {
            return None;
        }
        let alerts = detect(actions, user, matcher, today);
        if alerts.is_empty() {
            return None;
        }
        self.shown = true;
        tracing::info!(
            user = %user.id,
            matcher = matcher.name(),
            count = alerts.len(),
            "demand alerts raised"
        );
        Some(alerts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn user() -> UserProfile {
        UserProfile::new("João Conceição", Role::Gestor).in_unit("u1")
    }

    fn action(status: ActionStatus, responsible: &str, end_offset: i64) -> Action {
        let mut a = Action::new("p1", format!("{status}"))
            .with_responsible(responsible)
            .with_dates(None, Some(today() + Duration::days(end_offset)));
        a.status = status;
        a
    }

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("  JOÃO Conceição "), "joao conceicao");
    }

    #[test]
    fn names_match_both_directions() {
        assert!(names_match("joao", "João Conceição"));
        assert!(names_match("Sr. João Conceição da Silva", "joao conceicao"));
        assert!(!names_match("Maria", "João"));
        assert!(!names_match("", "João"));
        assert!(!names_match("João", "   "));
    }

    #[test]
    fn fuzzy_matcher_requires_responsible_text() {
        let mut a = Action::new("p1", "x");
        assert!(!FuzzyNameMatcher.is_responsible(&a, &user()));
        a.responsible = Some("JOAO".into());
        assert!(FuzzyNameMatcher.is_responsible(&a, &user()));
    }

    #[test]
    fn detects_delayed_and_overdue() {
        let actions = vec![
            action(ActionStatus::Delayed, "João", 5),
            action(ActionStatus::InProgress, "joão conceição", -1),
            action(ActionStatus::InProgress, "João", 3),
            action(ActionStatus::NotStarted, "João", -3),
            action(ActionStatus::Delayed, "Maria", -3),
        ];
        let alerts = detect(&actions, &user(), &FuzzyNameMatcher, today());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].reasons, vec![AlertReason::Delayed]);
        assert_eq!(alerts[1].reasons, vec![AlertReason::Overdue]);
    }

    #[test]
    fn meeting_demand_uses_id_even_with_fuzzy_matcher() {
        let u = user();
        let mut by_name = action(ActionStatus::NotStarted, "João", 10);
        by_name.is_meeting_demand = true;
        let mut by_id = action(ActionStatus::NotStarted, "", 10);
        by_id.is_meeting_demand = true;
        by_id.responsible_id = Some(u.id.clone());
        let mut done = by_id.clone();
        done.status = ActionStatus::Completed;

        let alerts = detect(&[by_name, by_id.clone(), done], &u, &FuzzyNameMatcher, today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].action_id, by_id.id);
        assert_eq!(alerts[0].reasons, vec![AlertReason::MeetingDemand]);
    }

    #[test]
    fn id_matcher_ignores_names() {
        let u = user();
        let by_name = action(ActionStatus::Delayed, "João Conceição", -1);
        let mut by_id = action(ActionStatus::Delayed, "outra pessoa", -1);
        by_id.responsible_id = Some(u.id.clone());

        let alerts = detect(&[by_name, by_id.clone()], &u, &IdMatcher, today());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].action_id, by_id.id);
    }

    #[test]
    fn combined_reasons_on_one_alert() {
        let u = user();
        let mut a = action(ActionStatus::Delayed, "João", -2);
        a.is_meeting_demand = true;
        a.responsible_id = Some(u.id.clone());
        let alerts = detect(&[a], &u, &FuzzyNameMatcher, today());
        assert_eq!(
            alerts[0].reasons,
            vec![AlertReason::Delayed, AlertReason::MeetingDemand]
        );
    }

    #[test]
    fn session_shows_alerts_once() {
        let u = user();
        let mut session = AlertSession::new(&u.id);
        let mut actions = vec![action(ActionStatus::Delayed, "João", 1)];

        let first = session.take(&actions, &u, &FuzzyNameMatcher, today());
        assert_eq!(first.map(|a| a.len()), Some(1));
        assert!(session.already_shown());

        actions.push(action(ActionStatus::Delayed, "João", 2));
        assert!(session.take(&actions, &u, &FuzzyNameMatcher, today()).is_none());

        let mut fresh = AlertSession::new(&u.id);
        assert_eq!(
            fresh
                .take(&actions, &u, &FuzzyNameMatcher, today())
                .map(|a| a.len()),
            Some(2)
        );
    }

    #[test]
    fn empty_scan_does_not_consume_session() {
        let u = user();
        let mut session = AlertSession::new(&u.id);
        assert!(session.take(&[], &u, &FuzzyNameMatcher, today()).is_none());
        assert!(!session.already_shown());

        let later = vec![action(ActionStatus::Delayed, "João", 1)];
        let raised = session.take(&later, &u, &FuzzyNameMatcher, today());
        assert_eq!(raised.map(|a| a.len()), Some(1));
        assert!(session.already_shown());
    }

    #[test]
    fn matcher_for_kind() {
        assert_eq!(matcher_for(MatcherKind::Fuzzy).name(), "fuzzy");
        assert_eq!(matcher_for(MatcherKind::Id).name(), "id");
    }
}
