use crate::output::{date_or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use plano_core::action::Action;
use plano_core::alerts::{self, AlertReason, AlertSession};
use plano_core::automation::StatusAutomation;
use plano_core::repository::RepositoryExt;
use plano_core::user::UserProfile;
use std::path::Path;

fn reason_label(reason: AlertReason) -> &'static str {
    match reason {
        AlertReason::Delayed => "delayed",
        AlertReason::Overdue => "overdue",
        AlertReason::MeetingDemand => "meeting demand",
    }
}

/// One-shot session: refresh statuses, then print the user's demand alerts.
pub fn run(root: &Path, user: &str, today: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let (config, repo) = super::open(root)?;
    let today = super::today_or(today);
    let user: UserProfile = repo
        .load(user)
        .with_context(|| format!("failed to load user '{user}'"))?;

    StatusAutomation::from_config(&config.automation).run(repo.as_ref(), today);
    let actions = repo.list_all::<Action>().context("failed to list actions")?;
    let matcher = alerts::matcher_for(config.alerts.matcher);
    let alerts = AlertSession::new(&user.id)
        .take(&actions, &user, matcher.as_ref(), today)
        .unwrap_or_default();

    if json {
        return print_json(&alerts);
    }
    if alerts.is_empty() {
        println!("No pending demands for {}.", user.display_name);
        return Ok(());
    }
    println!("{} pending demand(s) for {}:", alerts.len(), user.display_name);
    let rows = alerts
        .iter()
        .map(|a| {
            vec![
                a.action_id.clone(),
                a.title.clone(),
                a.status.to_string(),
                date_or_dash(a.end_date),
                a.reasons
                    .iter()
                    .map(|r| reason_label(*r))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "STATUS", "END", "REASONS"], rows);
    Ok(())
}
