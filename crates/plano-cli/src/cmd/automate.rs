use crate::output::{print_json, print_table};
use chrono::NaiveDate;
use plano_core::automation::StatusAutomation;
use std::path::Path;

pub fn run(root: &Path, today: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let (config, repo) = super::open(root)?;
    let today = super::today_or(today);
    let report = StatusAutomation::from_config(&config.automation).run(repo.as_ref(), today);

    if json {
        return print_json(&report);
    }

    if report.aborted {
        anyhow::bail!("status automation could not load actions");
    }
    println!(
        "Examined {} action(s) as of {today}: {} changed, {} failed.",
        report.examined,
        report.changed(),
        report.failed
    );
    if !report.changes.is_empty() {
        let rows = report
            .changes
            .iter()
            .map(|c| {
                vec![
                    c.action_id.clone(),
                    c.title.clone(),
                    c.from.to_string(),
                    c.to.to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "TITLE", "FROM", "TO"], rows);
    }
    Ok(())
}
