use crate::output::{print_json, print_table};
use anyhow::Context;
use plano_core::dashboard::{ProgramSummary, Snapshot, StatusCounts};
use plano_core::program::Program;
use plano_core::repository::RepositoryExt;
use plano_core::unit::Unit;
use plano_core::user::UserProfile;
use std::path::Path;

fn counts_row(label: String, c: &StatusCounts, progress: String) -> Vec<String> {
    vec![
        label,
        c.total.to_string(),
        c.not_started.to_string(),
        c.in_progress.to_string(),
        c.delayed.to_string(),
        c.completed.to_string(),
        progress,
    ]
}

const HEADERS: &[&str] = &["", "ACTIONS", "NOT STARTED", "IN PROGRESS", "DELAYED", "DONE", "PROGRESS"];

pub fn run(
    root: &Path,
    unit: Option<&str>,
    program: Option<&str>,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let snapshot = Snapshot::load(repo.as_ref()).context("failed to load dashboard data")?;

    if let Some(id) = program {
        let program: Program = repo
            .load(id)
            .with_context(|| format!("failed to load program '{id}'"))?;
        return print_program(&snapshot.program_summary(&program), json);
    }

    if let Some(id) = unit {
        let unit: Unit = repo
            .load(id)
            .with_context(|| format!("failed to load unit '{id}'"))?;
        let summary = snapshot.unit_summary(&unit);
        if json {
            return print_json(&summary);
        }
        println!("{} ({})", summary.name, summary.acronym);
        let rows = summary
            .programs
            .iter()
            .map(|p| counts_row(p.name.clone(), &p.actions, format!("{:.0}%", p.progress_percent)))
            .collect();
        print_table(HEADERS, rows);
        return Ok(());
    }

    let viewer = user
        .map(|id| repo.load::<UserProfile>(id))
        .transpose()
        .context("failed to load user")?;
    let overview = snapshot.overview(viewer.as_ref());
    if json {
        return print_json(&overview);
    }

    let mut rows: Vec<Vec<String>> = overview
        .units
        .iter()
        .map(|u| counts_row(u.acronym.clone(), &u.actions, String::new()))
        .collect();
    rows.push(counts_row("TOTAL".to_string(), &overview.totals, String::new()));
    print_table(HEADERS, rows);

    println!("\nRisk matrix (rows: impact 5..1, columns: probability 1..5):");
    for impact in (0..5).rev() {
        let cells: Vec<String> = overview.risk_matrix[impact]
            .iter()
            .map(|n| format!("{n:>3}"))
            .collect();
        println!("  {} |{}", impact + 1, cells.join(""));
    }
    Ok(())
}

fn print_program(s: &ProgramSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(s);
    }
    println!("{} ({})", s.name, s.program_id);
    print_table(
        HEADERS,
        vec![counts_row(
            "actions".to_string(),
            &s.actions,
            format!("{:.0}%", s.progress_percent),
        )],
    );
    println!(
        "\nIndicators: {}  Deliverables: {}  Evidence: {}  Risks: {}",
        s.indicators, s.deliverables, s.evidence, s.risks
    );
    if let Some(max) = s.max_risk_severity {
        println!("Highest risk severity: {max}");
    }
    if s.readiness.is_valid {
        println!("Ready for execution.");
    } else {
        println!("Not ready:");
        for e in &s.readiness.errors {
            println!("  - {e}");
        }
    }
    Ok(())
}
