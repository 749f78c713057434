use crate::output::{date_or_dash, or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use plano_core::action::Action;
use plano_core::completion;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use plano_core::types::ActionStatus;
use std::path::Path;

#[derive(Subcommand)]
pub enum ActionSubcommand {
    /// Create an action (always starts as not_started)
    Create {
        title: String,
        #[arg(long)]
        program: String,
        /// Project of the same program to group the action under
        #[arg(long)]
        project: Option<String>,
        /// Responsible person's name, matched against user names by alerts
        #[arg(long)]
        responsible: Option<String>,
        /// Responsible user id (exact match for alerts)
        #[arg(long)]
        responsible_id: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, default_value_t = 1.0)]
        weight: f64,
        /// Flag the action as a demand raised in a meeting
        #[arg(long)]
        meeting: bool,
    },
    /// List actions
    List {
        #[arg(long)]
        program: Option<String>,
        /// not_started | in_progress | completed | delayed
        #[arg(long)]
        status: Option<ActionStatus>,
    },
    /// Show an action with its deliverables and evidence
    Info { id: String },
    /// Change an action's status (completed requires evidence)
    Status { id: String, status: ActionStatus },
    /// Delete an action
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: ActionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ActionSubcommand::Create {
            title,
            program,
            project,
            responsible,
            responsible_id,
            start,
            end,
            weight,
            meeting,
        } => {
            let mut action = Action::new(program, title).with_dates(start, end);
            action.project_id = project;
            action.responsible = responsible;
            action.responsible_id = responsible_id;
            action.weight = weight;
            action.is_meeting_demand = meeting;
            create(root, action, json)
        }
        ActionSubcommand::List { program, status } => list(root, program.as_deref(), status, json),
        ActionSubcommand::Info { id } => info(root, &id, json),
        ActionSubcommand::Status { id, status } => set_status(root, &id, status, json),
        ActionSubcommand::Delete { id } => super::delete(root, Collection::Actions, &id, json),
    }
}

fn create(root: &Path, action: Action, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    Action::create(repo.as_ref(), &action)
        .with_context(|| format!("failed to create action '{}'", action.title))?;

    if json {
        print_json(&action)?;
    } else {
        println!("Created action '{}': {}", action.title, action.id);
    }
    Ok(())
}

fn list(
    root: &Path,
    program: Option<&str>,
    status: Option<ActionStatus>,
    json: bool,
) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let mut actions: Vec<Action> = match program {
        Some(program) => repo.list_by::<Action>(program),
        None => repo.list_all::<Action>(),
    }
    .context("failed to list actions")?;
    if let Some(status) = status {
        actions.retain(|a| a.status == status);
    }

    if json {
        return print_json(&actions);
    }
    let rows = actions
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.title.clone(),
                a.status.to_string(),
                or_dash(a.responsible.as_deref()),
                date_or_dash(a.start_date),
                date_or_dash(a.end_date),
                if a.is_meeting_demand { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "TITLE", "STATUS", "RESPONSIBLE", "START", "END", "MEETING"],
        rows,
    );
    Ok(())
}

fn info(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let action: Action = repo
        .load(id)
        .with_context(|| format!("failed to load action '{id}'"))?;
    let deliverables: Vec<plano_core::deliverable::Deliverable> = repo.list_by(id)?;
    let evidence: Vec<plano_core::evidence::Evidence> = repo.list_by(id)?;

    if json {
        return print_json(&serde_json::json!({
            "action": action,
            "deliverables": deliverables,
            "evidence": evidence,
            "can_complete": !evidence.is_empty(),
        }));
    }

    println!("Action:      {} ({})", action.title, action.id);
    println!("Program:     {}", action.program_id);
    println!("Status:      {}", action.status);
    println!("Responsible: {}", or_dash(action.responsible.as_deref()));
    println!(
        "Dates:       {} .. {}",
        date_or_dash(action.start_date),
        date_or_dash(action.end_date)
    );
    println!("Weight:      {}", action.weight);
    println!("\nDeliverables ({}):", deliverables.len());
    for d in &deliverables {
        println!("  {}  {} ({} {})", d.id, d.description, d.quantity, d.unit_of_measure);
    }
    println!("\nEvidence ({}):", evidence.len());
    for e in &evidence {
        println!("  {}  [{}] {} {}", e.id, e.kind, e.title, e.url);
    }
    Ok(())
}

fn set_status(root: &Path, id: &str, status: ActionStatus, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let action = completion::set_status(repo.as_ref(), id, status)
        .with_context(|| format!("failed to set status of action '{id}'"))?;

    if json {
        print_json(&action)?;
    } else {
        println!("Action '{}' is now {}.", action.title, action.status);
    }
    Ok(())
}
