use crate::output::{date_or_dash, or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::action::{Action, Project};
use plano_core::dashboard::Snapshot;
use plano_core::indicator::Indicator;
use plano_core::program::Program;
use plano_core::readiness;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use plano_core::risk::Risk;
use plano_core::user::UserProfile;
use std::path::Path;

#[derive(Subcommand)]
pub enum ProgramSubcommand {
    /// Create a program for a unit (subject to the per-unit limit)
    Create {
        name: String,
        /// Owning unit id
        #[arg(long)]
        unit: String,
        /// Strategic axis id (see `plano axis list`)
        #[arg(long)]
        axis: String,
        #[arg(long, default_value = "")]
        objective: String,
        #[arg(long, default_value = "")]
        problem: String,
        #[arg(long = "audience", default_value = "")]
        target_audience: String,
    },
    /// List programs
    List {
        /// Only programs of this unit
        #[arg(long)]
        unit: Option<String>,
        /// Only programs this user may see
        #[arg(long)]
        user: Option<String>,
    },
    /// Show a program with its projects, actions, indicators and risks
    Info { id: String },
    /// Check whether a program is ready for execution
    Validate { id: String },
    /// Delete a program (children are kept)
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: ProgramSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProgramSubcommand::Create {
            name,
            unit,
            axis,
            objective,
            problem,
            target_audience,
        } => {
            let mut program = Program::new(unit, axis, name);
            program.objective = objective;
            program.problem = problem;
            program.target_audience = target_audience;
            create(root, program, json)
        }
        ProgramSubcommand::List { unit, user } => {
            list(root, unit.as_deref(), user.as_deref(), json)
        }
        ProgramSubcommand::Info { id } => info(root, &id, json),
        ProgramSubcommand::Validate { id } => validate(root, &id, json),
        ProgramSubcommand::Delete { id } => super::delete(root, Collection::Programs, &id, json),
    }
}

fn create(root: &Path, program: Program, json: bool) -> anyhow::Result<()> {
    let (config, repo) = super::open(root)?;
    Program::create(repo.as_ref(), &program, config.limits.programs_per_unit)
        .with_context(|| format!("failed to create program '{}'", program.name))?;

    if json {
        print_json(&program)?;
    } else {
        println!("Created program '{}': {}", program.name, program.id);
    }
    Ok(())
}

fn list(root: &Path, unit: Option<&str>, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let viewer = user
        .map(|id| repo.load::<UserProfile>(id))
        .transpose()
        .context("failed to load user")?;
    let programs: Vec<Program> = match unit {
        Some(unit) => repo.list_by::<Program>(unit),
        None => repo.list_all::<Program>(),
    }
    .context("failed to list programs")?
    .into_iter()
    .filter(|p| viewer.as_ref().map_or(true, |v| v.can_view(&p.unit_id)))
    .collect();

    if json {
        return print_json(&programs);
    }

    let snapshot = Snapshot::load(repo.as_ref()).context("failed to load dashboard data")?;
    let rows = programs
        .iter()
        .map(|p| {
            let s = snapshot.program_summary(p);
            vec![
                p.id.clone(),
                p.name.clone(),
                p.unit_id.clone(),
                p.axis_id.clone(),
                s.actions.total.to_string(),
                format!("{:.0}%", s.progress_percent),
                if s.readiness.is_valid { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "UNIT", "AXIS", "ACTIONS", "PROGRESS", "READY"],
        rows,
    );
    Ok(())
}

fn info(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let program: Program = repo.load(id).with_context(|| format!("failed to load program '{id}'"))?;
    let projects: Vec<Project> = repo.list_by(id)?;
    let actions: Vec<Action> = repo.list_by(id)?;
    let indicators: Vec<Indicator> = repo.list_by(id)?;
    let risks: Vec<Risk> = repo.list_by(id)?;

    if json {
        return print_json(&serde_json::json!({
            "program": program,
            "projects": projects,
            "actions": actions,
            "indicators": indicators,
            "risks": risks,
        }));
    }

    println!("Program:   {} ({})", program.name, program.id);
    println!("Unit:      {}", program.unit_id);
    println!("Axis:      {}", program.axis_id);
    if !program.objective.is_empty() {
        println!("Objective: {}", program.objective);
    }
    if !program.problem.is_empty() {
        println!("Problem:   {}", program.problem);
    }
    if !program.target_audience.is_empty() {
        println!("Audience:  {}", program.target_audience);
    }

    println!("\nProjects ({}):", projects.len());
    for p in &projects {
        println!("  {}  {}", p.id, p.name);
    }

    println!("\nActions ({}):", actions.len());
    let rows = actions
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.title.clone(),
                a.status.to_string(),
                or_dash(a.responsible.as_deref()),
                date_or_dash(a.end_date),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "STATUS", "RESPONSIBLE", "END"], rows);

    println!("\nIndicators ({}):", indicators.len());
    for i in &indicators {
        println!(
            "  {}  {}: {} → {} {}",
            i.id, i.name, i.baseline, i.target, i.unit_of_measure
        );
    }

    println!("\nRisks ({}):", risks.len());
    for r in &risks {
        println!("  {}  [{} {}] {}", r.id, r.level(), r.severity, r.description);
    }
    Ok(())
}

fn validate(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let result = readiness::validate(repo.as_ref(), id)
        .with_context(|| format!("failed to validate program '{id}'"))?;

    if json {
        print_json(&result)?;
    } else if result.is_valid {
        println!("Program is ready for execution.");
    } else {
        for e in &result.errors {
            println!("[error] {e}");
        }
    }

    if !result.is_valid {
        anyhow::bail!("program '{id}' is not ready: {} problem(s)", result.errors.len());
    }
    Ok(())
}
