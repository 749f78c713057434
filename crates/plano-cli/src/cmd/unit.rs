use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::program::Program;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use plano_core::unit::Unit;
use std::path::Path;

#[derive(Subcommand)]
pub enum UnitSubcommand {
    /// Register a secretariat
    Create {
        name: String,
        /// Upper-case acronym, e.g. SEMED
        #[arg(long)]
        acronym: String,
    },
    /// List all units
    List,
    /// Delete a unit (its programs are kept)
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: UnitSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UnitSubcommand::Create { name, acronym } => create(root, &name, &acronym, json),
        UnitSubcommand::List => list(root, json),
        UnitSubcommand::Delete { id } => super::delete(root, Collection::Units, &id, json),
    }
}

fn create(root: &Path, name: &str, acronym: &str, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let unit = Unit::new(name, acronym);
    repo.insert_record(&unit)
        .with_context(|| format!("failed to create unit '{name}'"))?;

    if json {
        print_json(&unit)?;
    } else {
        println!("Created unit {} ({}): {}", unit.acronym, unit.name, unit.id);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let units: Vec<Unit> = repo.list_all().context("failed to list units")?;

    if json {
        return print_json(&units);
    }

    let programs: Vec<Program> = repo.list_all().context("failed to list programs")?;
    let rows = units
        .iter()
        .map(|u| {
            let count = programs.iter().filter(|p| p.unit_id == u.id).count();
            vec![
                u.id.clone(),
                u.acronym.clone(),
                u.name.clone(),
                count.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "ACRONYM", "NAME", "PROGRAMS"], rows);
    Ok(())
}
