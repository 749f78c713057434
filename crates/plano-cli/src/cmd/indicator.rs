use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::indicator::Indicator;
use plano_core::program::Program;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use std::path::Path;

#[derive(Subcommand)]
pub enum IndicatorSubcommand {
    /// Add an outcome indicator to a program
    Add {
        name: String,
        #[arg(long)]
        program: String,
        #[arg(long)]
        baseline: f64,
        #[arg(long)]
        target: f64,
        /// Unit of measure, e.g. "%"
        #[arg(long, default_value = "")]
        unit: String,
    },
    /// List indicators of a program
    List {
        #[arg(long)]
        program: String,
    },
    /// Delete an indicator
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: IndicatorSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IndicatorSubcommand::Add {
            name,
            program,
            baseline,
            target,
            unit,
        } => {
            let (_, repo) = super::open(root)?;
            let indicator = Indicator::new(program, &name, baseline, target, unit);
            repo.insert_child::<Program, _>(&indicator)
                .with_context(|| format!("failed to add indicator '{name}'"))?;
            if json {
                print_json(&indicator)?;
            } else {
                println!("Added indicator '{}': {}", indicator.name, indicator.id);
            }
            Ok(())
        }
        IndicatorSubcommand::List { program } => {
            let (_, repo) = super::open(root)?;
            let items: Vec<Indicator> =
                repo.list_by(&program).context("failed to list indicators")?;
            if json {
                return print_json(&items);
            }
            let rows = items
                .iter()
                .map(|i| {
                    vec![
                        i.id.clone(),
                        i.name.clone(),
                        i.baseline.to_string(),
                        i.target.to_string(),
                        i.unit_of_measure.clone(),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "BASELINE", "TARGET", "UNIT"], rows);
            Ok(())
        }
        IndicatorSubcommand::Delete { id } => {
            super::delete(root, Collection::Indicators, &id, json)
        }
    }
}
