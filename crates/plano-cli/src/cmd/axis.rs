use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::repository::RepositoryExt;
use plano_core::unit::Axis;
use std::path::Path;

#[derive(Subcommand)]
pub enum AxisSubcommand {
    /// Add a strategic axis
    Create {
        name: String,
        /// Display color as #RRGGBB
        #[arg(long, default_value = "#888888")]
        color: String,
    },
    /// List strategic axes
    List,
}

pub fn run(root: &Path, subcmd: AxisSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    match subcmd {
        AxisSubcommand::Create { name, color } => {
            let axis = Axis::new(&name, color);
            repo.insert_record(&axis)
                .with_context(|| format!("failed to create axis '{name}'"))?;
            if json {
                print_json(&axis)?;
            } else {
                println!("Created axis '{}': {}", axis.name, axis.id);
            }
        }
        AxisSubcommand::List => {
            let axes: Vec<Axis> = repo.list_all().context("failed to list axes")?;
            if json {
                return print_json(&axes);
            }
            let rows = axes
                .iter()
                .map(|a| vec![a.id.clone(), a.name.clone(), a.color.clone()])
                .collect();
            print_table(&["ID", "NAME", "COLOR"], rows);
        }
    }
    Ok(())
}
