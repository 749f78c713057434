use crate::output::{date_or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use plano_core::action::Action;
use plano_core::deliverable::Deliverable;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use std::path::Path;

#[derive(Subcommand)]
pub enum DeliverableSubcommand {
    /// Record a product of an action
    Add {
        description: String,
        #[arg(long)]
        action: String,
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
        /// Unit of measure, e.g. "kits"
        #[arg(long, default_value = "un")]
        unit: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List deliverables of an action
    List {
        #[arg(long)]
        action: String,
    },
    /// Delete a deliverable
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: DeliverableSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DeliverableSubcommand::Add {
            description,
            action,
            quantity,
            unit,
            date,
        } => {
            let (_, repo) = super::open(root)?;
            let mut deliverable = Deliverable::new(action, &description, quantity, unit);
            deliverable.date = date;
            repo.insert_child::<Action, _>(&deliverable)
                .with_context(|| format!("failed to add deliverable '{description}'"))?;
            if json {
                print_json(&deliverable)?;
            } else {
                println!("Added deliverable: {}", deliverable.id);
            }
            Ok(())
        }
        DeliverableSubcommand::List { action } => {
            let (_, repo) = super::open(root)?;
            let items: Vec<Deliverable> =
                repo.list_by(&action).context("failed to list deliverables")?;
            if json {
                return print_json(&items);
            }
            let rows = items
                .iter()
                .map(|d| {
                    vec![
                        d.id.clone(),
                        d.description.clone(),
                        format!("{} {}", d.quantity, d.unit_of_measure),
                        date_or_dash(d.date),
                    ]
                })
                .collect();
            print_table(&["ID", "DESCRIPTION", "QUANTITY", "DATE"], rows);
            Ok(())
        }
        DeliverableSubcommand::Delete { id } => {
            super::delete(root, Collection::Deliverables, &id, json)
        }
    }
}
