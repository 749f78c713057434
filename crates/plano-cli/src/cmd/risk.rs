use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::program::Program;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use plano_core::risk::Risk;
use std::path::Path;

#[derive(Subcommand)]
pub enum RiskSubcommand {
    /// Register a risk; severity is impact × probability
    Add {
        description: String,
        #[arg(long)]
        program: String,
        /// 1..5
        #[arg(long)]
        impact: u8,
        /// 1..5
        #[arg(long)]
        probability: u8,
        #[arg(long)]
        mitigation: Option<String>,
    },
    /// List risks of a program, most severe first
    List {
        #[arg(long)]
        program: String,
    },
    /// Delete a risk
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: RiskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RiskSubcommand::Add {
            description,
            program,
            impact,
            probability,
            mitigation,
        } => {
            let (_, repo) = super::open(root)?;
            let mut risk = Risk::new(program, description, impact, probability);
            risk.mitigation = mitigation;
            repo.insert_child::<Program, _>(&risk)
                .context("failed to add risk")?;
            if json {
                print_json(&risk)?;
            } else {
                println!(
                    "Added risk {} (severity {}, {})",
                    risk.id,
                    risk.severity,
                    risk.level()
                );
            }
            Ok(())
        }
        RiskSubcommand::List { program } => {
            let (_, repo) = super::open(root)?;
            let mut risks: Vec<Risk> = repo.list_by(&program).context("failed to list risks")?;
            risks.sort_by(|a, b| b.severity.cmp(&a.severity));
            if json {
                return print_json(&risks);
            }
            let rows = risks
                .iter()
                .map(|r| {
                    vec![
                        r.id.clone(),
                        r.description.clone(),
                        format!("{}x{}", r.impact, r.probability),
                        format!("{} ({})", r.severity, r.level()),
                        or_dash(r.mitigation.as_deref()),
                    ]
                })
                .collect();
            print_table(&["ID", "DESCRIPTION", "I×P", "SEVERITY", "MITIGATION"], rows);
            Ok(())
        }
        RiskSubcommand::Delete { id } => super::delete(root, Collection::Risks, &id, json),
    }
}
