use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::action::Action;
use plano_core::evidence::Evidence;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use plano_core::types::EvidenceKind;
use std::path::Path;

#[derive(Subcommand)]
pub enum EvidenceSubcommand {
    /// Attach proof of execution to an action
    Add {
        title: String,
        #[arg(long)]
        action: String,
        /// Where the file or page lives
        #[arg(long)]
        url: String,
        /// photo | document | link | other
        #[arg(long, default_value = "document")]
        kind: EvidenceKind,
        #[arg(long)]
        description: Option<String>,
    },
    /// List evidence of an action
    List {
        #[arg(long)]
        action: String,
    },
    /// Delete an evidence item
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: EvidenceSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        EvidenceSubcommand::Add {
            title,
            action,
            url,
            kind,
            description,
        } => {
            let (_, repo) = super::open(root)?;
            let mut evidence = Evidence::new(action, &title, url);
            evidence.kind = kind;
            evidence.description = description;
            repo.insert_child::<Action, _>(&evidence)
                .with_context(|| format!("failed to attach evidence '{title}'"))?;
            if json {
                print_json(&evidence)?;
            } else {
                println!("Attached evidence '{}': {}", evidence.title, evidence.id);
            }
            Ok(())
        }
        EvidenceSubcommand::List { action } => {
            let (_, repo) = super::open(root)?;
            let items: Vec<Evidence> = repo.list_by(&action).context("failed to list evidence")?;
            if json {
                return print_json(&items);
            }
            let rows = items
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        e.kind.to_string(),
                        e.title.clone(),
                        e.url.clone(),
                    ]
                })
                .collect();
            print_table(&["ID", "KIND", "TITLE", "URL"], rows);
            Ok(())
        }
        EvidenceSubcommand::Delete { id } => super::delete(root, Collection::Evidence, &id, json),
    }
}
