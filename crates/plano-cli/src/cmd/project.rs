use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::action::Project;
use plano_core::program::Program;
use plano_core::record::Collection;
use plano_core::repository::RepositoryExt;
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Group actions under a project
    Create {
        name: String,
        #[arg(long)]
        program: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List projects of a program
    List {
        #[arg(long)]
        program: String,
    },
    /// Delete a project
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            name,
            program,
            description,
        } => {
            let (_, repo) = super::open(root)?;
            let mut project = Project::new(program, &name);
            project.description = description;
            repo.insert_child::<Program, _>(&project)
                .with_context(|| format!("failed to create project '{name}'"))?;
            if json {
                print_json(&project)?;
            } else {
                println!("Created project '{}': {}", project.name, project.id);
            }
            Ok(())
        }
        ProjectSubcommand::List { program } => {
            let (_, repo) = super::open(root)?;
            let projects: Vec<Project> =
                repo.list_by(&program).context("failed to list projects")?;
            if json {
                return print_json(&projects);
            }
            let rows = projects
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.name.clone(),
                        or_dash(p.description.as_deref()),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "DESCRIPTION"], rows);
            Ok(())
        }
        ProjectSubcommand::Delete { id } => super::delete(root, Collection::Projects, &id, json),
    }
}
