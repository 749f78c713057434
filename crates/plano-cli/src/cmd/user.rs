use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use plano_core::repository::RepositoryExt;
use plano_core::types::Role;
use plano_core::unit::Unit;
use plano_core::user::UserProfile;
use std::path::Path;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a user profile
    Create {
        /// Display name, as it appears in action responsible fields
        name: String,
        /// admin | gestor | focal | controladoria | prefeito | leitura
        #[arg(long)]
        role: Role,
        #[arg(long)]
        email: Option<String>,
        /// Unit the user belongs to (required for gestor and focal)
        #[arg(long)]
        unit: Option<String>,
    },
    /// List user profiles
    List {
        /// Only users of this unit
        #[arg(long)]
        unit: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Create {
            name,
            role,
            email,
            unit,
        } => create(root, &name, role, email, unit, json),
        UserSubcommand::List { unit } => list(root, unit.as_deref(), json),
    }
}

fn create(
    root: &Path,
    name: &str,
    role: Role,
    email: Option<String>,
    unit: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let mut user = UserProfile::new(name, role);
    user.email = email;
    user.unit_id = unit;
    repo.insert_child::<Unit, _>(&user)
        .with_context(|| format!("failed to create user '{name}'"))?;

    if json {
        print_json(&user)?;
    } else {
        println!("Created user '{}' ({}): {}", user.display_name, user.role, user.id);
    }
    Ok(())
}

fn list(root: &Path, unit: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (_, repo) = super::open(root)?;
    let users: Vec<UserProfile> = match unit {
        Some(unit) => repo.list_by::<UserProfile>(unit),
        None => repo.list_all::<UserProfile>(),
    }
    .context("failed to list users")?;

    if json {
        return print_json(&users);
    }
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.display_name.clone(),
                u.role.to_string(),
                or_dash(u.unit_id.as_deref()),
                or_dash(u.email.as_deref()),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "ROLE", "UNIT", "EMAIL"], rows);
    Ok(())
}
