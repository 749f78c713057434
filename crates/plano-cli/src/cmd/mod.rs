pub mod action;
pub mod alerts;
pub mod automate;
pub mod axis;
pub mod config;
pub mod dashboard;
pub mod deliverable;
pub mod evidence;
pub mod indicator;
pub mod init;
pub mod program;
pub mod project;
pub mod risk;
pub mod ui;
pub mod unit;
pub mod user;

use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDate;
use plano_core::config::Config;
use plano_core::record::Collection;
use plano_core::repository::Repository;
use std::path::Path;

/// Load the config and open the store it selects.
pub(crate) fn open(root: &Path) -> anyhow::Result<(Config, Box<dyn Repository>)> {
    plano_core::store::open_configured(root)
        .with_context(|| format!("failed to open plano workspace at {}", root.display()))
}

/// `--today` override, else the local calendar date.
pub(crate) fn today_or(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Hard-delete one record. Nothing cascades.
pub(crate) fn delete(
    root: &Path,
    collection: Collection,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (_, repo) = open(root)?;
    let removed = repo
        .delete(collection, id)
        .with_context(|| format!("failed to delete {collection} record '{id}'"))?;
    if !removed {
        anyhow::bail!("{collection} record not found: {id}");
    }
    if json {
        print_json(&serde_json::json!({ "deleted": id, "collection": collection }))?;
    } else {
        println!("Deleted {collection} record '{id}'.");
    }
    Ok(())
}
