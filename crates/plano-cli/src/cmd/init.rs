use crate::output::print_json;
use anyhow::Context;
use plano_core::config::Backend;
use plano_core::setup;
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, backend: Backend, json: bool) -> anyhow::Result<()> {
    let default_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "prefeitura".to_string());
    let name = name.unwrap_or(&default_name);

    let report = setup::init(root, name, backend)
        .with_context(|| format!("failed to initialize plano in {}", root.display()))?;

    if json {
        return print_json(&report);
    }

    println!("Initializing plano in: {}", root.display());
    if report.config_created {
        println!("  created: .plano/config.yaml (backend: {})", report.backend);
    } else {
        println!("  exists:  .plano/config.yaml (backend: {})", report.backend);
    }
    for id in &report.axes_seeded {
        println!("  seeded:  axis '{id}'");
    }
    if report.axes_existing > 0 {
        println!("  exists:  {} default axes", report.axes_existing);
    }
    println!("\nNext: plano unit create \"Secretaria de Educação\" --acronym SEMED");
    Ok(())
}
