use anyhow::Context;
use skillkit_core::config::{config_path, Config, CONFIG_FILE};
use skillkit_core::types::{ProjectType, RunnerKind};
use std::path::Path;

pub fn run(root: &Path, project_type: Option<&str>, generators: bool) -> anyhow::Result<()> {
    let project_type: ProjectType = match project_type {
        Some(s) => s.parse()?,
        None => ProjectType::default(),
    };

    println!("Initializing skillkit in: {}", root.display());

    if config_path(root).exists() {
        println!("  exists:  {CONFIG_FILE}");
        return Ok(());
    }

    let cfg = Config {
        project_type,
        runner: if generators {
            RunnerKind::Generators
        } else {
            RunnerKind::Stub
        },
        ..Default::default()
    };
    cfg.save(root)
        .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
    println!("  created: {CONFIG_FILE}");
    Ok(())
}
