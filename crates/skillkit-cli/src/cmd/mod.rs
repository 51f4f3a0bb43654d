pub mod generate;
pub mod init;
pub mod plan;
pub mod run;

use anyhow::Context;
use skillkit_core::config::Config;
use skillkit_core::coordinator::Plan;
use std::path::Path;

/// The plan a command operates on: an explicit file, else the config's.
pub fn load_plan(root: &Path, cfg: &Config, file: Option<&Path>) -> anyhow::Result<Plan> {
    match file {
        Some(path) => Plan::from_yaml_file(path)
            .with_context(|| format!("failed to load plan from {}", path.display())),
        None => cfg.plan().with_context(|| {
            format!("invalid phases in {}", skillkit_core::config::config_path(root).display())
        }),
    }
}
