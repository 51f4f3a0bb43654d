use crate::output::print_json;
use anyhow::Context;
use skillkit_core::config::Config;
use skillkit_core::coordinator::{ProjectCoordinator, StubRunner};
use skillkit_core::dispatch::{artifacts_in, GeneratorRunner};
use skillkit_core::io::write_artifacts;
use skillkit_core::types::RunnerKind;
use std::path::{Path, PathBuf};

pub struct RunArgs {
    pub plan: Option<PathBuf>,
    pub requirements: Option<String>,
    pub generators: bool,
    pub write: bool,
    pub debug: bool,
}

pub fn run(root: &Path, args: RunArgs, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load skillkit.yaml")?;
    let plan = super::load_plan(root, &cfg, args.plan.as_deref())?;

    let requirements: serde_json::Value = match args.requirements.as_deref() {
        Some(raw) => serde_json::from_str(raw).context("--requirements is not valid JSON")?,
        None => serde_json::json!({}),
    };

    let options = cfg
        .coordinator_options(plan)
        .with_debug(cfg.debug_mode || args.debug);
    let mut coordinator = if args.generators || cfg.runner == RunnerKind::Generators {
        ProjectCoordinator::with_runner(options, GeneratorRunner)
    } else {
        ProjectCoordinator::with_runner(options, StubRunner)
    };

    let outcome = coordinator.start_project(requirements);
    let state = coordinator.project_state();

    if args.write {
        let out_dir = cfg.output_path(root);
        for skill in &state.completed_skills {
            let artifacts = state.context.get(skill).map(artifacts_in).unwrap_or_default();
            if artifacts.is_empty() {
                continue;
            }
            let written = write_artifacts(&out_dir.join(skill), &artifacts)
                .with_context(|| format!("failed to write artifacts for {skill}"))?;
            if !json {
                for path in written {
                    let shown = path.strip_prefix(root).unwrap_or(&path);
                    println!("  wrote: {}", shown.display());
                }
            }
        }
    }

    if json {
        print_json(&state)?;
    } else {
        println!("{}", coordinator.progress_report());
        println!();
        println!("{}", coordinator.final_report());
    }

    outcome.context("project run aborted")
}
