use crate::output::{print_json, print_table};
use skillkit_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root)?;
    let plan = super::load_plan(root, &cfg, file)?;

    if json {
        return print_json(&plan);
    }

    let mut rows = Vec::with_capacity(plan.total_skills());
    for phase in &plan.phases {
        for task in &phase.skills {
            let deps: Vec<String> = task
                .dependencies
                .iter()
                .map(|d| format!("{}:{}", d.kind(), d.name()))
                .collect();
            rows.push(vec![
                format!("{}.{}", phase.order, task.order),
                phase.name.clone(),
                task.name.clone(),
                if deps.is_empty() {
                    "-".to_string()
                } else {
                    deps.join(", ")
                },
            ]);
        }
    }
    print_table(&["#", "PHASE", "SKILL", "DEPENDS ON"], rows);
    Ok(())
}
