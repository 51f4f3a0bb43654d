use crate::coordinator::{CoordinatorOptions, PhaseDefinition, Plan};
use crate::error::Result;
use crate::types::{ProjectType, RunnerKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "skillkit.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project settings read from `skillkit.yaml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub runner: RunnerKind,
    /// A full plan; absent means the built-in default plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<PhaseDefinition>>,
}

fn default_output_dir() -> String {
    "generated".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_type: ProjectType::default(),
            debug_mode: false,
            output_dir: default_output_dir(),
            runner: RunnerKind::default(),
            phases: None,
        }
    }
}

impl Config {
    /// Defaults when the file is missing; an error when it is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// The configured plan, validated, or the default plan.
    pub fn plan(&self) -> Result<Plan> {
        match &self.phases {
            Some(phases) => {
                let plan = Plan::new(phases.clone());
                plan.validate()?;
                Ok(plan)
            }
            None => Ok(Plan::default_plan()),
        }
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    pub fn coordinator_options(&self, plan: Plan) -> CoordinatorOptions {
        CoordinatorOptions::new(self.project_type, plan).with_debug(self.debug_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.output_dir, "generated");
        assert_eq!(cfg.plan().unwrap(), Plan::default_plan());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            config_path(dir.path()),
            "project_type: backend\nrunner: generators\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.project_type, ProjectType::Backend);
        assert_eq!(cfg.runner, RunnerKind::Generators);
        assert!(!cfg.debug_mode);
        assert_eq!(cfg.output_path(dir.path()), dir.path().join("generated"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(config_path(dir.path()), "project_type: [web\n").unwrap();
        assert!(Config::load(dir.path()).is_err());

        std::fs::write(config_path(dir.path()), "project_type: embedded\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            debug_mode: true,
            output_dir: "out".into(),
            ..Default::default()
        };
        cfg.save(dir.path()).unwrap();
        let text = std::fs::read_to_string(config_path(dir.path())).unwrap();
        assert!(!text.contains("phases"));
        assert_eq!(Config::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn configured_phases_replace_default_plan() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            config_path(dir.path()),
            "phases:\n  - name: build\n    skills:\n      - name: compile\n  - name: ship\n    skills:\n      - name: deploy\n        dependencies:\n          - phase: build\n",
        )
        .unwrap();
        let plan = Config::load(dir.path()).unwrap().plan().unwrap();
        assert_eq!(plan.phases.len(), 2);
        assert_eq!(plan.phases[1].order, 2);
        assert_eq!(plan.phases[1].skills[0].dependencies[0].name(), "build");
    }

    #[test]
    fn duplicate_configured_skills_are_rejected() {
        let cfg = Config {
            phases: Some(vec![
                PhaseDefinition::new("a", vec![crate::coordinator::SkillTask::new("x")]),
                PhaseDefinition::new("b", vec![crate::coordinator::SkillTask::new("x")]),
            ]),
            ..Default::default()
        };
        assert!(cfg.plan().is_err());
    }
}
