use crate::error::{Result, SkillkitError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

/// A prerequisite of a skill task, tagged by the namespace it lives in.
///
/// In YAML a dependency is written as `- phase: 需求分析` or
/// `- skill: product-expert`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    Phase(String),
    Skill(String),
}

impl Dependency {
    pub fn phase(name: impl Into<String>) -> Self {
        Dependency::Phase(name.into())
    }

    pub fn skill(name: impl Into<String>) -> Self {
        Dependency::Skill(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Dependency::Phase(n) | Dependency::Skill(n) => n,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Dependency::Phase(_) => "phase",
            Dependency::Skill(_) => "skill",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// SkillTask / PhaseDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTask {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_input")]
    pub input: Value,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub dependencies: Vec<Dependency>,
}

fn default_input() -> Value {
    Value::Object(Default::default())
}

impl SkillTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: 0,
            input: default_input(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    pub fn depends_on(mut self, dep: Dependency) -> Self {
        self.dependencies.push(dep);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub skills: Vec<SkillTask>,
}

impl PhaseDefinition {
    pub fn new(name: impl Into<String>, skills: Vec<SkillTask>) -> Self {
        Self {
            name: name.into(),
            order: 0,
            skills,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// An ordered list of phases. Phases and their skills execute in list order;
/// `order` fields are renumbered from list position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub phases: Vec<PhaseDefinition>,
}

impl Plan {
    pub fn new(phases: Vec<PhaseDefinition>) -> Self {
        let mut plan = Self { phases };
        plan.renumber();
        plan
    }

    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let plan: Plan = serde_yaml::from_str(data)?;
        let plan = Plan::new(plan.phases);
        plan.validate()?;
        Ok(plan)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&data)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn total_skills(&self) -> usize {
        self.phases.iter().map(|p| p.skills.len()).sum()
    }

    fn renumber(&mut self) {
        for (i, phase) in self.phases.iter_mut().enumerate() {
            phase.order = i as u32 + 1;
            for (j, skill) in phase.skills.iter_mut().enumerate() {
                skill.order = j as u32 + 1;
            }
        }
    }

    /// Phase names must be unique, and skill names must be unique across the
    /// whole plan. Dependencies are not resolved here: an unknown dependency
    /// is a runtime failure of the skill that declares it.
    pub fn validate(&self) -> Result<()> {
        let mut phases = HashSet::new();
        let mut skills = HashSet::new();
        for phase in &self.phases {
            if phase.name.trim().is_empty() {
                return Err(SkillkitError::InvalidPlan("phase with empty name".into()));
            }
            if !phases.insert(phase.name.as_str()) {
                return Err(SkillkitError::InvalidPlan(format!(
                    "duplicate phase '{}'",
                    phase.name
                )));
            }
            for skill in &phase.skills {
                if skill.name.trim().is_empty() {
                    return Err(SkillkitError::InvalidPlan(format!(
                        "skill with empty name in phase '{}'",
                        phase.name
                    )));
                }
                if !skills.insert(skill.name.as_str()) {
                    return Err(SkillkitError::InvalidPlan(format!(
                        "duplicate skill '{}'",
                        skill.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The built-in product development plan.
    pub fn default_plan() -> Self {
        Plan::new(vec![
            PhaseDefinition::new(
                "需求分析",
                vec![
                    SkillTask::new("customer-representative"),
                    SkillTask::new("requirements-analyst")
                        .depends_on(Dependency::skill("customer-representative")),
                ],
            ),
            PhaseDefinition::new(
                "产品设计",
                vec![
                    SkillTask::new("product-expert").depends_on(Dependency::phase("需求分析")),
                    SkillTask::new("ui-expert").depends_on(Dependency::skill("product-expert")),
                ],
            ),
            PhaseDefinition::new(
                "架构设计",
                vec![SkillTask::new("technical-architect")
                    .depends_on(Dependency::phase("产品设计"))],
            ),
            PhaseDefinition::new(
                "开发实现",
                vec![
                    SkillTask::new("backend-engineer").depends_on(Dependency::phase("架构设计")),
                    SkillTask::new("frontend-engineer").depends_on(Dependency::phase("架构设计")),
                    SkillTask::new("test-framework-builder")
                        .depends_on(Dependency::skill("backend-engineer")),
                ],
            ),
            PhaseDefinition::new(
                "测试验证",
                vec![SkillTask::new("tester").depends_on(Dependency::phase("开发实现"))],
            ),
            PhaseDefinition::new(
                "部署上线",
                vec![SkillTask::new("devops-generator").depends_on(Dependency::phase("测试验证"))],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_has_six_ordered_phases() {
        let plan = Plan::default_plan();
        let names: Vec<&str> = plan.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["需求分析", "产品设计", "架构设计", "开发实现", "测试验证", "部署上线"]
        );
        assert_eq!(plan.phases[3].order, 4);
        assert_eq!(plan.phases[3].skills[2].order, 3);
        assert_eq!(plan.total_skills(), 10);
        plan.validate().unwrap();
    }

    #[test]
    fn dependencies_parse_from_tagged_yaml() {
        let yaml = r#"
phases:
  - name: A
    skills:
      - name: s1
  - name: B
    skills:
      - name: s2
        input: { framework: vitest }
        dependencies:
          - phase: A
          - skill: s1
"#;
        let plan = Plan::from_yaml_str(yaml).unwrap();
        let s2 = &plan.phases[1].skills[0];
        assert_eq!(
            s2.dependencies,
            vec![Dependency::phase("A"), Dependency::skill("s1")]
        );
        assert_eq!(s2.input["framework"], "vitest");
        assert!(plan.phases[0].skills[0].input.is_object());
    }

    #[test]
    fn duplicate_phase_is_rejected() {
        let yaml = "phases:\n  - name: A\n  - name: A\n";
        let err = Plan::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate phase 'A'"));
    }

    #[test]
    fn duplicate_skill_across_phases_is_rejected() {
        let plan = Plan::new(vec![
            PhaseDefinition::new("A", vec![SkillTask::new("s")]),
            PhaseDefinition::new("B", vec![SkillTask::new("s")]),
        ]);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn unknown_dependency_passes_validation() {
        let plan = Plan::new(vec![PhaseDefinition::new(
            "A",
            vec![SkillTask::new("s").depends_on(Dependency::phase("missing"))],
        )]);
        plan.validate().unwrap();
    }

    #[test]
    fn plan_yaml_roundtrip_keeps_dependencies() {
        let plan = Plan::default_plan();
        let yaml = plan.to_yaml().unwrap();
        assert!(yaml.contains("phase: 需求分析"));
        let back = Plan::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn dependency_display_is_bare_name() {
        assert_eq!(Dependency::skill("tester").to_string(), "tester");
        assert_eq!(Dependency::phase("A").kind(), "phase");
    }
}
