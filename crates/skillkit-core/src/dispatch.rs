//! Skill dispatch onto the template generators.
//!
//! [`GeneratorRunner`] is the [`SkillRunner`] a configured project uses when
//! `runner: generators` is set. Skills with a generator produce
//! `{success, skill, artifacts, timestamp}`; the remaining default-plan
//! skills fall back to [`StubRunner`] output.

use crate::coordinator::{Plan, SkillError, SkillRunner, StubRunner};
use crate::error::{Result, SkillkitError};
use crate::generators::{
    api, backup, cicd, component, design, docs, prototype, schema, test_config, test_gen, wbs,
};
use crate::io::Artifact;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const INVALID_INPUT_CODE: &str = "INVALID_INPUT";
pub const UNKNOWN_SKILL_CODE: &str = "UNKNOWN_SKILL";

/// Skill names backed by a generator, in dispatch order.
pub const GENERATOR_SKILLS: &[&str] = &[
    "backend-engineer",
    "data-engineer",
    "devops-generator",
    "disaster-recovery-planner",
    "frontend-engineer",
    "product-documentation-expert",
    "project-planner",
    "ui-expert",
    "test-framework-builder",
    "tester",
];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input accepted by the `ui-expert` skill: a prototype and its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiRequest {
    pub prototype: prototype::PrototypeRequest,
    pub tokens: design::TokensRequest,
}

/// Decode a skill input. `null` and `{}` both mean the defaults.
fn parse_input<T: DeserializeOwned + Default>(skill: &str, input: &Value) -> Result<T> {
    if input.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(input.clone()).map_err(|e| SkillkitError::InvalidInput {
        skill: skill.to_string(),
        reason: e.to_string(),
    })
}

fn nest(dir: &str, files: Vec<Artifact>) -> Vec<Artifact> {
    files
        .into_iter()
        .map(|a| Artifact::new(format!("{dir}/{}", a.path), a.content))
        .collect()
}

fn ui_artifacts(req: &UiRequest) -> Result<Vec<Artifact>> {
    let mut builder = prototype::PrototypeBuilder::default();
    if req.prototype.wireframe {
        builder = builder.wireframe();
    }
    let export = prototype::export_prototype(&builder, &req.prototype);
    let mut files = nest("prototype", export.files);
    files.extend(nest("design", design::design_bundle(&req.tokens)?));
    Ok(files)
}

/// Run the generator behind `skill`. `Ok(None)` means the skill has no
/// generator.
pub fn generate_for_skill(
    skill: &str,
    input: &Value,
    now: DateTime<Utc>,
) -> Result<Option<Vec<Artifact>>> {
    let files = match skill {
        "backend-engineer" => {
            let req: api::ApiRequest = parse_input(skill, input)?;
            api::api_bundle(&req)
        }
        "data-engineer" => {
            let req: schema::SchemaRequest = parse_input(skill, input)?;
            schema::schema_bundle(&req, now)
        }
        "devops-generator" => {
            let req: cicd::DevopsRequest = parse_input(skill, input)?;
            cicd::devops_bundle(&req)
        }
        "disaster-recovery-planner" => {
            let req: backup::BackupRequest = parse_input(skill, input)?;
            backup::backup_bundle(&req.resolve_plan(), now)
        }
        "frontend-engineer" => {
            let req: component::ComponentRequest = parse_input(skill, input)?;
            component::component_bundle(&req)
        }
        "product-documentation-expert" => {
            let req: docs::DocsRequest = parse_input(skill, input)?;
            docs::all_documents(&req)
        }
        "project-planner" => {
            let req: wbs::WbsRequest = parse_input(skill, input)?;
            wbs::wbs_bundle(&wbs::generate_wbs(&req)?)?
        }
        "ui-expert" => {
            let req: UiRequest = parse_input(skill, input)?;
            ui_artifacts(&req)?
        }
        "test-framework-builder" => {
            let req: test_config::TestConfigRequest = parse_input(skill, input)?;
            test_config::test_config_bundle(&req)
        }
        "tester" => {
            let req: test_gen::TestGenRequest = parse_input(skill, input)?;
            test_gen::test_gen_bundle(&req, now)?
        }
        _ => return Ok(None),
    };
    Ok(Some(files))
}

/// Whether `skill` is handled at all: a generator skill or a default-plan skill.
pub fn is_known_skill(skill: &str) -> bool {
    GENERATOR_SKILLS.contains(&skill)
        || Plan::default_plan()
            .phases
            .iter()
            .flat_map(|p| &p.skills)
            .any(|t| t.name == skill)
}

/// Artifacts carried in a skill output, if any.
pub fn artifacts_in(output: &Value) -> Vec<Artifact> {
    output
        .get("artifacts")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// GeneratorRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorRunner;

impl SkillRunner for GeneratorRunner {
    fn invoke(&self, skill: &str, input: &Value) -> std::result::Result<Value, SkillError> {
        let now = Utc::now();
        match generate_for_skill(skill, input, now) {
            Ok(Some(artifacts)) => {
                tracing::debug!(skill, count = artifacts.len(), "generated artifacts");
                Ok(json!({
                    "success": true,
                    "skill": skill,
                    "artifacts": artifacts,
                    "timestamp": now.to_rfc3339(),
                }))
            }
            Ok(None) if is_known_skill(skill) => Ok(StubRunner::output_for(skill)),
            Ok(None) => Err(SkillError::new(SkillkitError::UnknownSkill(skill.to_string()).to_string())
                .with_code(UNKNOWN_SKILL_CODE)),
            Err(e) => Err(SkillError::new(e.to_string()).with_code(INVALID_INPUT_CODE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{CoordinatorOptions, PhaseDefinition, ProjectCoordinator, SkillTask};
    use crate::types::ProjectType;

    fn paths(output: &Value) -> Vec<String> {
        artifacts_in(output).into_iter().map(|a| a.path).collect()
    }

    #[test]
    fn empty_input_uses_defaults() {
        let out = GeneratorRunner.invoke("devops-generator", &json!({})).unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["skill"], "devops-generator");
        let files = paths(&out);
        assert!(files.contains(&"Dockerfile".to_string()));
        assert!(files.contains(&"k8s/manifest.yaml".to_string()));

        let out = GeneratorRunner.invoke("project-planner", &Value::Null).unwrap();
        assert_eq!(paths(&out)[0], "WBS.md");
    }

    #[test]
    fn ui_expert_nests_prototype_and_design() {
        let out = GeneratorRunner.invoke("ui-expert", &json!({})).unwrap();
        let files = paths(&out);
        assert!(files.contains(&"prototype/index.html".to_string()));
        assert!(files.contains(&"design/DESIGN_SYSTEM.md".to_string()));
        assert!(files.contains(&"design/tokens.css".to_string()));
    }

    #[test]
    fn schema_input_is_deserialized() {
        let input = json!({"database": "mysql", "orm": "sequelize"});
        let out = GeneratorRunner.invoke("data-engineer", &input).unwrap();
        let files = paths(&out);
        assert_eq!(files[0], "schema.sql");
        assert!(files.contains(&"models/User.js".to_string()));
    }

    #[test]
    fn stub_fallback_for_plan_skills() {
        let out = GeneratorRunner.invoke("customer-representative", &json!({})).unwrap();
        assert_eq!(out["output"], "customer-representative的输出结果");
        assert!(artifacts_in(&out).is_empty());
    }

    #[test]
    fn engineering_skills_generate_code() {
        let out = GeneratorRunner.invoke("backend-engineer", &json!({})).unwrap();
        let files = paths(&out);
        assert!(files.contains(&"src/controllers/UserController.ts".to_string()));
        assert!(files.contains(&"src/api.ts".to_string()));

        let input = json!({"name": "order-table", "framework": "vue"});
        let out = GeneratorRunner.invoke("frontend-engineer", &input).unwrap();
        assert_eq!(paths(&out), ["components/OrderTable/OrderTable.vue"]);

        let input = json!({"feature": "checkout", "scenarios": ["pay"], "endpoints": []});
        let out = GeneratorRunner.invoke("tester", &input).unwrap();
        assert_eq!(paths(&out)[0], "TEST_PLAN.md");
        let mocks = artifacts_in(&out).into_iter().find(|a| a.path == "mocks.json").unwrap();
        assert!(mocks.content.contains("\"/api/checkout\""));
    }

    #[test]
    fn bad_engineering_input_is_recoverable() {
        let err = GeneratorRunner
            .invoke("frontend-engineer", &json!({"styling": "less"}))
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(INVALID_INPUT_CODE));
        let err = GeneratorRunner
            .invoke("tester", &json!({"scenarios": "pay"}))
            .unwrap_err();
        assert!(err.message.starts_with("invalid input for 'tester'"));
    }

    #[test]
    fn unknown_skill_is_recoverable() {
        let err = GeneratorRunner.invoke("astrologer", &json!({})).unwrap_err();
        assert_eq!(err.code.as_deref(), Some(UNKNOWN_SKILL_CODE));
        assert!(!err.is_fatal());
        assert_eq!(err.message, "unknown skill: astrologer");
    }

    #[test]
    fn bad_input_is_recoverable() {
        let err = GeneratorRunner
            .invoke("data-engineer", &json!({"database": "oracle"}))
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(INVALID_INPUT_CODE));
        assert!(!err.is_fatal());
        assert!(err.message.starts_with("invalid input for 'data-engineer'"));

        let err = GeneratorRunner
            .invoke("project-planner", &json!({"startDate": "soon"}))
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(INVALID_INPUT_CODE));
    }

    #[test]
    fn coordinator_with_generators_stores_artifacts() {
        let plan = Plan::new(vec![PhaseDefinition::new(
            "部署上线",
            vec![
                SkillTask::new("test-framework-builder").with_input(json!({"framework": "vitest"})),
                SkillTask::new("devops-generator"),
            ],
        )]);
        let mut c = ProjectCoordinator::with_runner(
            CoordinatorOptions::new(ProjectType::Web, plan),
            GeneratorRunner,
        );
        c.start_project(json!({})).unwrap();
        let files = paths(c.context("test-framework-builder").unwrap());
        assert_eq!(files[0], "vitest.config.ts");
        assert_eq!(c.state().completed_skills.len(), 2);
    }

    #[test]
    fn default_plan_skills_are_known() {
        assert!(is_known_skill("customer-representative"));
        assert!(is_known_skill("project-planner"));
        assert!(!is_known_skill(""));
    }
}
