#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillkit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("skillkit").unwrap();
    cmd.current_dir(dir.path())
        .env("SKILLKIT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

// ---------------------------------------------------------------------------
// skillkit init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["init", "--type", "backend", "--generators"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created: skillkit.yaml"));

    let text = std::fs::read_to_string(dir.path().join("skillkit.yaml")).unwrap();
    assert!(text.contains("project_type: backend"));
    assert!(text.contains("runner: generators"));

    skillkit(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  skillkit.yaml"));
    let again = std::fs::read_to_string(dir.path().join("skillkit.yaml")).unwrap();
    assert_eq!(text, again);
}

#[test]
fn init_rejects_unknown_project_type() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["init", "--type", "embedded"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid project type: embedded"));
    assert!(!dir.path().join("skillkit.yaml").exists());
}

// ---------------------------------------------------------------------------
// skillkit plan
// ---------------------------------------------------------------------------

#[test]
fn plan_lists_default_phases() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("customer-representative"))
        .stdout(predicate::str::contains("phase:需求分析"))
        .stdout(predicate::str::contains("部署上线"));
}

#[test]
fn plan_json_uses_configured_phases() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("skillkit.yaml"),
        "phases:\n  - name: build\n    skills:\n      - name: compile\n",
    )
    .unwrap();
    let plan = stdout_json(skillkit(&dir).args(["plan", "--json"]));
    assert_eq!(plan["phases"][0]["name"], "build");
    assert_eq!(plan["phases"][0]["skills"][0]["name"], "compile");
    assert_eq!(plan["phases"].as_array().unwrap().len(), 1);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("skillkit.yaml"), "runner: [stub\n").unwrap();
    skillkit(&dir).arg("plan").assert().failure().stderr(predicate::str::starts_with("error:"));
}

// ---------------------------------------------------------------------------
// skillkit run
// ---------------------------------------------------------------------------

#[test]
fn run_default_plan_reports_completion() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("进度: 100.0%"))
        .stdout(predicate::str::contains("项目类型: web"))
        .stdout(predicate::str::contains("  ✅ 部署上线"));
}

#[test]
fn run_json_returns_state() {
    let dir = TempDir::new().unwrap();
    let state = stdout_json(
        skillkit(&dir).args(["run", "--json", "--requirements", r#"{"name":"shop"}"#]),
    );
    assert_eq!(state["status"], "completed");
    assert_eq!(state["completed_phases"].as_array().unwrap().len(), 6);
    assert_eq!(state["context"]["requirements"]["name"], "shop");
    assert_eq!(state["context"]["tester"]["output"], "tester的输出结果");
}

#[test]
fn run_aborts_on_missing_dependency() {
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("plan.yaml");
    std::fs::write(
        &plan,
        "phases:\n  - name: A\n    skills:\n      - name: s1\n        dependencies:\n          - phase: missing\n",
    )
    .unwrap();
    skillkit(&dir)
        .args(["run", "--plan"])
        .arg(&plan)
        .assert()
        .failure()
        .stdout(predicate::str::contains("错误数: 1"))
        .stderr(predicate::str::contains(
            "error: project run aborted: 依赖未完成: missing",
        ));
}

#[test]
fn run_rejects_bad_requirements() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["run", "--requirements", "not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--requirements is not valid JSON"));
}

#[test]
fn run_with_generators_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["run", "--generators", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote: generated"));

    let out = dir.path().join("generated");
    assert!(out.join("devops-generator/Dockerfile").exists());
    assert!(out.join("devops-generator/.github/workflows/ci.yml").exists());
    assert!(out.join("ui-expert/prototype/index.html").exists());
    assert!(out.join("ui-expert/design/tokens.css").exists());
    assert!(out.join("test-framework-builder/jest.config.js").exists());
    assert!(out.join("backend-engineer/src/routes/UserRoutes.ts").exists());
    assert!(out.join("frontend-engineer/components/UserCard/UserCard.tsx").exists());
    assert!(out.join("tester/TEST_PLAN.md").exists());
    // Stubbed skills produce no files.
    assert!(!out.join("customer-representative").exists());
}

// ---------------------------------------------------------------------------
// skillkit generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_with_banners() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["generate", "ci", "--provider", "gitlab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> .gitlab-ci.yml <=="))
        .stdout(predicate::str::contains("stages:\n  - build\n"));
}

#[test]
fn generate_reads_input_and_writes_out() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("k8s.yaml"), "appName: shop\nimage: shop:1.2\n").unwrap();
    skillkit(&dir)
        .args(["generate", "k8s", "--input", "k8s.yaml", "--out", "deploy", "--replicas", "5"])
        .assert()
        .success();
    let manifest =
        std::fs::read_to_string(dir.path().join("deploy/k8s/manifest.yaml")).unwrap();
    assert!(manifest.contains("image: shop:1.2"));
    assert!(manifest.contains("replicas: 5"));
}

#[test]
fn generate_json_lists_artifacts() {
    let dir = TempDir::new().unwrap();
    let files = stdout_json(skillkit(&dir).args([
        "generate",
        "test-config",
        "--framework",
        "vitest",
        "--cypress",
        "--json",
    ]));
    let paths: Vec<&str> = files
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths[0], "vitest.config.ts");
    assert!(paths.contains(&"cypress.config.ts"));
}

#[test]
fn generate_tokens_in_requested_formats() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["generate", "tokens", "--format", "ts", "--format", "sass", "--out", "tokens"])
        .assert()
        .success();
    assert!(dir.path().join("tokens/tokens.ts").exists());
    assert!(dir.path().join("tokens/_tokens.scss").exists());
    assert!(dir.path().join("tokens/DESIGN_SYSTEM.md").exists());
    assert!(!dir.path().join("tokens/tokens.css").exists());
}

#[test]
fn generate_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["generate", "wbs", "--start", "next monday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date 'next monday'"));
    skillkit(&dir)
        .args(["generate", "schema", "--database", "oracle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown database 'oracle'"));
    skillkit(&dir)
        .args(["generate", "tokens", "--brand-color", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid color 'blue'"));
}

#[test]
fn generate_wbs_uses_start_date() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["generate", "wbs", "--name", "官网改版", "--start", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> GANTT.md <=="))
        .stdout(predicate::str::contains("title 官网改版"))
        .stdout(predicate::str::contains("2025-03-03"));
}

#[test]
fn generate_component_and_tests() {
    let dir = TempDir::new().unwrap();
    skillkit(&dir)
        .args(["generate", "component", "--name", "order-table", "--framework", "vue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> components/OrderTable/OrderTable.vue <=="))
        .stdout(predicate::str::contains("<div class=\"order-table\">"));
    skillkit(&dir)
        .args(["generate", "component", "--styling", "less"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown styling 'less'"));
    skillkit(&dir)
        .args(["generate", "tests", "--feature", "checkout", "--scenario", "pay", "--out", "qa"])
        .assert()
        .success();
    let plan = std::fs::read_to_string(dir.path().join("qa/TEST_PLAN.md")).unwrap();
    assert!(plan.contains("### TC003: checkout - pay - 边界场景"));
}

#[test]
fn generate_api_from_models_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("models.yaml"),
        "models:\n  - name: Product\n    tableName: products\n    fields:\n      - name: id\n        type: number\n",
    )
    .unwrap();
    skillkit(&dir)
        .args(["generate", "api", "--input", "models.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> src/controllers/ProductController.ts <=="))
        .stdout(predicate::str::contains("router.use('/products', createProductRoutes("));
}
