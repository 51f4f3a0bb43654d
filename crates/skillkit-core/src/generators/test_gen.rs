//! Test design from a feature and its scenarios: test cases, test data sets,
//! API mocks and a Markdown test plan.

use crate::error::Result;
use crate::io::Artifact;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePriority {
    High,
    Medium,
    Low,
}

impl CasePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            CasePriority::High => "high",
            CasePriority::Medium => "medium",
            CasePriority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseKind {
    Normal,
    Error,
    Boundary,
}

impl CaseKind {
    const ALL: [CaseKind; 3] = [CaseKind::Normal, CaseKind::Error, CaseKind::Boundary];

    fn tag(self) -> &'static str {
        match self {
            CaseKind::Normal => "normal",
            CaseKind::Error => "error",
            CaseKind::Boundary => "boundary",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CaseKind::Normal => "正常场景",
            CaseKind::Error => "异常场景",
            CaseKind::Boundary => "边界场景",
        }
    }

    fn priority(self) -> CasePriority {
        match self {
            CaseKind::Normal => CasePriority::High,
            CaseKind::Error | CaseKind::Boundary => CasePriority::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub priority: CasePriority,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub username: String,
    pub password: String,
    pub name: String,
    pub age: i32,
    pub status: String,
}

impl AccountData {
    fn new(username: &str, password: &str, name: &str, age: i32, status: &str) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name: name.into(),
            age,
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    pub scenario: String,
    pub data: AccountData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockConfig {
    pub endpoint: String,
    pub method: String,
    pub response: Value,
    pub status_code: u16,
}

// ---------------------------------------------------------------------------
// Test cases
// ---------------------------------------------------------------------------

fn steps(kind: CaseKind, feature: &str, scenario: &str) -> Vec<String> {
    let mut steps = vec![format!("打开{feature}页面"), format!("执行{scenario}操作")];
    match kind {
        CaseKind::Normal => steps.extend([
            "输入有效的测试数据".to_string(),
            "提交操作".to_string(),
            "验证操作结果是否符合预期".to_string(),
        ]),
        CaseKind::Error => steps.extend([
            "输入无效或异常的测试数据".to_string(),
            "提交操作".to_string(),
            "验证系统是否正确处理异常情况".to_string(),
        ]),
        CaseKind::Boundary => steps.extend([
            "输入边界值测试数据（最小值）".to_string(),
            "提交操作".to_string(),
            "验证边界值处理是否正确".to_string(),
            "输入边界值测试数据（最大值）".to_string(),
            "提交操作".to_string(),
            "验证边界值处理是否正确".to_string(),
        ]),
    }
    steps
}

/// A normal, an error and a boundary case per scenario, numbered `TC001`
/// onwards in that order.
pub fn test_cases(feature: &str, scenarios: &[String]) -> Vec<TestCase> {
    scenarios
        .iter()
        .flat_map(|s| CaseKind::ALL.into_iter().map(move |k| (s, k)))
        .enumerate()
        .map(|(i, (scenario, kind))| TestCase {
            id: format!("TC{:03}", i + 1),
            title: format!("{feature} - {scenario} - {}", kind.label()),
            description: match kind {
                CaseKind::Normal => format!("测试{feature}在{scenario}情况下的正常流程"),
                CaseKind::Error => format!("测试{feature}在{scenario}情况下的异常处理"),
                CaseKind::Boundary => format!("测试{feature}在{scenario}情况下的边界值处理"),
            },
            steps: steps(kind, feature, scenario),
            expected_result: match kind {
                CaseKind::Normal => "功能正常执行，预期结果符合需求",
                CaseKind::Error => "系统返回正确的错误提示，不会崩溃",
                CaseKind::Boundary => "边界值被正确接受或拒绝",
            }
            .to_string(),
            priority: kind.priority(),
            tags: vec![kind.tag().to_string(), scenario.clone()],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Test data / mocks
// ---------------------------------------------------------------------------

/// Valid, invalid and boundary account data per scenario.
pub fn test_data(scenarios: &[String]) -> Vec<TestData> {
    let mut sets = Vec::with_capacity(scenarios.len() * 3);
    for scenario in scenarios {
        sets.push(TestData {
            scenario: format!("{scenario} - 有效数据"),
            data: AccountData::new("testuser@example.com", "ValidPass123!", "Test User", 25, "active"),
        });
        sets.push(TestData {
            scenario: format!("{scenario} - 无效数据"),
            data: AccountData::new("", "123", "", -1, "invalid"),
        });
        sets.push(TestData {
            scenario: format!("{scenario} - 边界数据"),
            data: AccountData::new("a@b.co", "Valid123!", "A", 0, "active"),
        });
    }
    sets
}

fn mock_payload(endpoint: &str, now: DateTime<Utc>) -> Value {
    if endpoint.contains("user") {
        json!({
            "id": 1,
            "name": "Test User",
            "email": "test@example.com",
            "createdAt": now.to_rfc3339_opts(SecondsFormat::Millis, true)
        })
    } else if endpoint.contains("product") {
        json!({"id": 1, "name": "Test Product", "price": 99.99, "stock": 100})
    } else {
        json!({})
    }
}

/// A 200 and a 404 `GET` mock per endpoint.
pub fn mock_configs(endpoints: &[String], now: DateTime<Utc>) -> Vec<MockConfig> {
    let mut mocks = Vec::with_capacity(endpoints.len() * 2);
    for endpoint in endpoints {
        mocks.push(MockConfig {
            endpoint: endpoint.clone(),
            method: "GET".into(),
            response: json!({"success": true, "data": mock_payload(endpoint, now)}),
            status_code: 200,
        });
        mocks.push(MockConfig {
            endpoint: endpoint.clone(),
            method: "GET".into(),
            response: json!({"success": false, "error": "Resource not found", "code": 404}),
            status_code: 404,
        });
    }
    mocks
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Input accepted by the `tester` skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestGenRequest {
    pub feature: String,
    pub scenarios: Vec<String>,
    /// Endpoints to mock; `/api/<feature>` when empty.
    pub endpoints: Vec<String>,
}

impl Default for TestGenRequest {
    fn default() -> Self {
        Self {
            feature: "用户登录".into(),
            scenarios: vec!["正常登录".into(), "密码错误".into(), "账号不存在".into()],
            endpoints: vec!["/api/login".into()],
        }
    }
}

impl TestGenRequest {
    pub fn endpoints_or_feature(&self) -> Vec<String> {
        if self.endpoints.is_empty() {
            vec![format!("/api/{}", self.feature)]
        } else {
            self.endpoints.clone()
        }
    }
}

fn json_block(value: &impl Serialize) -> Result<String> {
    Ok(format!("```json\n{}\n```\n\n", serde_json::to_string_pretty(value)?))
}

pub fn test_plan(
    feature: &str,
    cases: &[TestCase],
    data: &[TestData],
    mocks: &[MockConfig],
    scenario_count: usize,
) -> Result<String> {
    let mut plan = format!(
        "# {feature} 测试计划\n\n## 测试范围\n- 功能名称：{feature}\n- 测试场景数：{scenario_count}个\n- 测试用例数：{}个\n\n## 测试用例\n\n",
        cases.len()
    );
    for tc in cases {
        plan.push_str(&format!("### {}: {}\n", tc.id, tc.title));
        plan.push_str(&format!("**描述**：{}\n\n**步骤**：\n", tc.description));
        for (i, step) in tc.steps.iter().enumerate() {
            plan.push_str(&format!("{}. {step}\n", i + 1));
        }
        plan.push_str(&format!("\n**预期结果**：{}\n", tc.expected_result));
        plan.push_str(&format!("**优先级**：{}\n", tc.priority.as_str()));
        plan.push_str(&format!("**标签**：{}\n\n", tc.tags.join(", ")));
    }

    plan.push_str("## 测试数据\n\n");
    for (i, td) in data.iter().enumerate() {
        plan.push_str(&format!("### 测试数据集 {}\n**场景**：{}\n", i + 1, td.scenario));
        plan.push_str(&json_block(&td.data)?);
    }

    plan.push_str("## Mock配置\n\n");
    for (i, m) in mocks.iter().enumerate() {
        plan.push_str(&format!(
            "### Mock配置 {}\n**端点**：{}\n**方法**：{}\n**状态码**：{}\n",
            i + 1,
            m.endpoint,
            m.method,
            m.status_code
        ));
        plan.push_str(&json_block(&m.response)?);
    }
    Ok(plan)
}

pub fn test_gen_bundle(req: &TestGenRequest, now: DateTime<Utc>) -> Result<Vec<Artifact>> {
    let cases = test_cases(&req.feature, &req.scenarios);
    let data = test_data(&req.scenarios);
    let mocks = mock_configs(&req.endpoints_or_feature(), now);
    Ok(vec![
        Artifact::new(
            "TEST_PLAN.md",
            test_plan(&req.feature, &cases, &data, &mocks, req.scenarios.len())?,
        ),
        Artifact::new("test-cases.json", serde_json::to_string_pretty(&cases)?),
        Artifact::new("test-data.json", serde_json::to_string_pretty(&data)?),
        Artifact::new("mocks.json", serde_json::to_string_pretty(&mocks)?),
    ])
}
