//! Product documentation: introduction, user manual, README, API reference,
//! FAQ, changelog and release notes.

use crate::io::Artifact;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl ProductInfo {
    /// Lowercase with whitespace runs replaced by `-`.
    pub fn package_name(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }

    /// The name with all whitespace removed.
    pub fn class_name(&self) -> String {
        self.name.split_whitespace().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default)]
    pub responses: Vec<ApiResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseKind {
    Major,
    Minor,
    Patch,
}

impl ReleaseKind {
    fn emoji(self) -> &'static str {
        match self {
            ReleaseKind::Major => "🎉",
            ReleaseKind::Minor => "✨",
            ReleaseKind::Patch => "🐛",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Changes {
    pub added: Vec<String>,
    pub fixed: Vec<String>,
    pub changed: Vec<String>,
    pub deprecated: Vec<String>,
    pub removed: Vec<String>,
    pub security: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    #[serde(default)]
    pub changes: Changes,
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Product documents
// ---------------------------------------------------------------------------

pub fn product_introduction(product: &ProductInfo) -> String {
    let pkg = product.package_name();
    let class = product.class_name();
    let mut md = format!(
        "# {}\n\n**版本**: {}\n\n## 概述\n\n{}\n\n## 主要功能\n\n",
        product.name, product.version, product.description
    );
    bullets(&mut md, &product.features);

    if !product.screenshots.is_empty() {
        md.push_str("\n## 产品截图\n\n");
        for shot in &product.screenshots {
            md.push_str(&format!("![Screenshot]({shot})\n\n"));
        }
    }

    md.push_str(&format!(
        "## 快速开始\n\n### 安装\n\n```bash\nnpm install {pkg}\n```\n\n\
         ### 基本使用\n\n```typescript\nimport {{ {class} }} from '{pkg}';\n\n\
         const app = new {class}();\napp.start();\n```\n\n\
         ## 获取帮助\n\n\
         - 📖 官方文档: https://docs.example.com\n\
         - 💬 社区讨论: https://community.example.com\n\
         - 🐛 问题反馈: https://github.com/example/{pkg}/issues\n"
    ));
    md
}

const USER_MANUAL: &str = r#"# {name} 用户手册

**版本**: {version}

## 目录

1. [概述](#概述)
2. [安装指南](#安装指南)
3. [快速开始](#快速开始)
4. [功能说明](#功能说明)
5. [常见问题](#常见问题)
6. [故障排除](#故障排除)

## 概述

{description}

## 安装指南

### 系统要求

- Node.js >= 18.0.0
- npm >= 9.0.0
- 现代浏览器（Chrome、Firefox、Safari、Edge）

### 安装步骤

```bash
npm install {pkg}
# 或
yarn add {pkg}
```

## 快速开始

```typescript
import { {class} } from '{pkg}';

const app = new {class}({ apiKey: 'your-api-key', debug: false });
await app.initialize();
console.log(app.run());
```

## 功能说明

{features}
## 常见问题

### Q: 如何配置API密钥？

A: 在配置中设置 `apiKey` 参数。

### Q: 支持哪些浏览器？

A: 支持Chrome、Firefox、Safari和Edge的最新版本。

## 故障排除

### 安装失败

1. 检查Node.js版本是否满足要求
2. 清除npm缓存：`npm cache clean --force`
3. 重新安装

### 运行错误

1. 检查配置是否正确
2. 查看控制台错误信息
3. 确保所有依赖已正确安装

## 更多资源

- [API文档](./API.md)
- [更新日志](./CHANGELOG.md)
"#;

pub fn user_manual(product: &ProductInfo) -> String {
    let mut features = String::new();
    if product.features.is_empty() {
        features.push_str("功能描述\n");
    }
    for (i, feature) in product.features.iter().enumerate() {
        features.push_str(&format!("### 功能{}\n\n{feature}\n\n", i + 1));
    }

    USER_MANUAL
        .replace("{name}", &product.name)
        .replace("{version}", &product.version)
        .replace("{description}", &product.description)
        .replace("{pkg}", &product.package_name())
        .replace("{class}", &product.class_name())
        .replace("{features}", &features)
}

pub fn readme(product: &ProductInfo) -> String {
    let pkg = product.package_name();
    let class = product.class_name();
    let mut md = format!(
        "# {name}\n\n{desc}\n\n\
         [![NPM Version](https://img.shields.io/npm/v/{pkg}?style=flat-square)](https://www.npmjs.com/package/{pkg})\n\
         [![License](https://img.shields.io/npm/l/{pkg}?style=flat-square)](LICENSE)\n\n\
         ## 功能特性\n\n",
        name = product.name,
        desc = product.description,
    );
    bullets(&mut md, &product.features);
    md.push_str(&format!(
        "\n## 快速开始\n\n```bash\nnpm install {pkg}\n```\n\n\
         ```typescript\nimport {{ {class} }} from '{pkg}';\n\nconst app = new {class}();\napp.start();\n```\n\n\
         ## 文档\n\n\
         - [用户手册](./docs/USER_MANUAL.md)\n\
         - [API文档](./docs/API.md)\n\
         - [常见问题](./docs/FAQ.md)\n\n\
         ## 许可证\n\nMIT © {}\n",
        product.name
    ));
    md
}

// ---------------------------------------------------------------------------
// API reference
// ---------------------------------------------------------------------------

pub fn api_documentation(endpoints: &[ApiEndpoint]) -> String {
    let mut md = String::from(
        "# API 文档\n\n**Base URL**: `https://api.example.com/v1`\n\n## 认证\n\n\
         所有API请求都需要在Header中包含API密钥：\n\n```http\nAuthorization: Bearer YOUR_API_KEY\n```\n\n\
         ## 接口列表\n\n",
    );

    for ep in endpoints {
        md.push_str(&format!("### {} {}\n\n{}\n\n", ep.method.as_str(), ep.path, ep.description));

        if !ep.parameters.is_empty() {
            md.push_str("**参数**:\n");
            if ep.method == HttpMethod::Get {
                md.push_str("| 参数 | 类型 | 必填 | 说明 | 示例 |\n|------|------|------|------|------|\n");
                for p in &ep.parameters {
                    md.push_str(&format!(
                        "| {} | {} | {} | {} | {} |\n",
                        p.name,
                        p.param_type,
                        if p.required { "是" } else { "否" },
                        p.description,
                        p.example.as_ref().map(plain).unwrap_or_else(|| "-".into()),
                    ));
                }
            } else {
                md.push_str("```json\n{\n");
                for p in &ep.parameters {
                    let example = p
                        .example
                        .as_ref()
                        .map(Value::to_string)
                        .unwrap_or_else(|| "null".into());
                    md.push_str(&format!("  \"{}\": {example}, // {}\n", p.name, p.description));
                }
                md.push_str("}\n```\n");
            }
            md.push('\n');
        }

        if let Some(body) = &ep.request_body {
            md.push_str(&format!("**请求体**:\n\n```json\n{}\n```\n\n", pretty(body)));
        }

        md.push_str("**响应**:\n\n");
        for resp in &ep.responses {
            md.push_str(&format!("```http\n{} {}\n```\n\n", resp.status_code, resp.description));
            if let Some(body) = &resp.body {
                md.push_str(&format!("```json\n{}\n```\n\n", pretty(body)));
            }
        }
        md.push_str("---\n\n");
    }

    let sdk = endpoints
        .first()
        .and_then(|e| e.name.as_deref())
        .unwrap_or("sdk");
    md.push_str(&format!(
        "## 错误码\n\n| 错误码 | 说明 |\n|--------|------|\n\
         | 400 | 请求参数错误 |\n| 401 | 未授权 |\n| 403 | 无权限 |\n| 404 | 资源不存在 |\n| 500 | 服务器错误 |\n\n\
         ## 速率限制\n\nAPI调用频率限制为：100次/分钟，超出限制将返回429状态码。\n\n\
         ## SDK支持\n\n\
         - [JavaScript](https://github.com/example/{sdk}-js)\n\
         - [Python](https://github.com/example/{sdk}-py)\n\
         - [Go](https://github.com/example/{sdk}-go)\n"
    ));
    md
}

// ---------------------------------------------------------------------------
// FAQ / changelog / release notes / user guide
// ---------------------------------------------------------------------------

/// Questions grouped by category, categories in first-seen order.
pub fn faq(faqs: &[Faq]) -> String {
    let mut categories: Vec<&str> = Vec::new();
    for f in faqs {
        if !categories.contains(&f.category.as_str()) {
            categories.push(&f.category);
        }
    }

    let mut md = String::from("# 常见问题 (FAQ)\n\n## 目录\n\n");
    for cat in &categories {
        let anchor = cat.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
        md.push_str(&format!("- [{cat}](#{anchor})\n"));
    }
    md.push('\n');

    for cat in &categories {
        md.push_str(&format!("## {cat}\n\n"));
        for f in faqs.iter().filter(|f| f.category == *cat) {
            md.push_str(&format!("### {}\n\n{}\n\n", f.question, f.answer));
        }
    }

    md.push_str(
        "## 联系支持\n\n如果您的问题不在FAQ中，请联系我们的支持团队：\n\n\
         - 📧 Email: support@example.com\n\
         - 💬 在线客服: https://chat.example.com\n",
    );
    md
}

pub fn changelog(releases: &[Release]) -> String {
    let mut md = String::from("# 更新日志\n\n本文档记录了项目的所有重要更改。\n\n");
    for r in releases {
        md.push_str(&format!("## [{}] - {} {}\n\n", r.version, r.date, r.kind.emoji()));
        let c = &r.changes;
        for (title, items) in [
            ("新增", &c.added),
            ("修复", &c.fixed),
            ("变更", &c.changed),
            ("弃用", &c.deprecated),
            ("移除", &c.removed),
            ("安全", &c.security),
        ] {
            if items.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n"));
            bullets(&mut md, items);
            md.push('\n');
        }
    }
    md
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseNote {
    pub version: String,
    pub release_date: String,
    pub new_features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub breaking_changes: Vec<String>,
}

pub fn release_notes(note: &ReleaseNote) -> String {
    let mut md = format!("# 发布说明\n\n## {} ({})\n\n", note.version, note.release_date);
    for (title, items) in [
        ("新功能", &note.new_features),
        ("Bug 修复", &note.bug_fixes),
        ("破坏性变更", &note.breaking_changes),
    ] {
        if items.is_empty() {
            continue;
        }
        md.push_str(&format!("### {title}\n\n"));
        bullets(&mut md, items);
        md.push('\n');
    }
    md
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserGuide {
    pub product_name: String,
    pub version: String,
    pub features: Vec<String>,
    pub target_users: Vec<String>,
}

pub fn user_guide(guide: &UserGuide) -> String {
    let mut md = format!(
        "# {name} 用户指南\n\n**版本**: {}\n\n## 简介\n\n欢迎使用 {name}！\n\n\
         ## 快速开始\n\n### 安装\n\n```bash\nnpm install {}\n```\n\n\
         ### 使用\n\n1. 配置环境变量\n2. 启动应用\n3. 访问应用\n\n## 功能特性\n\n",
        guide.version,
        guide.product_name.to_lowercase(),
        name = guide.product_name,
    );
    bullets(&mut md, &guide.features);
    md.push_str("\n## 目标用户\n\n");
    bullets(&mut md, &guide.target_users);
    md.push_str(
        "\n## 常见问题\n\n### 如何重置密码？\n\n点击\"忘记密码\"链接，按照提示操作即可。\n\n\
         ### 如何联系客服？\n\n发送邮件至 support@example.com\n",
    );
    md
}

// ---------------------------------------------------------------------------
// format_markdown
// ---------------------------------------------------------------------------

static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();
static HEADING_RE: OnceLock<Regex> = OnceLock::new();

/// Collapse runs of blank lines, put a blank line before every heading,
/// trim, and optionally wrap the result in a fenced code block.
pub fn format_markdown(text: &str, language: Option<&str>) -> String {
    let blank = BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    let heading = HEADING_RE.get_or_init(|| Regex::new(r"([^\n])\n(#+)").unwrap());

    let collapsed = blank.replace_all(text, "\n\n");
    let spaced = heading.replace_all(&collapsed, "$1\n\n$2");
    let trimmed = spaced.trim();

    match language {
        Some(lang) => format!("```{lang}\n{trimmed}\n```"),
        None => trimmed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Skill input
// ---------------------------------------------------------------------------

/// Input accepted by the `product-documentation-expert` skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsRequest {
    pub product: ProductInfo,
    pub endpoints: Vec<ApiEndpoint>,
    pub faqs: Vec<Faq>,
    pub releases: Vec<Release>,
}

impl Default for DocsRequest {
    fn default() -> Self {
        Self {
            product: ProductInfo {
                name: "Example App".into(),
                version: "1.0.0".into(),
                description: "一个功能强大的示例应用程序".into(),
                features: vec![
                    "快速的数据处理".into(),
                    "灵活的配置选项".into(),
                    "丰富的插件系统".into(),
                ],
                screenshots: Vec::new(),
            },
            endpoints: Vec::new(),
            faqs: Vec::new(),
            releases: Vec::new(),
        }
    }
}

/// README, introduction and manual always; API, FAQ and changelog only when
/// their inputs are non-empty.
pub fn all_documents(req: &DocsRequest) -> Vec<Artifact> {
    let mut docs = vec![
        Artifact::new("README.md", readme(&req.product)),
        Artifact::new("PRODUCT_INTRODUCTION.md", product_introduction(&req.product)),
        Artifact::new("USER_MANUAL.md", user_manual(&req.product)),
    ];
    if !req.endpoints.is_empty() {
        docs.push(Artifact::new("API.md", api_documentation(&req.endpoints)));
    }
    if !req.faqs.is_empty() {
        docs.push(Artifact::new("FAQ.md", faq(&req.faqs)));
    }
    if !req.releases.is_empty() {
        docs.push(Artifact::new("CHANGELOG.md", changelog(&req.releases)));
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> ProductInfo {
        ProductInfo {
            name: "Super  Task App".into(),
            version: "2.1.0".into(),
            description: "任务管理".into(),
            features: vec!["看板".into(), "提醒".into()],
            screenshots: vec!["shot.png".into()],
        }
    }

    #[test]
    fn package_and_class_names() {
        let p = product();
        assert_eq!(p.package_name(), "super-task-app");
        assert_eq!(p.class_name(), "SuperTaskApp");
    }

    #[test]
    fn introduction_lists_features_and_screenshots() {
        let md = product_introduction(&product());
        assert!(md.starts_with("# Super  Task App\n\n**版本**: 2.1.0"));
        assert!(md.contains("- 看板\n- 提醒\n"));
        assert!(md.contains("![Screenshot](shot.png)"));
        assert!(md.contains("import { SuperTaskApp } from 'super-task-app';"));
        assert!(md.contains("github.com/example/super-task-app/issues"));
    }

    #[test]
    fn manual_numbers_features() {
        let md = user_manual(&product());
        assert!(md.contains("### 功能1\n\n看板"));
        assert!(md.contains("### 功能2\n\n提醒"));
        assert!(md.contains("yarn add super-task-app"));
        assert!(!md.contains("{pkg}"));
    }

    #[test]
    fn readme_badges_use_package_name() {
        let md = readme(&product());
        assert!(md.contains("img.shields.io/npm/v/super-task-app"));
        assert!(md.ends_with("MIT © Super  Task App\n"));
    }

    #[test]
    fn api_docs_render_get_table_and_post_body() {
        let endpoints: Vec<ApiEndpoint> = serde_json::from_value(json!([
            {
                "name": "users",
                "method": "GET",
                "path": "/users",
                "description": "获取用户列表",
                "parameters": [{"name": "page", "type": "number", "description": "页码", "example": 1}],
                "responses": [{"statusCode": 200, "description": "成功", "body": {"total": 100}}]
            },
            {
                "method": "POST",
                "path": "/users",
                "description": "创建用户",
                "parameters": [{"name": "email", "type": "string", "required": true, "description": "邮箱"}],
                "requestBody": {"name": "John"},
                "responses": [{"statusCode": 201, "description": "创建成功"}]
            }
        ]))
        .unwrap();
        let md = api_documentation(&endpoints);
        assert!(md.contains("### GET /users\n\n获取用户列表"));
        assert!(md.contains("| page | number | 否 | 页码 | 1 |"));
        assert!(md.contains("  \"email\": null, // 邮箱"));
        assert!(md.contains("**请求体**:\n\n```json\n{\n  \"name\": \"John\"\n}\n```"));
        assert!(md.contains("```http\n201 创建成功\n```"));
        assert!(md.contains("github.com/example/users-js"));
    }

    #[test]
    fn faq_groups_by_first_seen_category() {
        let faqs = vec![
            Faq { question: "Q1".into(), answer: "A1".into(), category: "Getting Started".into() },
            Faq { question: "Q2".into(), answer: "A2".into(), category: "Billing".into() },
            Faq { question: "Q3".into(), answer: "A3".into(), category: "Getting Started".into() },
        ];
        let md = faq(&faqs);
        assert!(md.contains("- [Getting Started](#getting-started)\n- [Billing](#billing)"));
        let gs = md.find("## Getting Started").unwrap();
        let billing = md.find("## Billing").unwrap();
        let q3 = md.find("### Q3").unwrap();
        assert!(gs < q3 && q3 < billing);
    }

    #[test]
    fn changelog_skips_empty_sections() {
        let releases = vec![Release {
            version: "1.0.0".into(),
            date: "2024-01-15".into(),
            kind: ReleaseKind::Major,
            changes: Changes {
                added: vec!["初始版本发布".into()],
                ..Default::default()
            },
        }];
        let md = changelog(&releases);
        assert!(md.contains("## [1.0.0] - 2024-01-15 🎉\n\n### 新增\n- 初始版本发布\n"));
        assert!(!md.contains("### 修复"));
    }

    #[test]
    fn release_notes_sections() {
        let md = release_notes(&ReleaseNote {
            version: "1.2.0".into(),
            release_date: "2024-03-01".into(),
            new_features: vec!["暗色模式".into()],
            bug_fixes: vec![],
            breaking_changes: vec!["移除旧接口".into()],
        });
        assert!(md.starts_with("# 发布说明\n\n## 1.2.0 (2024-03-01)\n\n### 新功能\n\n- 暗色模式\n"));
        assert!(!md.contains("Bug 修复"));
        assert!(md.contains("### 破坏性变更\n\n- 移除旧接口\n"));
    }

    #[test]
    fn user_guide_lists_users() {
        let md = user_guide(&UserGuide {
            product_name: "Notes".into(),
            version: "1.0".into(),
            features: vec!["同步".into()],
            target_users: vec!["学生".into()],
        });
        assert!(md.contains("npm install notes"));
        assert!(md.contains("## 目标用户\n\n- 学生\n"));
    }

    #[test]
    fn format_markdown_normalizes_spacing() {
        let out = format_markdown("  intro\n\n\n\nmore\n## Heading\ntext  ", None);
        assert_eq!(out, "intro\n\nmore\n\n## Heading\ntext");
        let fenced = format_markdown("# T", Some("md"));
        assert_eq!(fenced, "```md\n# T\n```");
    }

    #[test]
    fn all_documents_includes_optional_files() {
        let mut req = DocsRequest::default();
        let names: Vec<String> = all_documents(&req).into_iter().map(|a| a.path).collect();
        assert_eq!(names, ["README.md", "PRODUCT_INTRODUCTION.md", "USER_MANUAL.md"]);

        req.faqs.push(Faq {
            question: "q".into(),
            answer: "a".into(),
            category: "c".into(),
        });
        assert!(all_documents(&req).iter().any(|a| a.path == "FAQ.md"));
    }
}
