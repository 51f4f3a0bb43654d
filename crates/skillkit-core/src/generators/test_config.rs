//! JavaScript test-framework scaffolding: runner configs, lint rules, setup
//! files, npm scripts, Cypress config and a setup guide.

use crate::error::{Result, SkillkitError};
use crate::io::Artifact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Framework / config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Jest,
    Vitest,
    Mocha,
    Jasmine,
}

impl Framework {
    pub fn all() -> &'static [Framework] {
        &[
            Framework::Jest,
            Framework::Vitest,
            Framework::Mocha,
            Framework::Jasmine,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Framework::Jest => "jest",
            Framework::Vitest => "vitest",
            Framework::Mocha => "mocha",
            Framework::Jasmine => "jasmine",
        }
    }

    pub fn config_file_name(self) -> &'static str {
        match self {
            Framework::Jest => "jest.config.js",
            Framework::Vitest => "vitest.config.ts",
            Framework::Mocha => ".mocharc.js",
            Framework::Jasmine => "jasmine.config.js",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = SkillkitError;

    fn from_str(s: &str) -> Result<Self> {
        Framework::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SkillkitError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestEnvironment {
    Node,
    #[default]
    Jsdom,
    HappyDom,
}

impl TestEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            TestEnvironment::Node => "node",
            TestEnvironment::Jsdom => "jsdom",
            TestEnvironment::HappyDom => "happy-dom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    pub framework: Framework,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_true")]
    pub coverage: bool,
    #[serde(default = "default_threshold")]
    pub coverage_threshold: u8,
    #[serde(default = "default_test_match")]
    pub test_match: Vec<String>,
    #[serde(default = "default_setup_files")]
    pub setup_files: Vec<String>,
    #[serde(default)]
    pub environment: TestEnvironment,
    #[serde(default = "default_reporters")]
    pub reporters: Vec<String>,
}

fn default_version() -> String {
    "latest".into()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> u8 {
    80
}

fn default_test_match() -> Vec<String> {
    vec![
        "**/__tests__/**/*.{js,jsx,ts,tsx}".into(),
        "**/*.{test,spec}.{js,jsx,ts,tsx}".into(),
    ]
}

fn default_setup_files() -> Vec<String> {
    vec!["<rootDir>/src/setupTests.ts".into()]
}

fn default_reporters() -> Vec<String> {
    vec!["default".into(), "jest-junit".into()]
}

impl TestConfig {
    pub fn default_for(framework: Framework) -> Self {
        Self {
            framework,
            version: default_version(),
            coverage: true,
            coverage_threshold: default_threshold(),
            test_match: default_test_match(),
            setup_files: default_setup_files(),
            environment: TestEnvironment::default(),
            reporters: default_reporters(),
        }
    }

    /// Project-relative path of the first setup file.
    pub fn setup_file_path(&self) -> String {
        self.setup_files
            .first()
            .map(|f| f.trim_start_matches("<rootDir>/").to_string())
            .unwrap_or_else(|| "src/setupTests.ts".into())
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::default_for(Framework::Jest)
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("'{i}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".into())
}

// ---------------------------------------------------------------------------
// Runner configs
// ---------------------------------------------------------------------------

const JEST_CONFIG: &str = r#"module.exports = {
  preset: 'ts-jest',
  testEnvironment: '{environment}',
  roots: ['<rootDir>/src'],
  testMatch: [{test_match}],
  collectCoverageFrom: [
    'src/**/*.{js,jsx,ts,tsx}',
    '!src/**/*.d.ts',
    '!src/**/*.stories.{js,jsx,ts,tsx}',
    '!src/**/__tests__/**'
  ],
  coverageThreshold: {
    global: {
      branches: {threshold},
      functions: {threshold},
      lines: {threshold},
      statements: {threshold}
    }
  },
{setup}  moduleNameMapper: {
    '^@/(.*)$': '<rootDir>/src/$1',
    '\\.(css|less|scss|sass)$': 'identity-obj-proxy'
  },
  transform: {
    '^.+\\.(ts|tsx)$': 'ts-jest',
    '^.+\\.(js|jsx)$': 'babel-jest'
  },
  collectCoverage: {coverage},
  verbose: true
};
"#;

const VITEST_CONFIG: &str = r#"import { defineConfig } from 'vitest/config';
import tsconfigPaths from 'vite-tsconfig-paths';

export default defineConfig({
  plugins: [tsconfigPaths()],
  test: {
    environment: '{environment}',
    globals: true,
    setupFiles: {setup_files},
    coverage: {
      enabled: {coverage},
      provider: 'v8',
      reporter: ['text', 'json', 'html'],
      exclude: [
        'node_modules/',
        'src/**/*.d.ts',
        'src/**/*.stories.{js,jsx,ts,tsx}',
        'src/**/__tests__/**'
      ],
      all: true,
      lines: {threshold},
      functions: {threshold},
      branches: {threshold},
      statements: {threshold}
    },
    include: {test_match},
    alias: {
      '@': './src'
    }
  }
});
"#;

const MOCHA_CONFIG: &str = r#"module.exports = {
  require: [{setup}],
  spec: {test_match},
  timeout: 10000,
  reporter: {reporters},
  coverage: {coverage},
  coverageProvider: 'v8',
  reporterOptions: {
    html: {
      outputDir: './coverage/html'
    },
    json: {
      outputDir: './coverage/json'
    }
  },
  coverageThreshold: {
    global: {
      lines: {threshold},
      functions: {threshold},
      branches: {threshold},
      statements: {threshold}
    }
  }
};
"#;

const JASMINE_CONFIG: &str = r#"module.exports = {
  spec_dir: 'src',
  spec_files: {test_match},
  helpers: {setup_files},
  stopSpecOnExpectationFailure: false,
  random: true
};
"#;

pub fn runner_config(config: &TestConfig) -> String {
    let threshold = config.coverage_threshold.to_string();
    let coverage = config.coverage.to_string();
    let template = match config.framework {
        Framework::Jest => {
            let setup = if config.setup_files.is_empty() {
                String::new()
            } else {
                format!("  setupFilesAfterEnv: [{}],\n", quoted_list(&config.setup_files))
            };
            return JEST_CONFIG
                .replace("{environment}", config.environment.as_str())
                .replace("{test_match}", &quoted_list(&config.test_match))
                .replace("{threshold}", &threshold)
                .replace("{setup}", &setup)
                .replace("{coverage}", &coverage);
        }
        Framework::Vitest => VITEST_CONFIG,
        Framework::Mocha => MOCHA_CONFIG,
        Framework::Jasmine => JASMINE_CONFIG,
    };
    template
        .replace("{environment}", config.environment.as_str())
        .replace("{setup_files}", &json_list(&config.setup_files))
        .replace("{setup}", &quoted_list(&config.setup_files))
        .replace("{test_match}", &json_list(&config.test_match))
        .replace("{reporters}", &json_list(&config.reporters))
        .replace("{threshold}", &threshold)
        .replace("{coverage}", &coverage)
}

// ---------------------------------------------------------------------------
// ESLint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EslintTestConfig {
    pub env: Vec<String>,
    pub extends: Vec<String>,
    pub plugins: Vec<String>,
    /// Rule name and its JS value, e.g. `'warn'`.
    pub rules: Vec<(String, String)>,
}

impl Default for EslintTestConfig {
    fn default() -> Self {
        let rule = |name: &str, level: &str| (name.to_string(), format!("'{level}'"));
        Self {
            env: vec!["jest".into(), "node".into()],
            extends: vec![
                "eslint:recommended".into(),
                "plugin:jest/recommended".into(),
                "plugin:jest/style".into(),
            ],
            plugins: vec!["jest".into()],
            rules: vec![
                rule("jest/no-disabled-tests", "warn"),
                rule("jest/no-focused-tests", "error"),
                rule("jest/no-identical-title", "error"),
                rule("jest/prefer-to-have-length", "warn"),
                rule("jest/valid-expect", "error"),
            ],
        }
    }
}

pub fn eslint_config(config: &EslintTestConfig) -> String {
    let mut out = String::from("module.exports = {\n  env: {\n");
    for env in &config.env {
        out.push_str(&format!("    {env}: true,\n"));
    }
    out.push_str("    es2021: true\n  },\n  extends: [\n");
    let quoted: Vec<String> = config.extends.iter().map(|e| format!("    '{e}'")).collect();
    out.push_str(&quoted.join(",\n"));
    out.push_str("\n  ],\n  plugins: [\n");
    let quoted: Vec<String> = config.plugins.iter().map(|p| format!("    '{p}'")).collect();
    out.push_str(&quoted.join(",\n"));
    out.push_str("\n  ],\n  rules: {\n");
    for (rule, value) in &config.rules {
        out.push_str(&format!("    '{rule}': {value},\n"));
    }
    out.push_str("  },\n  parserOptions: {\n    ecmaVersion: 'latest',\n    sourceType: 'module'\n  }\n};\n");
    out
}

// ---------------------------------------------------------------------------
// Setup files and scripts
// ---------------------------------------------------------------------------

const LOCAL_STORAGE_MOCK: &str = r#"// Mock localStorage
const localStorageMock = (() => {
  let store = {};
  return {
    getItem: (key: string) => store[key],
    setItem: (key: string, value: string) => {
      store[key] = value.toString();
    },
    removeItem: (key: string) => {
      delete store[key];
    },
    clear: () => {
      store = {};
    }
  };
})();

Object.defineProperty(window, 'localStorage', {
  value: localStorageMock
});
"#;

const MOCHA_SETUP: &str = r#"// Mocha Setup File

import { expect } from 'chai';
import { JSDOM } from 'jsdom';

// Setup JSDOM
const dom = new JSDOM('<!DOCTYPE html><html><body></body></html>');
global.window = dom.window as any;
global.document = dom.window.document;
global.navigator = dom.window.navigator;

// Setup chai expectations
global.expect = expect;

// Mock fetch
global.fetch = () => Promise.resolve({
  json: () => Promise.resolve({})
});
"#;

const JASMINE_SETUP: &str = r#"// Jasmine Setup File

// Setup testing helpers
beforeEach(() => {
  jasmine.addMatchers({
    toBeInTheDocument: () => {
      return {
        compare: (actual: any) => {
          const pass = actual !== null && actual !== undefined;
          return {
            pass,
            message: () => pass ? 'Element exists in document' : 'Element does not exist in document'
          };
        }
      };
    }
  });
});
"#;

pub fn setup_file(framework: Framework) -> String {
    match framework {
        Framework::Jest | Framework::Vitest => {
            let (title, mock, import) = match framework {
                Framework::Jest => ("Jest", "jest", ""),
                _ => ("Vitest", "vi", "import { vi } from 'vitest';\n"),
            };
            format!(
                "// {title} Setup File\n\n{import}import '@testing-library/jest-dom';\n\n\
                 // Mock global objects\nglobal.fetch = {mock}.fn();\n\n{LOCAL_STORAGE_MOCK}\n\
                 // Reset all mocks before each test\nbeforeEach(() => {{\n  {mock}.clearAllMocks();\n}});\n"
            )
        }
        Framework::Mocha => MOCHA_SETUP.to_string(),
        Framework::Jasmine => JASMINE_SETUP.to_string(),
    }
}

/// `scripts` entries for package.json.
pub fn package_scripts(framework: Framework) -> Vec<(&'static str, String)> {
    let (run, watch, coverage, ci) = match framework {
        Framework::Jest => (
            "jest",
            "jest --watch",
            "jest --coverage",
            "jest --ci --coverage --maxWorkers=2",
        ),
        Framework::Vitest => (
            "vitest run",
            "vitest",
            "vitest run --coverage",
            "vitest run --coverage --reporter=junit",
        ),
        Framework::Mocha => ("mocha", "mocha --watch", "c8 mocha", "c8 --reporter=lcov mocha --forbid-only"),
        Framework::Jasmine => ("jasmine", "nodemon --exec jasmine", "c8 jasmine", "c8 --reporter=lcov jasmine"),
    };
    vec![
        ("test", run.to_string()),
        ("test:watch", watch.to_string()),
        ("test:coverage", coverage.to_string()),
        ("test:ci", ci.to_string()),
    ]
}

pub fn package_scripts_json(framework: Framework) -> String {
    let mut out = String::from("{\n");
    let scripts = package_scripts(framework);
    let last = scripts.len().saturating_sub(1);
    for (i, (name, cmd)) in scripts.iter().enumerate() {
        out.push_str(&format!("  \"{name}\": \"{cmd}\"{}\n", if i == last { "" } else { "," }));
    }
    out.push('}');
    out
}

// ---------------------------------------------------------------------------
// Cypress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CypressOptions {
    pub base_url: String,
    pub support_file: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub video: bool,
    pub screenshot_on_run_failure: bool,
}

impl Default for CypressOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            support_file: "cypress/support/e2e.ts".into(),
            viewport_width: 1280,
            viewport_height: 720,
            video: false,
            screenshot_on_run_failure: true,
        }
    }
}

pub fn cypress_config(opts: &CypressOptions) -> String {
    format!(
        "import {{ defineConfig }} from 'cypress';\n\n\
         export default defineConfig({{\n  e2e: {{\n    baseUrl: '{}',\n    supportFile: '{}',\n    \
         specPattern: 'cypress/e2e/**/*.cy.{{js,jsx,ts,tsx}}',\n    viewportWidth: {},\n    \
         viewportHeight: {},\n    video: {},\n    screenshotOnRunFailure: {},\n  }},\n  \
         component: {{\n    devServer: {{\n      framework: 'react',\n      bundler: 'vite',\n    }},\n    \
         specPattern: 'src/**/*.cy.{{js,jsx,ts,tsx}}',\n  }},\n}});\n",
        opts.base_url,
        opts.support_file,
        opts.viewport_width,
        opts.viewport_height,
        opts.video,
        opts.screenshot_on_run_failure,
    )
}

// ---------------------------------------------------------------------------
// Setup guide
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Typescript,
    Javascript,
}

pub fn setup_guide(framework: Framework, language: Language) -> String {
    let ts = language == Language::Typescript;
    let (lang_name, fence) = if ts {
        ("TypeScript", "typescript")
    } else {
        ("JavaScript", "javascript")
    };
    let fw = framework.as_str();
    let mut md = format!(
        "# 测试框架设置指南 - {}\n\n## 语言\n\n{lang_name}\n\n## 框架\n\n{fw}\n\n",
        fw.to_uppercase()
    );

    let deps = match (framework, ts) {
        (Framework::Jest, true) => "jest @types/jest ts-jest",
        (Framework::Vitest, _) => "vitest @vitest/coverage-v8",
        (Framework::Mocha, true) => "mocha @types/mocha ts-node",
        (Framework::Jasmine, true) => "jasmine @types/jasmine ts-node",
        (_, false) => fw,
    };
    md.push_str(&format!(
        "## 安装依赖\n\n```bash\nnpm install --save-dev {deps}\n```\n\n## 配置文件\n\n### {}\n\n",
        framework.config_file_name()
    ));
    let config = TestConfig::default_for(framework);
    md.push_str(&format!("```javascript\n{}```\n\n", runner_config(&config)));

    md.push_str(&format!(
        "## 测试示例\n\n```{fence}\ndescribe('示例测试', () => {{\n  it('应该通过', () => {{\n    \
         expect(true).toBe(true);\n  }});\n}});\n```\n\n"
    ));
    md.push_str(
        "## 最佳实践\n\n- 保持测试简单\n- 每个测试只测试一个功能\n- 使用描述性的测试名称\n- 避免过度使用 mock\n\n\
         ## 常见问题\n\n### 如何运行测试？\n\n使用 npm test 命令运行测试。\n\n\
         ### 如何调试测试？\n\n使用 --inspect 标志进行调试。\n",
    );
    md
}

// ---------------------------------------------------------------------------
// Skill input
// ---------------------------------------------------------------------------

/// Input accepted by the `test-framework-builder` skill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfigRequest {
    pub framework: Framework,
    pub language: Language,
    /// Replaces the framework defaults when present.
    pub config: Option<TestConfig>,
    pub eslint: Option<EslintTestConfig>,
    pub cypress: Option<CypressOptions>,
}

impl TestConfigRequest {
    pub fn resolve_config(&self) -> TestConfig {
        self.config
            .clone()
            .unwrap_or_else(|| TestConfig::default_for(self.framework))
    }
}

pub fn test_config_bundle(req: &TestConfigRequest) -> Vec<Artifact> {
    let config = req.resolve_config();
    let eslint = req.eslint.clone().unwrap_or_default();
    let mut files = vec![
        Artifact::new(config.framework.config_file_name(), runner_config(&config)),
        Artifact::new(".eslintrc.test.js", eslint_config(&eslint)),
        Artifact::new(config.setup_file_path(), setup_file(config.framework)),
        Artifact::new("package.scripts.json", package_scripts_json(config.framework)),
        Artifact::new("TESTING.md", setup_guide(config.framework, req.language)),
    ];
    if let Some(cypress) = &req.cypress {
        files.push(Artifact::new("cypress.config.ts", cypress_config(cypress)));
    }
    files
}
