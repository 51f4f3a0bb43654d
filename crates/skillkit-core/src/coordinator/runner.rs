use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Severity / SkillError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Aborts the run.
    Fatal,
    /// Recorded; execution continues with the next skill.
    Recoverable,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Recoverable => "recoverable",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FATAL_CODE: &str = "FATAL";

/// Failure reported by a skill runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct SkillError {
    pub message: String,
    #[serde(default)]
    pub fatal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl SkillError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: false,
            code: None,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            fatal: true,
            ..Self::new(message)
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Fatal iff the flag is set or the code is exactly `FATAL`.
    pub fn severity(&self) -> Severity {
        if self.fatal || self.code.as_deref() == Some(FATAL_CODE) {
            Severity::Fatal
        } else {
            Severity::Recoverable
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

// ---------------------------------------------------------------------------
// SkillRunner
// ---------------------------------------------------------------------------

/// Executes one named skill against its input payload.
pub trait SkillRunner {
    fn invoke(&self, skill: &str, input: &Value) -> Result<Value, SkillError>;
}

impl<F> SkillRunner for F
where
    F: Fn(&str, &Value) -> Result<Value, SkillError>,
{
    fn invoke(&self, skill: &str, input: &Value) -> Result<Value, SkillError> {
        self(skill, input)
    }
}

/// Placeholder runner: every skill succeeds with synthetic output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubRunner;

impl StubRunner {
    pub fn output_for(skill: &str) -> Value {
        json!({
            "success": true,
            "output": format!("{skill}的输出结果"),
            "timestamp": Utc::now().to_rfc3339(),
        })
    }
}

impl SkillRunner for StubRunner {
    fn invoke(&self, skill: &str, _input: &Value) -> Result<Value, SkillError> {
        Ok(Self::output_for(skill))
    }
}
