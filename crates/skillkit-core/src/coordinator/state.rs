use super::plan::Dependency;
use super::runner::{Severity, SkillError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Phase,
    Skill,
}

/// One entry in the interleaved completion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub kind: CompletionKind,
    pub name: String,
}

// ---------------------------------------------------------------------------
// RecordedError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectState {
    pub status: RunStatus,
    pub current_phase: Option<String>,
    pub completed_phases: Vec<String>,
    pub completed_skills: Vec<String>,
    pub completion_log: Vec<Completion>,
    pub context: BTreeMap<String, Value>,
    pub errors: Vec<RecordedError>,
}

impl ProjectState {
    pub fn is_phase_complete(&self, name: &str) -> bool {
        self.completed_phases.iter().any(|p| p == name)
    }

    pub fn is_skill_complete(&self, name: &str) -> bool {
        self.completed_skills.iter().any(|s| s == name)
    }

    pub fn is_satisfied(&self, dep: &Dependency) -> bool {
        match dep {
            Dependency::Phase(name) => self.is_phase_complete(name),
            Dependency::Skill(name) => self.is_skill_complete(name),
        }
    }

    /// Returns false if the phase was already recorded.
    pub fn record_phase(&mut self, name: &str) -> bool {
        if self.is_phase_complete(name) {
            return false;
        }
        self.completed_phases.push(name.to_string());
        self.completion_log.push(Completion {
            kind: CompletionKind::Phase,
            name: name.to_string(),
        });
        true
    }

    /// Returns false if the skill was already recorded.
    pub fn record_skill(&mut self, name: &str) -> bool {
        if self.is_skill_complete(name) {
            return false;
        }
        self.completed_skills.push(name.to_string());
        self.completion_log.push(Completion {
            kind: CompletionKind::Skill,
            name: name.to_string(),
        });
        true
    }

    pub fn record_error(&mut self, error: &SkillError) {
        self.errors.push(RecordedError {
            message: error.message.clone(),
            code: error.code.clone(),
            severity: error.severity(),
            phase: self.current_phase.clone(),
            at: Utc::now(),
        });
    }

    /// Phase and skill names in the order they completed.
    pub fn completed_names(&self) -> Vec<&str> {
        self.completion_log.iter().map(|c| c.name.as_str()).collect()
    }
}
