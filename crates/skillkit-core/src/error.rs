use crate::coordinator::SkillError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillkitError {
    #[error("依赖未完成: {0}")]
    DependencyNotMet(String),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    #[error("invalid input for '{skill}': {reason}")]
    InvalidInput { skill: String, reason: String },

    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    #[error("invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("invalid project type: {0}")]
    InvalidProjectType(String),

    #[error("unsafe artifact path: {0}")]
    UnsafePath(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillkitError>;
