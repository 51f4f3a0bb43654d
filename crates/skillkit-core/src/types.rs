use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Web,
    Mobile,
    Desktop,
    Backend,
}

impl ProjectType {
    pub fn all() -> &'static [ProjectType] {
        &[
            ProjectType::Web,
            ProjectType::Mobile,
            ProjectType::Desktop,
            ProjectType::Backend,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Web => "web",
            ProjectType::Mobile => "mobile",
            ProjectType::Desktop => "desktop",
            ProjectType::Backend => "backend",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = crate::error::SkillkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(ProjectType::Web),
            "mobile" => Ok(ProjectType::Mobile),
            "desktop" => Ok(ProjectType::Desktop),
            "backend" => Ok(ProjectType::Backend),
            _ => Err(crate::error::SkillkitError::InvalidProjectType(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// RunnerKind
// ---------------------------------------------------------------------------

/// Which skill runner a configured project uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerKind {
    /// Synthesizes placeholder output for every skill.
    #[default]
    Stub,
    /// Dispatches known skills to the template generators.
    Generators,
}

impl RunnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RunnerKind::Stub => "stub",
            RunnerKind::Generators => "generators",
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_roundtrips_through_str() {
        for t in ProjectType::all() {
            let parsed: ProjectType = t.as_str().parse().unwrap();
            assert_eq!(parsed, *t);
        }
    }

    #[test]
    fn project_type_rejects_unknown() {
        assert!("embedded".parse::<ProjectType>().is_err());
    }

    #[test]
    fn runner_kind_defaults_to_stub() {
        assert_eq!(RunnerKind::default(), RunnerKind::Stub);
        let parsed: RunnerKind = serde_yaml::from_str("generators").unwrap();
        assert_eq!(parsed, RunnerKind::Generators);
    }
}
