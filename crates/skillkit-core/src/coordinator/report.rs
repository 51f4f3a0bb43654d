use super::runner::SkillError;
use super::state::ProjectState;
use crate::types::ProjectType;
use chrono::{DateTime, Utc};

const NONE: &str = "无";

/// Completed phases over total phases, as a percentage. An empty plan is 0.
pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

pub fn progress_report(state: &ProjectState, total_phases: usize) -> String {
    let completed = state.completed_phases.len();
    format!(
        "项目进度报告\n\
         ---------\n\
         总阶段数: {total_phases}\n\
         已完成: {completed}\n\
         进度: {:.1}%\n\
         当前阶段: {}\n\
         错误数: {}",
        progress_percent(completed, total_phases),
        state.current_phase.as_deref().unwrap_or(NONE),
        state.errors.len(),
    )
}

pub fn final_report(
    state: &ProjectState,
    total_phases: usize,
    project_type: ProjectType,
    now: DateTime<Utc>,
) -> String {
    let phases: Vec<String> = state
        .completed_phases
        .iter()
        .map(|p| format!("  ✅ {p}"))
        .collect();
    let errors: Vec<String> = state
        .errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e.message))
        .collect();

    let report = format!(
        "项目最终报告\n\
         ------------\n\
         完成时间: {}\n\
         项目类型: {project_type}\n\
         总阶段数: {total_phases}\n\
         已完成阶段: {}\n\
         总错误数: {}\n\
         \n\
         完成的阶段:\n\
         {}\n\
         \n\
         错误日志:\n\
         {}",
        now.to_rfc3339(),
        state.completed_phases.len(),
        state.errors.len(),
        phases.join("\n"),
        errors.join("\n"),
    );
    report.trim_end().to_string()
}

pub fn error_report(error: &SkillError, state: &ProjectState, now: DateTime<Utc>) -> String {
    format!(
        "错误报告\n\
         -------\n\
         时间: {}\n\
         错误: {}\n\
         代码: {}\n\
         阶段: {}\n\
         已完成的阶段: {}",
        now.to_rfc3339(),
        error.message,
        error.code.as_deref().unwrap_or(NONE),
        state.current_phase.as_deref().unwrap_or(NONE),
        state.completed_phases.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(phases: &[&str]) -> ProjectState {
        let mut state = ProjectState::default();
        for p in phases {
            state.record_phase(p);
        }
        state
    }

    #[test]
    fn idle_progress_is_zero() {
        let report = progress_report(&ProjectState::default(), 6);
        assert!(report.contains("进度: 0.0%"));
        assert!(report.contains("当前阶段: 无"));
        assert!(report.starts_with("项目进度报告"));
    }

    #[test]
    fn progress_uses_one_decimal() {
        let report = progress_report(&state_with(&["A"]), 3);
        assert!(report.contains("已完成: 1"));
        assert!(report.contains("进度: 33.3%"));
    }

    #[test]
    fn empty_plan_reports_zero() {
        assert_eq!(progress_percent(0, 0), 0.0);
        assert!(progress_report(&ProjectState::default(), 0).contains("0.0%"));
    }

    #[test]
    fn final_report_lists_phases_and_errors() {
        let mut state = state_with(&["A", "B"]);
        state.record_error(&SkillError::new("lint failed"));
        let report = final_report(&state, 2, ProjectType::Backend, Utc::now());
        assert!(report.contains("项目类型: backend"));
        assert!(report.contains("  ✅ A\n  ✅ B"));
        assert!(report.contains("  1. lint failed"));
        assert!(report.contains("总错误数: 1"));
    }

    #[test]
    fn error_report_names_phase_and_completed() {
        let mut state = state_with(&["A"]);
        state.current_phase = Some("B".into());
        let report = error_report(&SkillError::fatal("boom"), &state, Utc::now());
        assert!(report.contains("错误: boom"));
        assert!(report.contains("阶段: B"));
        assert!(report.contains("已完成的阶段: A"));
    }
}
