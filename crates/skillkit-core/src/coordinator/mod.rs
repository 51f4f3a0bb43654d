//! Sequential phase/skill execution with dependency preconditions.
//!
//! A [`ProjectCoordinator`] walks a [`Plan`] in list order. Before each skill
//! runs, every declared [`Dependency`] must already be complete in its own
//! namespace (phases or skills). Skill output is stored in the state context
//! under the skill name.

mod plan;
mod report;
mod runner;
mod state;

pub use plan::{Dependency, PhaseDefinition, Plan, SkillTask};
pub use report::{error_report, final_report, progress_percent, progress_report};
pub use runner::{Severity, SkillError, SkillRunner, StubRunner, FATAL_CODE};
pub use state::{Completion, CompletionKind, ProjectState, RecordedError, RunStatus};

use crate::error::{Result, SkillkitError};
use crate::types::ProjectType;
use chrono::Utc;
use serde_json::Value;

/// Error code attached to recorded dependency violations.
pub const DEPENDENCY_CODE: &str = "DEPENDENCY";

pub const REQUIREMENTS_KEY: &str = "requirements";
pub const ERROR_REPORT_KEY: &str = "errorReport";

#[derive(Debug, Clone, Default)]
pub struct CoordinatorOptions {
    pub project_type: ProjectType,
    pub plan: Plan,
    pub debug_mode: bool,
}

impl CoordinatorOptions {
    pub fn new(project_type: ProjectType, plan: Plan) -> Self {
        Self {
            project_type,
            plan,
            debug_mode: false,
        }
    }

    pub fn with_debug(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }
}

pub struct ProjectCoordinator {
    options: CoordinatorOptions,
    runner: Box<dyn SkillRunner>,
    state: ProjectState,
}

impl ProjectCoordinator {
    /// A coordinator whose skills all succeed with placeholder output.
    pub fn new(options: CoordinatorOptions) -> Self {
        Self::with_runner(options, StubRunner)
    }

    pub fn with_runner(options: CoordinatorOptions, runner: impl SkillRunner + 'static) -> Self {
        Self {
            options,
            runner: Box::new(runner),
            state: ProjectState::default(),
        }
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Run every phase in order. Returns the first fatal skill error or
    /// dependency violation; recoverable skill errors are only recorded.
    pub fn start_project(&mut self, requirements: Value) -> Result<()> {
        self.state
            .context
            .insert(REQUIREMENTS_KEY.to_string(), requirements);
        self.state.status = RunStatus::Running;
        self.log("🚀 启动产品开发流程");

        let phases = self.options.plan.phases.clone();
        for phase in &phases {
            if let Err(e) = self.execute_phase(phase) {
                self.state.status = RunStatus::Failed;
                return Err(e);
            }
        }

        self.state.status = RunStatus::Completed;
        self.log("✅ 产品开发流程完成");
        Ok(())
    }

    fn execute_phase(&mut self, phase: &PhaseDefinition) -> Result<()> {
        self.state.current_phase = Some(phase.name.clone());
        self.log(&format!("📍 阶段: {}", phase.name));

        for task in &phase.skills {
            self.execute_skill(task)?;
        }

        self.state.record_phase(&phase.name);
        self.log(&format!("✅ 阶段完成: {}", phase.name));
        Ok(())
    }

    fn execute_skill(&mut self, task: &SkillTask) -> Result<()> {
        self.log(&format!("  ↳ 执行: {}", task.name));

        if let Some(dep) = task
            .dependencies
            .iter()
            .find(|d| !self.state.is_satisfied(d))
        {
            let err = SkillError::new(format!("依赖未完成: {dep}")).with_code(DEPENDENCY_CODE);
            tracing::error!(skill = %task.name, dependency = %dep, kind = dep.kind(), "{err}");
            self.state.record_error(&err);
            return Err(SkillkitError::DependencyNotMet(dep.name().to_string()));
        }

        match self.runner.invoke(&task.name, &task.input) {
            Ok(output) => {
                self.state.context.insert(task.name.clone(), output);
                self.state.record_skill(&task.name);
                self.log(&format!("  ✅ 完成: {}", task.name));
                Ok(())
            }
            Err(err) => {
                self.log(&format!("  ❌ 失败: {} - {err}", task.name));
                self.handle_error(&err);
                if err.is_fatal() {
                    return Err(err.into());
                }
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    /// Record an error. A fatal error also stores an error report in the
    /// context under `errorReport`; neither branch takes corrective action.
    pub fn handle_error(&mut self, error: &SkillError) {
        self.state.record_error(error);
        match error.severity() {
            Severity::Fatal => {
                tracing::error!(code = error.code.as_deref(), "{error}");
                self.log("🛑 致命错误，停止执行");
                let report = error_report(error, &self.state, Utc::now());
                self.state
                    .context
                    .insert(ERROR_REPORT_KEY.to_string(), Value::String(report));
                self.notify_team(error);
            }
            Severity::Recoverable => {
                tracing::warn!(code = error.code.as_deref(), "{error}");
                self.log("⚠️ 非致命错误，继续执行");
            }
        }
    }

    fn notify_team(&self, error: &SkillError) {
        self.log(&format!("📧 通知团队处理错误: {}", error.message));
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// An owned snapshot; mutating it never affects the coordinator.
    pub fn project_state(&self) -> ProjectState {
        self.state.clone()
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn context(&self, key: &str) -> Option<&Value> {
        self.state.context.get(key)
    }

    pub fn progress_report(&self) -> String {
        progress_report(&self.state, self.options.plan.phases.len())
    }

    pub fn final_report(&self) -> String {
        final_report(
            &self.state,
            self.options.plan.phases.len(),
            self.options.project_type,
            Utc::now(),
        )
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    /// Logs a pause. Runs execute synchronously inside `start_project`, so
    /// there is nothing in flight to suspend; state is left untouched.
    pub fn pause_project(&self) {
        self.log("⏸️ 项目已暂停");
    }

    pub fn resume_project(&self) {
        self.log("▶️ 项目已恢复");
    }

    fn log(&self, message: &str) {
        if self.options.debug_mode {
            tracing::info!("{message}");
        }
    }
}
