//! Work breakdown structure, Gantt scheduling and resource allocation.

use crate::error::{Result, SkillkitError};
use crate::io::Artifact;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_PHASE: u64 = 15;
pub const HOURS_PER_DAY: u32 = 8;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Days,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn emoji(self) -> &'static str {
        match self {
            Priority::Critical => "🔴",
            Priority::High => "🟠",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn progress(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 50,
            TaskStatus::Completed => 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: u32,
    #[serde(default)]
    pub unit: DurationUnit,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

impl Task {
    /// Calendar days the task occupies; hour-based tasks round up to whole days.
    pub fn duration_days(&self) -> u64 {
        match self.unit {
            DurationUnit::Days => u64::from(self.duration),
            DurationUnit::Hours => u64::from(self.duration.div_ceil(HOURS_PER_DAY)),
        }
    }

    pub fn effort_hours(&self) -> u64 {
        match self.unit {
            DurationUnit::Days => u64::from(self.duration) * u64::from(HOURS_PER_DAY),
            DurationUnit::Hours => u64::from(self.duration),
        }
    }
}

fn owned(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    name: &str,
    description: &str,
    duration: u32,
    dependencies: &[&str],
    assignees: &[&str],
    priority: Priority,
    deliverables: &[&str],
) -> Task {
    Task {
        id: id.into(),
        name: name.into(),
        description: Some(description.into()),
        duration,
        unit: DurationUnit::Days,
        dependencies: owned(dependencies),
        assignees: owned(assignees),
        priority,
        status: TaskStatus::Pending,
        deliverables: owned(deliverables),
    }
}

// ---------------------------------------------------------------------------
// Phases, milestones, WBS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbsPhase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wbs {
    pub project: String,
    pub version: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_duration: u64,
    pub phases: Vec<WbsPhase>,
    pub milestones: Vec<Milestone>,
}

/// Input accepted by the `project-planner` skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WbsRequest {
    pub name: String,
    pub start_date: String,
    pub description: String,
    pub phases: Option<Vec<WbsPhase>>,
}

impl Default for WbsRequest {
    fn default() -> Self {
        Self {
            name: "电商网站项目".into(),
            start_date: "2024-01-15".into(),
            description: "开发一个完整的电商平台".into(),
            phases: None,
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SkillkitError::InvalidDate(s.to_string()))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| SkillkitError::DateOutOfRange(format!("{date} + {days} days")))
}

pub fn generate_wbs(req: &WbsRequest) -> Result<Wbs> {
    let start = parse_date(&req.start_date)?;
    let phases = match &req.phases {
        Some(p) => p.clone(),
        None => default_phases(start)?,
    };
    let total = phases.len() as u64 * DAYS_PER_PHASE;

    let milestones = phases
        .iter()
        .map(|p| Milestone {
            id: format!("M{}", p.id),
            name: format!("{}完成", p.name),
            date: p.end_date,
            description: format!("{}阶段完成", p.description),
            dependencies: p.tasks.iter().map(|t| t.id.clone()).collect(),
        })
        .collect();

    Ok(Wbs {
        project: req.name.clone(),
        version: "1.0".into(),
        start_date: start,
        end_date: add_days(start, total)?,
        total_duration: total,
        phases,
        milestones,
    })
}

#[allow(clippy::too_many_arguments)]
fn phase(
    start: NaiveDate,
    id: &str,
    name: &str,
    description: &str,
    from: u64,
    to: u64,
    dependencies: &[&str],
    tasks: Vec<Task>,
) -> Result<WbsPhase> {
    Ok(WbsPhase {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        start_date: add_days(start, from)?,
        end_date: add_days(start, to)?,
        tasks,
        dependencies: owned(dependencies),
    })
}

pub fn default_phases(start: NaiveDate) -> Result<Vec<WbsPhase>> {
    use Priority::*;
    Ok(vec![
        phase(start, "P1", "需求分析", "收集和分析项目需求", 0, 10, &[], vec![
            task("T1.1", "用户需求收集", "通过访谈、问卷等方式收集用户需求", 5, &[],
                &["Product Manager", "Requirements Analyst"], High, &["用户需求文档", "用户访谈记录"]),
            task("T1.2", "需求分析和整理", "分析收集的需求，整理成需求规格说明书", 5, &["T1.1"],
                &["Requirements Analyst"], High, &["需求规格说明书", "用例图"]),
        ])?,
        phase(start, "P2", "产品设计", "设计产品原型和功能规格", 11, 25, &["P1"], vec![
            task("T2.1", "产品原型设计", "使用Figma或Sketch设计产品原型", 7, &["T1.2"],
                &["UI Designer", "Product Manager"], High, &["产品原型（低保真）", "产品原型（高保真）"]),
            task("T2.2", "功能规格说明", "编写详细的功能规格说明", 7, &["T2.1"],
                &["Product Manager"], High, &["功能规格说明书", "API文档初稿"]),
        ])?,
        phase(start, "P3", "技术架构设计", "设计系统技术架构", 26, 40, &["P2"], vec![
            task("T3.1", "系统架构设计", "设计系统整体架构和技术选型", 7, &["T2.2"],
                &["Technical Architect", "Backend Lead"], High, &["架构设计文档", "技术选型报告"]),
            task("T3.2", "数据库设计", "设计数据库Schema和ER图", 7, &["T3.1"],
                &["Database Engineer"], High, &["数据库设计文档", "ER图"]),
        ])?,
        phase(start, "P4", "开发实现", "前后端开发和API实现", 41, 80, &["P3"], vec![
            task("T4.1", "后端API开发", "实现后端API接口", 20, &["T3.2"],
                &["Backend Developers"], High, &["后端API代码", "API文档"]),
            task("T4.2", "前端页面开发", "实现前端页面和交互", 20, &["T3.1", "T4.1"],
                &["Frontend Developers"], High, &["前端代码", "页面样式"]),
        ])?,
        phase(start, "P5", "测试验证", "功能测试、集成测试和性能测试", 81, 95, &["P4"], vec![
            task("T5.1", "单元测试和集成测试", "编写和执行单元测试、集成测试", 7, &["T4.1", "T4.2"],
                &["QA Engineers", "Developers"], High, &["测试用例", "测试报告"]),
            task("T5.2", "性能测试和安全测试", "执行性能测试和安全测试", 7, &["T5.1"],
                &["QA Engineers", "Security Engineer"], Medium, &["性能测试报告", "安全测试报告"]),
        ])?,
        phase(start, "P6", "部署上线", "部署到生产环境", 96, 100, &["P5"], vec![
            task("T6.1", "部署准备", "准备生产环境、配置CI/CD", 3, &["T5.2"],
                &["DevOps Engineer"], High, &["CI/CD配置", "部署文档"]),
            task("T6.2", "正式部署", "将应用部署到生产环境", 2, &["T6.1"],
                &["DevOps Engineer"], Critical, &["生产环境应用", "部署日志"]),
        ])?,
    ])
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

pub fn markdown(wbs: &Wbs) -> String {
    let mut md = format!(
        "# {} 工作分解结构 (WBS)\n\n**版本**: {}\n**开始日期**: {}\n**结束日期**: {}\n**总工期**: {}天\n\n---\n\n## 项目里程碑\n\n",
        wbs.project, wbs.version, wbs.start_date, wbs.end_date, wbs.total_duration
    );
    for m in &wbs.milestones {
        md.push_str(&format!("- [ ] {} ({})\n  - {}\n\n", m.name, m.date, m.description));
    }

    md.push_str("---\n\n## 项目阶段\n\n");
    for p in &wbs.phases {
        md.push_str(&format!(
            "### {} - {}\n\n**描述**: {}\n**开始日期**: {}\n**结束日期**: {}\n\n**任务列表**:\n",
            p.id, p.name, p.description, p.start_date, p.end_date
        ));
        for t in &p.tasks {
            md.push_str(&format!("- [ ] {}: {} {}\n", t.id, t.name, t.priority.emoji()));
            let unit = match t.unit {
                DurationUnit::Days => "天",
                DurationUnit::Hours => "小时",
            };
            md.push_str(&format!("  - 工期: {} {unit}\n", t.duration));
            if let Some(desc) = &t.description {
                md.push_str(&format!("  - 描述: {desc}\n"));
            }
            if !t.dependencies.is_empty() {
                md.push_str(&format!("  - 依赖: {}\n", t.dependencies.join(", ")));
            }
            md.push_str(&format!("  - 负责人: {}\n", t.assignees.join(", ")));
            if !t.deliverables.is_empty() {
                md.push_str(&format!("  - 交付物: {}\n", t.deliverables.join(", ")));
            }
            md.push('\n');
        }
        md.push('\n');
    }
    md
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttTask {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: u8,
    pub dependencies: Vec<String>,
}

/// Schedule every task. A task starts when its first dependency that has
/// already been scheduled ends, otherwise at its phase start.
pub fn gantt_tasks(wbs: &Wbs) -> Result<Vec<GanttTask>> {
    let mut scheduled: Vec<GanttTask> = Vec::new();
    for phase in &wbs.phases {
        for t in &phase.tasks {
            let start = t
                .dependencies
                .first()
                .and_then(|dep| scheduled.iter().find(|g| &g.id == dep))
                .map(|g| g.end)
                .unwrap_or(phase.start_date);
            scheduled.push(GanttTask {
                id: t.id.clone(),
                name: format!("{}: {}", t.id, t.name),
                start,
                end: add_days(start, t.duration_days())?,
                progress: t.status.progress(),
                dependencies: t.dependencies.clone(),
            });
        }
    }
    Ok(scheduled)
}

pub fn mermaid_gantt(wbs: &Wbs) -> Result<String> {
    let tasks = gantt_tasks(wbs)?;
    let mut out = format!(
        "gantt\n    title {}\n    dateFormat  YYYY-MM-DD\n    axisFormat  %m/%d\n\n",
        wbs.project
    );
    for phase in &wbs.phases {
        out.push_str(&format!("    section {}\n", phase.name));
        for t in &phase.tasks {
            if let Some(g) = tasks.iter().find(|g| g.id == t.id) {
                let days = (g.end - g.start).num_days();
                out.push_str(&format!("    {} :{days}d, {}\n", t.name, g.start));
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLoad {
    pub resource: String,
    pub task_count: u32,
    pub total_hours: u64,
}

/// Per-assignee load in first-seen order.
pub fn resource_loads(wbs: &Wbs) -> Vec<ResourceLoad> {
    let mut loads: Vec<ResourceLoad> = Vec::new();
    for t in wbs.phases.iter().flat_map(|p| &p.tasks) {
        for who in &t.assignees {
            let idx = match loads.iter().position(|l| &l.resource == who) {
                Some(i) => i,
                None => {
                    loads.push(ResourceLoad {
                        resource: who.clone(),
                        task_count: 0,
                        total_hours: 0,
                    });
                    loads.len() - 1
                }
            };
            loads[idx].task_count = loads[idx].task_count.saturating_add(1);
            loads[idx].total_hours = loads[idx].total_hours.saturating_add(t.effort_hours());
        }
    }
    loads
}

pub fn resource_allocation(wbs: &Wbs) -> String {
    let mut table =
        String::from("## 资源分配表\n\n| 资源 | 任务数 | 总工时 |\n|------|--------|--------|\n");
    for l in resource_loads(wbs) {
        table.push_str(&format!("| {} | {} | {} |\n", l.resource, l.task_count, l.total_hours));
    }
    table
}

/// WBS document, Gantt chart and resource table, plus the raw structure.
pub fn wbs_bundle(wbs: &Wbs) -> Result<Vec<Artifact>> {
    Ok(vec![
        Artifact::new("WBS.md", markdown(wbs)),
        Artifact::new("GANTT.md", format!("```mermaid\n{}```\n", mermaid_gantt(wbs)?)),
        Artifact::new("RESOURCES.md", resource_allocation(wbs)),
        Artifact::new("wbs.json", serde_json::to_string_pretty(wbs)?),
    ])
}
