//! Backup plans, backup/restore shell scripts and recovery strategy
//! heuristics.

use crate::io::Artifact;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseKind {
    #[default]
    Postgresql,
    Mysql,
    Mongodb,
    Redis,
}

impl DatabaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseKind::Postgresql => "postgresql",
            DatabaseKind::Mysql => "mysql",
            DatabaseKind::Mongodb => "mongodb",
            DatabaseKind::Redis => "redis",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "postgresql" => Some(DatabaseKind::Postgresql),
            "mysql" => Some(DatabaseKind::Mysql),
            "mongodb" => Some(DatabaseKind::Mongodb),
            "redis" => Some(DatabaseKind::Redis),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupType {
    Full,
    Incremental,
    Differential,
}

impl BackupType {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupType::Full => "full",
            BackupType::Incremental => "incremental",
            BackupType::Differential => "differential",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSchedule {
    #[serde(rename = "type")]
    pub cadence: Cadence,
    pub time: String,
    pub retention_days: u32,
    pub backup_type: BackupType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    pub name: String,
    #[serde(default)]
    pub schedules: Vec<BackupSchedule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    Local,
    S3,
    Gcs,
    Azure,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Local => "local",
            StorageKind::S3 => "s3",
            StorageKind::Gcs => "gcs",
            StorageKind::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSpec {
    #[serde(rename = "type", default)]
    pub kind: StorageKind,
    pub location: String,
    #[serde(default)]
    pub encryption: bool,
    #[serde(default)]
    pub compression: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
    #[serde(default)]
    pub notification_methods: Vec<String>,
}

fn default_alert_threshold() -> u32 {
    24
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestingSpec {
    pub frequency: Cadence,
    pub recovery_time_objective: String,
    pub recovery_point_objective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPlan {
    pub database: DatabaseSpec,
    pub storage: StorageSpec,
    pub monitoring: MonitoringSpec,
    pub testing: TestingSpec,
}

impl BackupPlan {
    /// Daily, weekly and monthly full backups to local encrypted storage.
    pub fn default_for(name: &str, kind: DatabaseKind) -> Self {
        let schedule = |cadence, time: &str, retention_days| BackupSchedule {
            cadence,
            time: time.to_string(),
            retention_days,
            backup_type: BackupType::Full,
        };
        Self {
            database: DatabaseSpec {
                kind,
                name: name.to_string(),
                schedules: vec![
                    schedule(Cadence::Daily, "02:00", 7),
                    schedule(Cadence::Weekly, "03:00", 30),
                    schedule(Cadence::Monthly, "04:00", 90),
                ],
            },
            storage: StorageSpec {
                kind: StorageKind::Local,
                location: "/backups".into(),
                encryption: true,
                compression: true,
            },
            monitoring: MonitoringSpec {
                enabled: true,
                alert_threshold: default_alert_threshold(),
                notification_methods: vec!["email".into(), "slack".into()],
            },
            testing: TestingSpec {
                frequency: Cadence::Monthly,
                recovery_time_objective: "4小时".into(),
                recovery_point_objective: "1小时".into(),
            },
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "是"
    } else {
        "否"
    }
}

pub fn plan_markdown(plan: &BackupPlan, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "# 数据库备份计划\n# 生成时间: {}\n\n## 数据库配置\n- 类型: {}\n- 名称: {}\n\n## 备份调度\n",
        now.to_rfc3339(),
        plan.database.kind,
        plan.database.name
    );
    for s in &plan.database.schedules {
        out.push_str(&format!(
            "- {}备份: {}\n  - 类型: {}\n  - 保留期: {}天\n\n",
            s.cadence.as_str(),
            s.time,
            s.backup_type.as_str(),
            s.retention_days
        ));
    }

    let storage = &plan.storage;
    out.push_str(&format!(
        "## 存储配置\n- 类型: {}\n- 位置: {}\n- 加密: {}\n- 压缩: {}\n",
        storage.kind.as_str(),
        storage.location,
        yes_no(storage.encryption),
        yes_no(storage.compression)
    ));

    if plan.monitoring.enabled {
        out.push_str(&format!(
            "\n## 监控配置\n- 告警阈值: {}小时未成功备份\n- 通知方式: {}\n",
            plan.monitoring.alert_threshold,
            plan.monitoring.notification_methods.join(", ")
        ));
    }

    out.push_str(&format!(
        "\n## 测试配置\n- 测试频率: {}\n- RTO (恢复时间目标): {}\n- RPO (恢复点目标): {}\n",
        plan.testing.frequency.as_str(),
        plan.testing.recovery_time_objective,
        plan.testing.recovery_point_objective
    ));
    out
}

// ---------------------------------------------------------------------------
// Backup scripts
// ---------------------------------------------------------------------------

const DUMP_SCRIPT: &str = r#"#!/bin/bash

# {title} Backup Script

DB_HOST="${DB_HOST:-localhost}"
DB_PORT="${DB_PORT:-{port}}"
DB_NAME="{db_name}"
{user_line}BACKUP_DIR="{backup_dir}"
TIMESTAMP=$(date +%Y%m%d_%H%M%S)
BACKUP_FILE="${BACKUP_DIR}/${DB_NAME}_${TIMESTAMP}{ext}"

mkdir -p ${BACKUP_DIR}

echo "开始备份数据库: ${DB_NAME}"
{dump_command}

if [ $? -eq 0 ]; then
  echo "备份成功: ${BACKUP_FILE}"

  if [ "{compression}" = "true" ]; then
{compress}
    echo "备份文件已压缩"
  fi

  find ${BACKUP_DIR} -name "${DB_NAME}_*{ext}*" -mtime +{retention} -delete
  echo "已清理{retention}天前的备份"

  exit 0
else
  echo "备份失败"
  echo "数据库备份失败: ${DB_NAME}" | mail -s "Backup Failed" admin@example.com
  exit 1
fi
"#;

const REDIS_BACKUP_SCRIPT: &str = r#"#!/bin/bash

# Redis Backup Script

REDIS_HOST="${REDIS_HOST:-localhost}"
REDIS_PORT="${REDIS_PORT:-6379}"
BACKUP_DIR="{backup_dir}"
TIMESTAMP=$(date +%Y%m%d_%H%M%S)
BACKUP_FILE="${BACKUP_DIR}/redis_${TIMESTAMP}.rdb"

mkdir -p ${BACKUP_DIR}

echo "开始备份Redis数据"
LAST=$(redis-cli -h ${REDIS_HOST} -p ${REDIS_PORT} LASTSAVE)
redis-cli -h ${REDIS_HOST} -p ${REDIS_PORT} BGSAVE

while [ $(redis-cli -h ${REDIS_HOST} -p ${REDIS_PORT} LASTSAVE) -eq ${LAST} ]; do
  echo "等待备份完成..."
  sleep 1
done

cp /var/lib/redis/dump.rdb ${BACKUP_FILE}

if [ $? -eq 0 ]; then
  echo "备份成功: ${BACKUP_FILE}"

  if [ "{compression}" = "true" ]; then
    gzip ${BACKUP_FILE}
    echo "备份文件已压缩"
  fi

  find ${BACKUP_DIR} -name "redis_*.rdb*" -mtime +{retention} -delete
  echo "已清理{retention}天前的备份"

  exit 0
else
  echo "备份失败"
  echo "Redis备份失败" | mail -s "Redis Backup Failed" admin@example.com
  exit 1
fi
"#;

/// Longest retention across the plan's schedules, or 30 days without any.
fn max_retention(plan: &BackupPlan) -> u32 {
    plan.database
        .schedules
        .iter()
        .map(|s| s.retention_days)
        .max()
        .unwrap_or(30)
}

pub fn backup_script(plan: &BackupPlan) -> String {
    let retention = max_retention(plan).to_string();
    let compression = plan.storage.compression.to_string();

    if plan.database.kind == DatabaseKind::Redis {
        return REDIS_BACKUP_SCRIPT
            .replace("{backup_dir}", &plan.storage.location)
            .replace("{compression}", &compression)
            .replace("{retention}", &retention);
    }

    let gzip = "    gzip ${BACKUP_FILE}\n    BACKUP_FILE=\"${BACKUP_FILE}.gz\"";
    let (title, port, user_line, ext, dump, compress) = match plan.database.kind {
        DatabaseKind::Postgresql => (
            "PostgreSQL",
            "5432",
            "DB_USER=\"${DB_USER:-postgres}\"\n",
            ".sql",
            "pg_dump -h ${DB_HOST} -p ${DB_PORT} -U ${DB_USER} -d ${DB_NAME} > ${BACKUP_FILE}",
            gzip,
        ),
        DatabaseKind::Mysql => (
            "MySQL",
            "3306",
            "DB_USER=\"${DB_USER:-root}\"\n",
            ".sql",
            "mysqldump -h ${DB_HOST} -P ${DB_PORT} -u ${DB_USER} -p${DB_PASSWORD} ${DB_NAME} > ${BACKUP_FILE}",
            gzip,
        ),
        _ => (
            "MongoDB",
            "27017",
            "",
            "",
            "mongodump --host ${DB_HOST} --port ${DB_PORT} --db ${DB_NAME} --out ${BACKUP_FILE}",
            "    tar -czf ${BACKUP_FILE}.tar.gz ${BACKUP_FILE}\n    rm -rf ${BACKUP_FILE}",
        ),
    };

    DUMP_SCRIPT
        .replace("{title}", title)
        .replace("{port}", port)
        .replace("{db_name}", &plan.database.name)
        .replace("{user_line}", user_line)
        .replace("{backup_dir}", &plan.storage.location)
        .replace("{ext}", ext)
        .replace("{dump_command}", dump)
        .replace("{compress}", compress)
        .replace("{compression}", &compression)
        .replace("{retention}", &retention)
}

// ---------------------------------------------------------------------------
// Restore scripts
// ---------------------------------------------------------------------------

const RESTORE_SCRIPT: &str = r#"#!/bin/bash

# {title} Restore Script

DB_HOST="${DB_HOST:-localhost}"
DB_PORT="${DB_PORT:-{port}}"
DB_NAME="${DB_NAME:-mydb}"
{user_line}
echo "开始恢复数据库: ${DB_NAME}"
{restore_command}

if [ $? -eq 0 ]; then
  echo "恢复成功"
  exit 0
else
  echo "恢复失败"
  exit 1
fi
"#;

const REDIS_RESTORE_SCRIPT: &str = r#"#!/bin/bash

# Redis Restore Script

REDIS_HOST="${REDIS_HOST:-localhost}"
REDIS_PORT="${REDIS_PORT:-6379}"

echo "开始恢复Redis数据"

redis-cli -h ${REDIS_HOST} -p ${REDIS_PORT} SHUTDOWN NOSAVE
cp {backup_file} /var/lib/redis/dump.rdb
redis-server /etc/redis/redis.conf

echo "恢复成功"
"#;

/// Restore script for a database named by string. Unknown names produce a
/// single comment line rather than an error.
pub fn restore_script(db_type: &str, backup_file: &str) -> String {
    let Some(kind) = DatabaseKind::parse(db_type) else {
        return format!("# Unknown database type: {db_type}");
    };

    let (title, port, user_line, command) = match kind {
        DatabaseKind::Redis => {
            return REDIS_RESTORE_SCRIPT.replace("{backup_file}", backup_file);
        }
        DatabaseKind::Postgresql => (
            "PostgreSQL",
            "5432",
            "DB_USER=\"${DB_USER:-postgres}\"\n",
            format!("psql -h ${{DB_HOST}} -p ${{DB_PORT}} -U ${{DB_USER}} -d ${{DB_NAME}} < {backup_file}"),
        ),
        DatabaseKind::Mysql => (
            "MySQL",
            "3306",
            "DB_USER=\"${DB_USER:-root}\"\n",
            format!("mysql -h ${{DB_HOST}} -P ${{DB_PORT}} -u ${{DB_USER}} -p${{DB_PASSWORD}} ${{DB_NAME}} < {backup_file}"),
        ),
        DatabaseKind::Mongodb => (
            "MongoDB",
            "27017",
            "",
            format!("mongorestore --host ${{DB_HOST}} --port ${{DB_PORT}} --db ${{DB_NAME}} {backup_file}"),
        ),
    };

    RESTORE_SCRIPT
        .replace("{title}", title)
        .replace("{port}", port)
        .replace("{user_line}", user_line)
        .replace("{restore_command}", &command)
}

// ---------------------------------------------------------------------------
// Disaster recovery strategy document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStrategy {
    /// Hours.
    pub rto: f64,
    /// Hours.
    pub rpo: f64,
    #[serde(default)]
    pub failover_plan: Vec<String>,
    #[serde(default)]
    pub rollback_plan: Vec<String>,
}

pub fn recovery_strategy_doc(strategy: &RecoveryStrategy) -> String {
    let mut out = format!(
        "# 容灾策略文档\n\n## RTO (Recovery Time Objectives)\n恢复时间目标: {}小时\n\n## RPO (Recovery Point Objectives)\n恢复点目标: {}小时\n\n## 故障转移计划\n",
        strategy.rto, strategy.rpo
    );
    for step in &strategy.failover_plan {
        out.push_str(&format!("{step}\n"));
    }
    out.push_str("\n## 回滚计划\n");
    for step in &strategy.rollback_plan {
        out.push_str(&format!("{step}\n"));
    }
    out
}

// ---------------------------------------------------------------------------
// Strategy heuristics
// ---------------------------------------------------------------------------

const DEFAULT_MINUTES: u64 = 60;

static LEADING_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn leading_number(s: &str) -> Option<u64> {
    let re = LEADING_NUMBER_RE.get_or_init(|| Regex::new(r"^\s*(\d+)").unwrap());
    re.captures(s).and_then(|c| c[1].parse().ok())
}

/// Parse strings like `15 minutes`, `4 hours`, `2 days`, `4小时`. Anything
/// without a recognized unit or leading number is treated as one hour.
pub fn parse_time_to_minutes(s: &str) -> u64 {
    let multiplier = if s.contains("hour") || s.contains("小时") {
        60
    } else if s.contains("minute") || s.contains("分钟") {
        1
    } else if s.contains("day") || s.contains('天') {
        1440
    } else {
        return DEFAULT_MINUTES;
    };
    leading_number(s).map_or(DEFAULT_MINUTES, |n| n.saturating_mul(multiplier))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyOptions {
    pub system: String,
    /// Gigabytes, as a string with a leading number.
    pub data_size: String,
    pub rto: String,
    pub rpo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupFrequency {
    Hourly,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retention {
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStrategy {
    pub strategy: String,
    pub frequency: BackupFrequency,
    pub retention: Retention,
    pub storage: StorageSpec,
}

pub fn backup_strategy(opts: &StrategyOptions) -> BackupStrategy {
    let data_size = leading_number(&opts.data_size).unwrap_or(100);
    let rto = parse_time_to_minutes(&opts.rto);
    let rpo = parse_time_to_minutes(&opts.rpo);

    let frequency = if rto < 60 || rpo < 15 {
        BackupFrequency::Hourly
    } else if rto <= 240 && rpo <= 1440 {
        BackupFrequency::Daily
    } else {
        BackupFrequency::Weekly
    };

    let strategy = if data_size > 1000 {
        "Incremental backup with weekly full"
    } else if rto < 60 {
        "Hourly incremental with daily full"
    } else {
        "Daily full backup with compression"
    };

    BackupStrategy {
        strategy: strategy.to_string(),
        frequency,
        retention: Retention {
            daily: 7,
            weekly: 4,
            monthly: 12,
        },
        storage: StorageSpec {
            kind: StorageKind::Local,
            location: "/backups".into(),
            encryption: true,
            compression: true,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub timestamp: String,
    /// Gigabytes, as a string with a leading number.
    #[serde(default)]
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreProcedure {
    pub steps: Vec<String>,
    pub verification: Vec<String>,
    pub rollback: Vec<String>,
    pub estimated_time: String,
}

/// Restore runbook; estimated at two minutes per gigabyte, saturating at
/// `u64::MAX`.
pub fn restore_procedure(info: &BackupInfo) -> RestoreProcedure {
    let size_gb = leading_number(&info.size).unwrap_or(100);
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    RestoreProcedure {
        steps: vec![
            "Stop application services".into(),
            "Verify backup file integrity".into(),
            format!("Restore backup from {}", info.location),
            "Restart database services".into(),
            "Start application services".into(),
        ],
        verification: strings(&[
            "Check database connection",
            "Verify data integrity",
            "Run health checks",
            "Test critical functionality",
        ]),
        rollback: strings(&[
            "Stop application services",
            "Restore previous backup",
            "Restart services",
            "Verify system stability",
        ]),
        estimated_time: format!("{} minutes", size_gb.saturating_mul(2)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub full_backup: String,
    pub incremental_backup: String,
    #[serde(default)]
    pub retention_days: u32,
    #[serde(default)]
    pub retention_weeks: u32,
    #[serde(default)]
    pub data_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub full: String,
    pub incremental: String,
    pub calendar: Vec<String>,
    pub storage_gb: u64,
}

fn or_default(value: u32, default: u32) -> u64 {
    u64::from(if value == 0 { default } else { value })
}

/// A seven-day calendar starting at `start` plus a storage estimate: one
/// full copy per retained day plus a 5% daily increment over the weekly
/// retention window.
pub fn backup_schedule(config: &ScheduleConfig, start: NaiveDate) -> ScheduleResult {
    let retention_days = or_default(config.retention_days, 30);
    let retention_weeks = or_default(config.retention_weeks, 12);
    let data_gb = leading_number(&config.data_size).unwrap_or(100);
    let increment_gb = data_gb.saturating_mul(5).div_ceil(100);
    let storage_gb = data_gb.saturating_mul(retention_days).saturating_add(
        increment_gb
            .saturating_mul(retention_days)
            .saturating_mul(retention_weeks)
            .saturating_mul(7),
    );

    let full_lower = config.full_backup.to_lowercase();
    let calendar = (0..7)
        .map(|i| {
            let day = (start + Duration::days(i)).format("%A").to_string();
            if full_lower.contains(&day.to_lowercase()) {
                format!("{day}: full backup")
            } else {
                format!("{day}: {} backup", config.incremental_backup)
            }
        })
        .collect();

    ScheduleResult {
        full: config.full_backup.clone(),
        incremental: config.incremental_backup.clone(),
        calendar,
        storage_gb,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSpec {
    pub full: Option<String>,
    pub incremental: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSpec {
    pub daily: Option<u32>,
    pub weekly: Option<u32>,
    pub monthly: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub encryption: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackupConfiguration {
    pub backup_location: String,
    pub schedule: Option<ScheduleSpec>,
    pub retention: Option<RetentionSpec>,
    pub storage: Option<StorageOptions>,
    pub rto: Option<String>,
    pub rpo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate_backup_configuration(config: &BackupConfiguration) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.backup_location.trim().is_empty() {
        errors.push("Backup location is required".to_string());
    }
    if config.schedule.as_ref().is_some_and(|s| s.full.is_none()) {
        warnings.push("No full backup schedule defined".to_string());
    }
    if config.retention.as_ref().and_then(|r| r.daily) == Some(0) {
        errors.push("Daily retention must be greater than 0".to_string());
    }
    if config.storage.as_ref().and_then(|s| s.encryption) == Some(false) {
        warnings.push("Encryption is not enabled for backup storage".to_string());
    }
    if let (Some(rto), Some(rpo)) = (&config.rto, &config.rpo) {
        if parse_time_to_minutes(rpo) > parse_time_to_minutes(rto) {
            warnings.push("RPO should not exceed RTO for optimal recovery".to_string());
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Skill input
// ---------------------------------------------------------------------------

/// Input accepted by the `disaster-recovery-planner` skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackupRequest {
    pub database_name: String,
    pub database_type: DatabaseKind,
    pub plan: Option<BackupPlan>,
}

impl Default for BackupRequest {
    fn default() -> Self {
        Self {
            database_name: "myapp".into(),
            database_type: DatabaseKind::Postgresql,
            plan: None,
        }
    }
}

impl BackupRequest {
    pub fn resolve_plan(&self) -> BackupPlan {
        self.plan
            .clone()
            .unwrap_or_else(|| BackupPlan::default_for(&self.database_name, self.database_type))
    }
}

/// Plan document, backup script and restore script for one database.
pub fn backup_bundle(plan: &BackupPlan, now: DateTime<Utc>) -> Vec<Artifact> {
    let kind = plan.database.kind;
    let sample = format!("{}/{}_latest.sql.gz", plan.storage.location, plan.database.name);
    vec![
        Artifact::new("BACKUP_PLAN.md", plan_markdown(plan, now)),
        Artifact::new(format!("scripts/backup-{kind}.sh"), backup_script(plan)),
        Artifact::new(
            format!("scripts/restore-{kind}.sh"),
            restore_script(kind.as_str(), &sample),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(data_size: &str, rto: &str, rpo: &str) -> StrategyOptions {
        StrategyOptions {
            system: "orders".into(),
            data_size: data_size.into(),
            rto: rto.into(),
            rpo: rpo.into(),
        }
    }

    #[test]
    fn parses_time_units() {
        assert_eq!(parse_time_to_minutes("15 minutes"), 15);
        assert_eq!(parse_time_to_minutes("4 hours"), 240);
        assert_eq!(parse_time_to_minutes("2 days"), 2880);
        assert_eq!(parse_time_to_minutes("4小时"), 240);
        assert_eq!(parse_time_to_minutes("unknown_format"), 60);
        assert_eq!(parse_time_to_minutes("some hours"), 60);
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(parse_time_to_minutes("20000000000000000 days"), u64::MAX);
        assert_eq!(parse_time_to_minutes("99999999999999999999 hours"), 60);
        let s = backup_strategy(&opts("100", "20000000000000000 days", "1 hour"));
        assert_eq!(s.frequency, BackupFrequency::Weekly);
    }

    #[test]
    fn frequency_follows_objectives() {
        assert_eq!(
            backup_strategy(&opts("100", "1 hour", "15 minutes")).frequency,
            BackupFrequency::Daily
        );
        assert_eq!(
            backup_strategy(&opts("100", "4 hours", "24 hours")).frequency,
            BackupFrequency::Daily
        );
        assert_eq!(
            backup_strategy(&opts("100", "15 minutes", "5 minutes")).frequency,
            BackupFrequency::Hourly
        );
        assert_eq!(
            backup_strategy(&opts("100", "2 days", "2 days")).frequency,
            BackupFrequency::Weekly
        );
        assert_eq!(
            backup_strategy(&opts("100", "unknown_format", "1 hour")).frequency,
            BackupFrequency::Daily
        );
    }

    #[test]
    fn strategy_prefers_incremental_for_large_data() {
        let s = backup_strategy(&opts("2000GB", "2 hours", "1 hour"));
        assert!(s.strategy.contains("Incremental"));
        let s = backup_strategy(&opts("50", "30 minutes", "5 minutes"));
        assert_eq!(s.strategy, "Hourly incremental with daily full");
        assert_eq!(s.retention.weekly, 4);
    }

    #[test]
    fn restore_procedure_estimates_two_minutes_per_gb() {
        let p = restore_procedure(&BackupInfo {
            kind: "full".into(),
            location: "s3://bucket/db.gz".into(),
            timestamp: String::new(),
            size: "50GB".into(),
        });
        assert_eq!(p.estimated_time, "100 minutes");
        assert_eq!(p.steps[2], "Restore backup from s3://bucket/db.gz");
        assert_eq!(p.rollback.len(), 4);
    }

    #[test]
    fn restore_estimate_saturates_for_huge_sizes() {
        let p = restore_procedure(&BackupInfo {
            kind: "full".into(),
            location: "/backups/db.gz".into(),
            timestamp: String::new(),
            size: "10000000000000000000".into(),
        });
        assert_eq!(p.estimated_time, format!("{} minutes", u64::MAX));
    }

    #[test]
    fn schedule_storage_saturates_for_huge_sizes() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let result = backup_schedule(
            &ScheduleConfig {
                full_backup: "Sunday".into(),
                incremental_backup: "daily".into(),
                retention_days: u32::MAX,
                retention_weeks: u32::MAX,
                data_size: "18000000000000000000".into(),
            },
            start,
        );
        assert_eq!(result.storage_gb, u64::MAX);
    }

    #[test]
    fn schedule_storage_and_calendar() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let result = backup_schedule(
            &ScheduleConfig {
                full_backup: "weekly on Sunday".into(),
                incremental_backup: "daily".into(),
                retention_days: 7,
                retention_weeks: 4,
                data_size: "100".into(),
            },
            start,
        );
        assert_eq!(result.storage_gb, 100 * 7 + 5 * 7 * 4 * 7);
        assert_eq!(result.calendar.len(), 7);
        assert_eq!(result.calendar[0], "Sunday: full backup");
        assert_eq!(result.calendar[1], "Monday: daily backup");
    }

    #[test]
    fn validation_errors_and_warnings() {
        let result = validate_backup_configuration(&BackupConfiguration {
            backup_location: "  ".into(),
            schedule: Some(ScheduleSpec::default()),
            retention: Some(RetentionSpec {
                daily: Some(0),
                ..Default::default()
            }),
            storage: Some(StorageOptions {
                kind: None,
                encryption: Some(false),
            }),
            rto: Some("1 hour".into()),
            rpo: Some("4 hours".into()),
        });
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn minimal_configuration_is_valid() {
        let result = validate_backup_configuration(&BackupConfiguration {
            backup_location: "/backups".into(),
            ..Default::default()
        });
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn plan_markdown_sections() {
        let mut plan = BackupPlan::default_for("shop", DatabaseKind::Mysql);
        let md = plan_markdown(&plan, Utc::now());
        assert!(md.contains("- 类型: mysql\n- 名称: shop"));
        assert!(md.contains("- weekly备份: 03:00\n  - 类型: full\n  - 保留期: 30天"));
        assert!(md.contains("- 加密: 是"));
        assert!(md.contains("## 监控配置"));
        assert!(md.contains("RTO (恢复时间目标): 4小时"));

        plan.monitoring.enabled = false;
        assert!(!plan_markdown(&plan, Utc::now()).contains("## 监控配置"));
    }

    #[test]
    fn postgres_backup_script() {
        let plan = BackupPlan::default_for("shop", DatabaseKind::Postgresql);
        let script = backup_script(&plan);
        assert!(script.starts_with("#!/bin/bash"));
        assert!(script.contains("DB_PORT=\"${DB_PORT:-5432}\""));
        assert!(script.contains("DB_NAME=\"shop\""));
        assert!(script.contains("DB_USER=\"${DB_USER:-postgres}\"\nBACKUP_DIR=\"/backups\""));
        assert!(script.contains("pg_dump -h ${DB_HOST}"));
        assert!(script.contains("if [ \"true\" = \"true\" ]"));
        assert!(script.contains("-mtime +90 -delete"));
        assert!(!script.contains("{db_name}") && !script.contains("{ext}"));
    }

    #[test]
    fn mongo_and_redis_backup_scripts() {
        let mongo = backup_script(&BackupPlan::default_for("shop", DatabaseKind::Mongodb));
        assert!(mongo.contains("mongodump --host"));
        assert!(mongo.contains("tar -czf"));
        assert!(mongo.contains("DB_NAME=\"shop\"\nBACKUP_DIR"));

        let redis = backup_script(&BackupPlan::default_for("cache", DatabaseKind::Redis));
        assert!(redis.contains("BGSAVE"));
        assert!(redis.contains("BACKUP_DIR=\"/backups\""));
    }

    #[test]
    fn restore_scripts() {
        let pg = restore_script("postgresql", "/backups/a.sql");
        assert!(pg.contains("psql -h ${DB_HOST} -p ${DB_PORT} -U ${DB_USER} -d ${DB_NAME} < /backups/a.sql"));
        let mysql = restore_script("mysql", "/b.sql");
        assert!(mysql.contains("DB_PORT=\"${DB_PORT:-3306}\""));
        let redis = restore_script("redis", "/b.rdb");
        assert!(redis.contains("cp /b.rdb /var/lib/redis/dump.rdb"));
        assert_eq!(restore_script("oracle", "/x"), "# Unknown database type: oracle");
    }

    #[test]
    fn strategy_document() {
        let doc = recovery_strategy_doc(&RecoveryStrategy {
            rto: 4.0,
            rpo: 1.0,
            failover_plan: vec!["1. 切换到备库".into()],
            rollback_plan: vec!["1. 恢复主库".into()],
        });
        assert!(doc.contains("恢复时间目标: 4小时"));
        assert!(doc.contains("## 故障转移计划\n1. 切换到备库\n"));
        assert!(doc.ends_with("## 回滚计划\n1. 恢复主库\n"));
    }

    #[test]
    fn bundle_names_files_by_database() {
        let plan = BackupRequest::default().resolve_plan();
        let files = backup_bundle(&plan, Utc::now());
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            ["BACKUP_PLAN.md", "scripts/backup-postgresql.sh", "scripts/restore-postgresql.sh"]
        );
    }
}
