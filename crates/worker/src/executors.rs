use std::process::Stdio;

use async_trait::async_trait;
use mailsync_config::AppConfig;
use mailsync_domain::{Job, JobOutcome};
use mailsync_errors::{SyncError, SyncResult};
use tokio::process::Command;
use tracing::debug;

const REDACTED: &str = "***";

/// 执行单个迁移任务的抽象
///
/// `Ok` 表示进程已运行结束（成功或失败由 [`JobOutcome::success`] 区分），
/// `Err` 表示进程未能启动或等待失败。
#[async_trait]
pub trait JobExecutor: Send + Sync {
    async fn execute(&self, job: &Job) -> SyncResult<JobOutcome>;

    fn name(&self) -> &str;
}

/// 调用外部 imapsync 可执行文件
#[derive(Debug, Clone)]
pub struct ImapsyncExecutor {
    program: String,
    source_host: String,
    destination_host: String,
    errors_max: String,
}

impl ImapsyncExecutor {
    pub fn new(
        program: impl Into<String>,
        source_host: impl Into<String>,
        destination_host: impl Into<String>,
        errors_max: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            source_host: source_host.into(),
            destination_host: destination_host.into(),
            errors_max: errors_max.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.imapsync_path,
            &config.source,
            &config.destination,
            &config.errors,
        )
    }

    /// 固定的参数集合，顺序与 imapsync 文档一致
    pub fn build_args(&self, job: &Job) -> Vec<String> {
        [
            "--host1",
            self.source_host.as_str(),
            "--user1",
            job.source_login.as_str(),
            "--password1",
            job.source_password.as_str(),
            "--host2",
            self.destination_host.as_str(),
            "--user2",
            job.dest_login.as_str(),
            "--password2",
            job.dest_password.as_str(),
            "--nolog",
            "--errorsmax",
            self.errors_max.as_str(),
        ]
        .iter()
        .map(|arg| arg.to_string())
        .collect()
    }

    /// 用于日志输出的参数，密码被遮盖
    pub fn redacted_args(&self, job: &Job) -> Vec<String> {
        let mut args = self.build_args(job);
        for i in 1..args.len() {
            if args[i - 1] == "--password1" || args[i - 1] == "--password2" {
                args[i] = REDACTED.to_string();
            }
        }
        args
    }
}

#[async_trait]
impl JobExecutor for ImapsyncExecutor {
    async fn execute(&self, job: &Job) -> SyncResult<JobOutcome> {
        debug!(
            "执行imapsync: program={}, args={:?}",
            self.program,
            self.redacted_args(job)
        );

        let status = Command::new(&self.program)
            .args(self.build_args(job))
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| SyncError::execution_error(format!("启动 {} 失败: {e}", self.program)))?;

        if status.success() {
            Ok(JobOutcome::succeeded())
        } else {
            Ok(JobOutcome::failed(status.code(), status.to_string()))
        }
    }

    fn name(&self) -> &str {
        "imapsync"
    }
}
