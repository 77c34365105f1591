use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use mailsync_config::AppConfig;
use mailsync_dispatcher::{DispatchReport, Dispatcher, DispatcherConfig};
use mailsync_domain::{load_job_list, Job};
use mailsync_errors::SyncResult;
use mailsync_worker::{elapsed_minutes, ImapsyncExecutor, JobExecutor};
use tracing::{info, warn};

use crate::shutdown::ShutdownManager;

/// 组合根：配置、任务列表、worker池与关闭信号在这里装配
pub struct Runner {
    config: AppConfig,
    jobs: Vec<Job>,
    shutdown: ShutdownManager,
}

impl Runner {
    pub fn new(config: AppConfig, jobs: Vec<Job>) -> Self {
        Self {
            config,
            jobs,
            shutdown: ShutdownManager::new(),
        }
    }

    /// 读取任务列表，路径优先取命令行参数。失败时不会派发任何任务。
    pub fn with_job_list(config: AppConfig, job_list_override: Option<&Path>) -> SyncResult<Self> {
        let job_list_path = config.job_list_path(job_list_override)?;
        let jobs = load_job_list(&job_list_path)?;
        info!(
            "已加载任务列表: {}, 共 {} 个任务",
            job_list_path.display(),
            jobs.len()
        );
        Ok(Self::new(config, jobs))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn shutdown_manager(&self) -> ShutdownManager {
        self.shutdown.clone()
    }

    pub async fn run(self) -> DispatchReport {
        let executor = Arc::new(ImapsyncExecutor::from_config(&self.config));
        self.run_with_executor(executor).await
    }

    pub async fn run_with_executor(self, executor: Arc<dyn JobExecutor>) -> DispatchReport {
        let Runner {
            config,
            jobs,
            shutdown,
        } = self;

        info!(
            "开始同步邮箱: {} -> {}, 任务数={}, 执行器={}, 开始时间={}",
            config.source,
            config.destination,
            jobs.len(),
            executor.name(),
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );

        let start = Instant::now();
        let dispatcher = Dispatcher::new(DispatcherConfig::from_app_config(&config), executor);
        let report = dispatcher.run_sync(jobs, shutdown.subscribe()).await;

        if report.was_cancelled() {
            warn!("同步被取消，{} 个任务未执行", report.skipped);
        }
        info!(
            "任务统计: 成功 {}, 失败 {}, 跳过 {}",
            report.succeeded, report.failed, report.skipped
        );
        info!(
            "mailbox synchronization finished, total time {:.0} min",
            elapsed_minutes(start.elapsed())
        );
        report
    }
}
