use std::sync::Arc;
use std::time::{Duration, Instant};

use mailsync_domain::{DispatchedJob, JobStatus};
use tracing::{error, info};

use crate::executors::JobExecutor;

/// 并发池中的一个执行槽位，一次只处理一个任务
pub struct Worker {
    id: usize,
    executor: Arc<dyn JobExecutor>,
}

impl Worker {
    pub fn new(id: usize, executor: Arc<dyn JobExecutor>) -> Self {
        Self { id, executor }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// 执行任务并输出开始、完成或失败日志。失败只记录，不向外传播。
    pub async fn process(&self, dispatched: DispatchedJob) -> JobStatus {
        let DispatchedJob { sequence, job } = dispatched;
        info!(worker_id = self.id, "started job {}: {}", sequence, job.dest_login);

        let start = Instant::now();
        let result = self.executor.execute(&job).await;
        let minutes = elapsed_minutes(start.elapsed());

        match result {
            Ok(outcome) if outcome.success => {
                info!(
                    worker_id = self.id,
                    "finished job {}: {} ({:.0} min)", sequence, job.dest_login, minutes
                );
                JobStatus::Succeeded
            }
            Ok(outcome) => {
                let detail = outcome
                    .error_message
                    .unwrap_or_else(|| format!("exit code {:?}", outcome.exit_code));
                error!(
                    worker_id = self.id,
                    "error on job {}: {} ({:.0} min): {}", sequence, job.dest_login, minutes, detail
                );
                JobStatus::Failed
            }
            Err(e) => {
                error!(
                    worker_id = self.id,
                    "error on job {}: {} ({:.0} min): {}", sequence, job.dest_login, minutes, e
                );
                JobStatus::Failed
            }
        }
    }
}

pub fn elapsed_minutes(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() / 60.0
}
