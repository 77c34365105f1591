use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use mailsync_config::AppConfig;
use mailsync_domain::{DispatchedJob, Job, JobStatus};
use mailsync_errors::SyncError;
use mailsync_worker::{JobExecutor, Worker};
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::sequencer::Sequencer;
use crate::tally::CompletionTally;

type JobQueue = Arc<Mutex<mpsc::Receiver<DispatchedJob>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// 并发worker数量，至少为 1
    pub worker_count: usize,
    /// 队列容量，1 表示生产者等待worker接手后才投递下一个任务
    pub queue_capacity: usize,
}

impl DispatcherConfig {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            queue_capacity: 1,
        }
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.threads).with_queue_capacity(config.queue_capacity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 因取消而未投递的任务
    pub skipped: usize,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn was_cancelled(&self) -> bool {
        self.skipped > 0
    }
}

#[derive(Debug, Default)]
struct DispatchCounters {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

impl DispatchCounters {
    fn record(&self, status: JobStatus) {
        match status {
            JobStatus::Succeeded => self.succeeded.fetch_add(1, Ordering::Relaxed),
            JobStatus::Failed => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }
}

/// 固定大小的worker池
///
/// 每次 [`Dispatcher::run_sync`] 调用都会创建一个投递协程和 `worker_count` 个
/// worker协程，调用返回前全部回收。
pub struct Dispatcher {
    config: DispatcherConfig,
    executor: Arc<dyn JobExecutor>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig, executor: Arc<dyn JobExecutor>) -> Self {
        Self { config, executor }
    }

    /// 派发全部任务并等待完成
    ///
    /// 每个任务恰好被执行一次，或在取消后被计为跳过。取消只停止投递新任务：
    /// 已在队列中的任务仍会执行，正在运行的外部进程不会被中断。
    pub async fn run_sync(&self, jobs: Vec<Job>, cancel: CancellationToken) -> DispatchReport {
        let started = Instant::now();
        let total = jobs.len();
        if total == 0 {
            info!("任务列表为空，无需派发");
            return DispatchReport::default();
        }

        let worker_count = self.config.worker_count.max(1);
        let queue_capacity = self.config.queue_capacity.max(1);
        info!(
            "开始派发任务: total={}, workers={}, queue_capacity={}",
            total, worker_count, queue_capacity
        );

        // 调用返回时取消子作用域，投递协程不会比本次调用存活得更久
        let scope = cancel.child_token();
        let _scope_guard = scope.clone().drop_guard();

        let tally = Arc::new(CompletionTally::new(total));
        let counters = Arc::new(DispatchCounters::default());
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let queue: JobQueue = Arc::new(Mutex::new(receiver));

        let feeder = tokio::spawn(feed_jobs(
            jobs,
            sender,
            scope.clone(),
            Arc::clone(&tally),
            Arc::clone(&counters),
        ));

        let mut workers = JoinSet::new();
        for id in 1..=worker_count {
            let worker = Worker::new(id, Arc::clone(&self.executor));
            workers.spawn(run_worker(
                worker,
                Arc::clone(&queue),
                Arc::clone(&tally),
                Arc::clone(&counters),
            ));
        }

        tally.wait().await;

        if let Err(e) = feeder.await {
            error!("{}", join_error("任务投递协程", e));
        }
        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                error!("{}", join_error("worker协程", e));
            }
        }

        let report = DispatchReport {
            total,
            succeeded: counters.succeeded.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            skipped: counters.skipped.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };
        debug!("派发结束: {:?}", report);
        report
    }
}

/// 按顺序投递任务。序号在入队的同一时刻分配，与任务绑定。
async fn feed_jobs(
    jobs: Vec<Job>,
    sender: mpsc::Sender<DispatchedJob>,
    cancel: CancellationToken,
    tally: Arc<CompletionTally>,
    counters: Arc<DispatchCounters>,
) {
    let sequencer = Sequencer::new();
    let mut pending = jobs.into_iter();

    while let Some(job) = pending.next() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = sender.reserve() => permit.ok(),
        };

        let Some(permit) = permit else {
            let skipped = 1 + pending.len();
            warn!("派发已取消，跳过 {} 个尚未投递的任务", skipped);
            counters.skipped.fetch_add(skipped, Ordering::Relaxed);
            tally.complete_many(skipped);
            break;
        };
        permit.send(DispatchedJob::new(sequencer.next_sequence(), job));
    }

    debug!("任务投递结束: 已投递 {} 个", sequencer.issued());
}

/// 从共享队列领取任务，直到队列关闭且为空
async fn run_worker(
    worker: Worker,
    queue: JobQueue,
    tally: Arc<CompletionTally>,
    counters: Arc<DispatchCounters>,
) {
    debug!("worker {} 已启动", worker.id());
    loop {
        // 只在等待下一个任务时持有锁
        let next = queue.lock().await.recv().await;
        let Some(dispatched) = next else {
            break;
        };

        let sequence = dispatched.sequence;
        let status = match AssertUnwindSafe(worker.process(dispatched))
            .catch_unwind()
            .await
        {
            Ok(status) => status,
            Err(payload) => {
                error!("{}", panic_error(worker.id(), sequence, payload));
                JobStatus::Failed
            }
        };

        counters.record(status);
        tally.complete();
    }
    debug!("worker {} 已退出", worker.id());
}

fn join_error(task: &str, e: JoinError) -> SyncError {
    SyncError::internal_error(format!("{task}异常退出: {e}"))
}

/// 把worker捕获到的panic转换为内部错误
fn panic_error(worker_id: usize, sequence: u64, payload: Box<dyn Any + Send>) -> SyncError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "未知panic".to_string());
    SyncError::internal_error(format!(
        "worker {worker_id} 处理任务 {sequence} 时发生panic: {detail}"
    ))
}
