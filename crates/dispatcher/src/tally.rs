use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::warn;

/// 完成计数器
///
/// 以任务总数初始化，每个任务结束（执行完成或因取消而跳过）时递减一次，
/// 归零后 [`CompletionTally::wait`] 返回。多余的完成信号会被拒绝，计数不会
/// 低于零。
#[derive(Debug)]
pub struct CompletionTally {
    remaining: AtomicUsize,
    notify: Notify,
}

impl CompletionTally {
    pub fn new(expected: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(expected),
            notify: Notify::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn complete(&self) -> bool {
        self.complete_many(1) == 1
    }

    /// 返回实际被接受的完成信号数量
    pub fn complete_many(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        let previous = match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(count))
            }) {
            Ok(previous) | Err(previous) => previous,
        };

        let accepted = previous.min(count);
        if accepted < count {
            warn!(
                "收到多余的完成信号: 期望最多 {}, 实际 {}",
                accepted, count
            );
        }
        if previous > 0 && previous == accepted {
            self.notify.notify_waiters();
        }
        accepted
    }

    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}
