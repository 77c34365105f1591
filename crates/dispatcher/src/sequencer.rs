use std::sync::atomic::{AtomicU64, Ordering};

/// 日志用的任务序号，从 1 开始，每个值只发放一次
#[derive(Debug)]
pub struct Sequencer {
    next: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_sequence(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// 已发放的序号数量
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
