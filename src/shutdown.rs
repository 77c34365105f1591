use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 优雅关闭管理器
///
/// 关闭只触发一次：停止投递新任务，正在执行的同步进程继续运行直到结束。
#[derive(Debug, Clone, Default)]
pub struct ShutdownManager {
    token: CancellationToken,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅关闭信号。关闭之后订阅得到的令牌处于已取消状态。
    pub fn subscribe(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn shutdown(&self) {
        if self.token.is_cancelled() {
            debug!("关闭管理器已经触发过关闭");
            return;
        }

        info!("触发关闭: 不再派发新任务，等待进行中的任务结束");
        self.token.cancel();
    }
}

/// 等待 Ctrl+C 或 SIGTERM
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("安装Ctrl+C信号处理器失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("安装SIGTERM信号处理器失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_shutdown_manager_basic() {
        let manager = ShutdownManager::new();
        assert!(!manager.subscribe().is_cancelled());

        let token = manager.subscribe();
        manager.shutdown();

        let result = timeout(Duration::from_millis(100), token.cancelled()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let manager = ShutdownManager::new();
        let tokens: Vec<_> = (0..3).map(|_| manager.subscribe()).collect();

        manager.shutdown();

        for token in tokens {
            assert!(timeout(Duration::from_millis(100), token.cancelled()).await.is_ok());
        }
    }

    #[test]
    fn test_subscribe_after_shutdown() {
        let manager = ShutdownManager::new();
        manager.shutdown();
        assert!(manager.subscribe().is_cancelled());
    }

    #[test]
    fn test_shutdown_is_idempotent_and_shared_by_clones() {
        let manager = ShutdownManager::new();
        let clone = manager.clone();

        clone.shutdown();
        clone.shutdown();
        assert!(manager.subscribe().is_cancelled());
    }

    #[test]
    fn test_cancelling_subscriber_does_not_shut_down_manager() {
        let manager = ShutdownManager::new();
        manager.subscribe().cancel();
        assert!(!manager.subscribe().is_cancelled());
    }
}
