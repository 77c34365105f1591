use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("数据验证失败: {0}")]
    Validation(String),
    #[error("读取任务列表失败: {path}: {source}")]
    JobList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("任务执行错误: {0}")]
    JobExecution(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
    pub fn job_list<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::JobList {
            path: path.into(),
            source,
        }
    }
    pub fn execution_error<S: Into<String>>(msg: S) -> Self {
        Self::JobExecution(msg.into())
    }
    pub fn internal_error<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// 启动阶段的错误，出现后不再派发任何任务
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Configuration(_) | SyncError::Validation(_) | SyncError::JobList { .. }
        )
    }
}
