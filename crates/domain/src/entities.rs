use std::fmt;

/// 一个邮箱迁移单元：源账号到目标账号
///
/// 构造后不可变。`Debug` 输出中密码会被遮盖。
#[derive(Clone, PartialEq, Eq)]
pub struct Job {
    pub source_login: String,
    pub source_password: String,
    pub dest_login: String,
    pub dest_password: String,
}

impl Job {
    pub fn new(
        source_login: impl Into<String>,
        source_password: impl Into<String>,
        dest_login: impl Into<String>,
        dest_password: impl Into<String>,
    ) -> Self {
        Self {
            source_login: source_login.into(),
            source_password: source_password.into(),
            dest_login: dest_login.into(),
            dest_password: dest_password.into(),
        }
    }

    /// 源和目标使用同一组凭据
    pub fn same_credentials(login: impl Into<String>, password: impl Into<String>) -> Self {
        let login = login.into();
        let password = password.into();
        Self {
            dest_login: login.clone(),
            dest_password: password.clone(),
            source_login: login,
            source_password: password,
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("source_login", &self.source_login)
            .field("source_password", &"***")
            .field("dest_login", &self.dest_login)
            .field("dest_password", &"***")
            .finish()
    }
}

/// 队列中的条目：序号在入队前与任务绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedJob {
    pub sequence: u64,
    pub job: Job,
}

impl DispatchedJob {
    pub fn new(sequence: u64, job: Job) -> Self {
        Self { sequence, job }
    }
}

/// 外部同步进程的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub error_message: Option<String>,
}

impl JobOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            error_message: None,
        }
    }

    pub fn failed(exit_code: Option<i32>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            error_message: Some(error_message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_credentials() {
        let job = Job::same_credentials("user@example.com", "secret");
        assert_eq!(job, Job::new("user@example.com", "secret", "user@example.com", "secret"));
    }

    #[test]
    fn test_debug_masks_passwords() {
        let job = Job::new("a@old", "hunter2", "a@new", "correct-horse");
        let debug_str = format!("{:?}", DispatchedJob::new(3, job));
        assert!(debug_str.contains("a@old"));
        assert!(debug_str.contains("a@new"));
        assert!(!debug_str.contains("hunter2"));
        assert!(!debug_str.contains("correct-horse"));
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(JobOutcome::succeeded().success);
        let failed = JobOutcome::failed(Some(2), "exit status: 2");
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(2));
        assert_eq!(failed.error_message.as_deref(), Some("exit status: 2"));
    }
}
