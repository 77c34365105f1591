use std::path::{Path, PathBuf};

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use mailsync_errors::{SyncError, SyncResult};
use serde::Deserialize;
use tracing::debug;

use super::logging::{LogLevel, OutputFormat};
use crate::validation::{ConfigValidator, ValidationUtils};

/// 默认配置文件，相对于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "sync.yml";

const ENV_PREFIX: &str = "MAILSYNC";
const DEFAULT_IMAPSYNC_PATH: &str = "./imapsync";
const MAX_THREADS: usize = 1000;
const MAX_QUEUE_CAPACITY: usize = 10000;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 源IMAP服务器
    pub source: String,
    /// 目标IMAP服务器
    pub destination: String,
    /// 原样传给 `--errorsmax`
    pub errors: String,
    /// 并发worker数量
    pub threads: usize,
    /// 默认任务列表路径，可被命令行参数覆盖
    #[serde(default)]
    pub mails_file: String,
    #[serde(default = "default_imapsync_path")]
    pub imapsync_path: String,
    /// 任务队列容量，1 表示直接交接
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_format: OutputFormat,
}

fn default_imapsync_path() -> String {
    DEFAULT_IMAPSYNC_PATH.to_string()
}

fn default_queue_capacity() -> usize {
    1
}

impl AppConfig {
    /// 从YAML文件加载配置，`MAILSYNC_` 前缀的环境变量覆盖文件中的值
    pub fn load<P: AsRef<Path>>(config_path: P) -> SyncResult<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            return Err(SyncError::config_error(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let builder = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Yaml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = Self::build(builder)?;
        debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml_str: &str) -> SyncResult<Self> {
        let builder = Config::builder().add_source(File::from_str(yaml_str, FileFormat::Yaml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> SyncResult<Self> {
        let config: AppConfig = builder
            .build()
            .map_err(|e| SyncError::config_error(format!("构建配置失败: {e}")))?
            .try_deserialize()
            .map_err(|e| SyncError::config_error(format!("反序列化配置失败: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// 选择任务列表路径：命令行参数优先，其次是 `mails_file`
    pub fn job_list_path(&self, override_path: Option<&Path>) -> SyncResult<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if self.mails_file.trim().is_empty() {
            return Err(SyncError::config_error(
                "未指定任务列表文件: 请设置 mails_file 或通过命令行传入路径",
            ));
        }
        Ok(PathBuf::from(&self.mails_file))
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> SyncResult<()> {
        ValidationUtils::validate_not_empty(&self.source, "source")?;
        ValidationUtils::validate_not_empty(&self.destination, "destination")?;
        ValidationUtils::validate_not_empty(&self.errors, "errors")?;
        ValidationUtils::validate_not_empty(&self.imapsync_path, "imapsync_path")?;
        ValidationUtils::validate_count(self.threads, "threads", MAX_THREADS)?;
        ValidationUtils::validate_count(self.queue_capacity, "queue_capacity", MAX_QUEUE_CAPACITY)?;
        Ok(())
    }
}
