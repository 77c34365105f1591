use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mailsync::app::Runner;
use mailsync::shutdown::wait_for_shutdown_signal;
use mailsync_config::{AppConfig, LogLevel, OutputFormat, DEFAULT_CONFIG_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "mailsync", version, about = "按账号列表并发调用 imapsync 迁移邮箱")]
struct Cli {
    /// 任务列表文件，覆盖配置中的 mails_file
    mails_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("加载配置文件失败: {DEFAULT_CONFIG_FILE}"))?;
    init_logging(config.log_level, config.log_format)?;

    let runner = Runner::with_job_list(config, cli.mails_file.as_deref())
        .context("加载任务列表失败，未派发任何任务")?;

    let shutdown = runner.shutdown_manager();
    let signal_listener = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.shutdown();
    });

    runner.run().await;
    signal_listener.abort();

    Ok(())
}

/// 初始化日志系统，`RUST_LOG` 优先于配置文件中的级别
fn init_logging(level: LogLevel, format: OutputFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let ansi = std::io::stdout().is_terminal();

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        OutputFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_ansi(ansi))
            .try_init()
            .context("初始化Compact日志格式失败")?,
        OutputFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(ansi))
            .try_init()
            .context("初始化Pretty日志格式失败")?,
        OutputFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("初始化JSON日志格式失败")?,
    }

    Ok(())
}
