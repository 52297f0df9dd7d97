//! 日志系统配置模块
//! 支持结构化日志、日志级别配置和按天轮转的文件日志
//!
//! 控制台日志写到 stderr，stdout 留给命令输出。

use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 文件日志后台线程的 guard，进程存活期间必须持有
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    // 设置日志级别过滤器
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        init_json_logging(filter, config)
    } else {
        init_text_logging(filter, config)
    }
}

/// 文件日志目录与文件名
fn log_file_target(config: &LoggingConfig) -> (&Path, &str) {
    let path = config.log_file_path.as_deref().map(Path::new);

    let dir = path
        .and_then(|p| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("./logs"));
    let file = path
        .and_then(|p| p.file_name())
        .and_then(|f| f.to_str())
        .unwrap_or("ironseed.log");

    (dir, file)
}

fn file_writer(config: &LoggingConfig) -> anyhow::Result<non_blocking::NonBlocking> {
    let (dir, file) = log_file_target(config);
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = non_blocking(rolling::daily(dir, file));
    // 重复初始化时保留第一个 guard
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}

/// 初始化JSON格式日志（结构化日志）
fn init_json_logging(filter: EnvFilter, config: &LoggingConfig) -> anyhow::Result<()> {
    if config.enable_file_logging {
        let file_layer = fmt::layer().json().with_writer(file_writer(config)?);

        Registry::default()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// 初始化文本格式日志
fn init_text_logging(filter: EnvFilter, config: &LoggingConfig) -> anyhow::Result<()> {
    if config.enable_file_logging {
        let file_layer = fmt::layer()
            .with_writer(file_writer(config)?)
            .with_ansi(false);

        Registry::default()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true))
            .try_init()?;
    }

    Ok(())
}
