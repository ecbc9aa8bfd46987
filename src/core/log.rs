//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能，
//! 控制台输出之外可以选择追加一个按天滚动的日志文件。
//!
//! # 使用示例
//!
//! ```no_run
//! use hello_d2d12::core::config::LogLevel;
//! use hello_d2d12::core::log;
//!
//! log::init_logger(LogLevel::Info, false, None).unwrap();
//! tracing::info!(width = 640, height = 480, "Window created");
//! ```

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::config::LogLevel;
use super::error::{HelloError, Result};

const DEFAULT_LOG_FILE: &str = "hello_d2d12.log";

/// 初始化日志系统
///
/// 必须在程序开始时调用一次，重复调用返回 `HelloError::Log`。
/// 设置了 `RUST_LOG` 环境变量时以环境变量为准。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "hello_d2d12.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(true);

    let registry = tracing_subscriber::registry().with(filter).with(console_layer);

    let result = if file_output {
        let (directory, filename) = split_log_path(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false) // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        registry.with(file_layer).try_init()
    } else {
        registry.try_init()
    };

    result.map_err(|e| HelloError::Log(e.to_string()))
}

/// 由配置的日志级别构造过滤器
pub fn default_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level_name(level))
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// 把日志路径拆成目录与文件名，目录缺省为当前目录
fn split_log_path(path: &str) -> (&Path, &str) {
    let path = Path::new(path);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    (directory, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_names() {
        assert_eq!(default_filter(LogLevel::Warn).to_string(), "warn");
        assert_eq!(level_name(LogLevel::Debug), "debug");
    }

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path("logs/app.log");
        assert_eq!(dir, Path::new("logs"));
        assert_eq!(file, "app.log");

        let (dir, file) = split_log_path("app.log");
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, "app.log");
    }
}
