//! 文本格式日志初始化（独立进程，全局订阅者只安装一次）

use ironseed::{config::LoggingConfig, infrastructure::logging::init_logging};

#[test]
fn test_init_text_logging_to_stderr_only() {
    let config = LoggingConfig {
        level: "info".to_string(),
        format: "text".to_string(),
        enable_file_logging: false,
        log_file_path: None,
    };

    init_logging(&config).unwrap();
    tracing::info!("text logging installed");

    // 已安装后再次初始化返回错误而不是 panic
    assert!(init_logging(&config).is_err());
}
