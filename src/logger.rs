//! 日志初始化
//!
//! 日志统一写到标准错误，标准输出保留给机器可读结果。
//! `RUST_LOG` 优先于配置文件中的级别。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 构建日志过滤器
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化全局日志订阅者
///
/// 重复调用时保留已安装的订阅者
pub fn init(config: &LoggingConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("[LOGGER] 日志订阅者已初始化，跳过");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "not==a[level".to_string(),
        };
        // 不应 panic
        let _ = build_filter(&config);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
