//! 日志初始化

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 过滤规则优先级：`RUST_LOG` > 配置中的 `log_filter` > 按 `verbose_logging` 选择 info/debug。
/// 重复调用不会报错（测试中会多次调用）。
pub fn init(config: &Config) {
    let fallback = config.log_filter.clone().unwrap_or_else(|| {
        if config.verbose_logging {
            "batch_insight=debug,info".to_string()
        } else {
            "info".to_string()
        }
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.verbose_logging)
        .try_init();
}
