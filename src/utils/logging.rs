/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::state::Aggregate;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批次选择与查询客户端");
    info!("🌐 后端地址: {}", config.api_base_url);
    match config.request_timeout_secs {
        Some(secs) => info!("⏱️ 请求超时: {} 秒", secs),
        None => info!("⏱️ 请求超时: 不限制"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录当前选择的汇总信息
pub fn log_aggregate(aggregate: &Aggregate) {
    info!(
        "📊 已选择 {} 个批次，共 {} 名学生",
        aggregate.batch_count, aggregate.total_students
    );
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("平均绩点是多少", 3), "平均绩...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
