use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址（所有接口路径都相对于它）
    pub api_base_url: String,
    /// 单个请求的超时时间（秒），不设置则不限制
    pub request_timeout_secs: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 日志过滤规则（`RUST_LOG` 优先）
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: None,
            verbose_logging: false,
            log_filter: None,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，缺失的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失的键使用默认值，环境变量覆盖文件
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(config.with_env_overrides())
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("BATCH_INSIGHT_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: std::env::var("BATCH_INSIGHT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(self.request_timeout_secs),
            verbose_logging: std::env::var("BATCH_INSIGHT_VERBOSE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            log_filter: std::env::var("BATCH_INSIGHT_LOG_FILTER").ok().or(self.log_filter),
        }
    }

    /// 请求超时
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
