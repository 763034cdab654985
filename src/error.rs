use thiserror::Error;

/// 应用程序错误类型
///
/// 分为三大类：
/// - 本地校验错误（`Validation`）：请求发出之前就被拦截，绝不会发到网络
/// - 传输错误（`Transport` / `Decode`）：网络不通、超时、返回体不是 JSON
/// - 远端错误（`Remote`）：服务端返回了错误状态码，尽量带上服务端给出的说明
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地校验错误
    #[error("校验失败: {0}")]
    Validation(#[from] ValidationError),

    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回错误响应
    #[error("服务端返回错误 ({endpoint}): status={status}, message={message}")]
    Remote {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// 响应体解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 本地校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// 提问内容为空
    #[error("提问内容不能为空")]
    EmptyQuery,
    /// 没有选中任何批次
    #[error("请至少选择一个批次")]
    EmptySelection,
    /// CGPA 区间非法
    #[error("CGPA 区间非法: min={min} > max={max}")]
    InvalidCgpaRange { min: f64, max: f64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 构建 HTTP 客户端失败
    #[error("无法构建 HTTP 客户端: {0}")]
    HttpClient(#[source] reqwest::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建服务端错误
    pub fn remote(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        AppError::Remote {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// 创建 JSON 解析错误
    pub fn decode(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 是否为本地校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// 面向用户的错误描述
    ///
    /// 服务端给出了说明时优先使用服务端的说明，否则使用传输层错误本身的描述
    pub fn user_message(&self) -> String {
        match self {
            AppError::Remote { message, .. } if !message.trim().is_empty() => message.clone(),
            AppError::Remote { status, .. } => format!("Request failed with status code {}", status),
            AppError::Transport { source, .. } => source.to_string(),
            AppError::Decode { source, .. } => source.to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_preferred() {
        let err = AppError::remote("ai/query", 500, "Cohere quota exceeded");
        assert_eq!(err.user_message(), "Cohere quota exceeded");
    }

    #[test]
    fn test_remote_without_message_falls_back_to_status() {
        let err = AppError::remote("ai/query", 502, "  ");
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[test]
    fn test_validation_is_local() {
        let err: AppError = ValidationError::EmptySelection.into();
        assert!(err.is_validation());
        assert!(!AppError::remote("x", 400, "bad").is_validation());
    }
}
