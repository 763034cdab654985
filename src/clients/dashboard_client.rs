/// 看板后端 API 客户端
///
/// 封装所有与后端接口相关的调用逻辑，只负责构建请求和把响应映射成本地模型，
/// 不做任何业务判断。
use crate::clients::wire::{
    AlertsResponse, BatchesResponse, QueryAnswer, QueryRequest, QueryResponse, SearchResponse,
};
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{Alert, BatchCatalog, DashboardStats, FilterCriteria, StudentRecord};
use crate::utils::truncate_text;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const BATCHES_ENDPOINT: &str = "batches/all";
pub const QUERY_ENDPOINT: &str = "ai/query";
pub const ALERTS_ENDPOINT: &str = "dashboard/alerts";
pub const SEARCH_ENDPOINT: &str = "search/students";
pub const STATS_ENDPOINT: &str = "dashboard/stats";

/// 后端服务接口
///
/// 业务层只依赖这个 trait，测试中可以替换成内存实现
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// 获取批次目录
    async fn list_batches(&self) -> AppResult<BatchCatalog>;

    /// 携带批次上下文向 AI 提问
    async fn ask(&self, request: &QueryRequest) -> AppResult<QueryAnswer>;

    /// 获取指定批次的学业预警
    async fn alerts(&self, batches: &[String]) -> AppResult<Vec<Alert>>;

    /// 搜索学生
    async fn search_students(&self, criteria: &FilterCriteria) -> AppResult<Vec<StudentRecord>>;

    /// 获取全量看板统计
    async fn dashboard_stats(&self) -> AppResult<DashboardStats>;
}

/// 基于 reqwest 的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDashboardClient {
    /// 创建新的客户端
    ///
    /// 只有配置了 `request_timeout_secs` 时才设置超时
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get_json<T>(&self, endpoint: &str, query: &[(&str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        debug!("GET {} 参数: {:?}", endpoint, query);

        let response = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::transport(endpoint, e))?;

        read_body(endpoint, response).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        debug!("POST {}", endpoint);

        let response = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::transport(endpoint, e))?;

        read_body(endpoint, response).await
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn list_batches(&self) -> AppResult<BatchCatalog> {
        let raw: BatchesResponse = self.get_json(BATCHES_ENDPOINT, &[]).await?;
        Ok(raw.into_catalog())
    }

    async fn ask(&self, request: &QueryRequest) -> AppResult<QueryAnswer> {
        let raw: QueryResponse = self.post_json(QUERY_ENDPOINT, request).await?;
        Ok(raw.into())
    }

    async fn alerts(&self, batches: &[String]) -> AppResult<Vec<Alert>> {
        let query = alerts_query(batches);
        let raw: AlertsResponse = self.get_json(ALERTS_ENDPOINT, &query).await?;
        Ok(raw.alerts.into_iter().map(Alert::from).collect())
    }

    async fn search_students(&self, criteria: &FilterCriteria) -> AppResult<Vec<StudentRecord>> {
        let raw: SearchResponse = self
            .get_json(SEARCH_ENDPOINT, &criteria.query_params())
            .await?;
        Ok(raw.results)
    }

    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        self.get_json(STATS_ENDPOINT, &[]).await
    }
}

/// 预警接口的查询参数：`batches=<逗号拼接的文件名>`，空选择时不带参数
pub fn alerts_query(batches: &[String]) -> Vec<(&'static str, String)> {
    if batches.is_empty() {
        Vec::new()
    } else {
        vec![("batches", batches.join(","))]
    }
}

/// 读取响应体
///
/// - 非 2xx：返回 `Remote`，尽量从响应体中提取错误说明
/// - 不是 JSON：返回 `Decode`
/// - 是 JSON 但形状不对：记录警告并返回空默认值
async fn read_body<T>(endpoint: &str, response: reqwest::Response) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::transport(endpoint, e))?;

    if !status.is_success() {
        let message = extract_error_message(&bytes);
        warn!("{} 返回错误状态 {}: {}", endpoint, status.as_u16(), message);
        return Err(AppError::remote(endpoint, status.as_u16(), message));
    }

    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| AppError::decode(endpoint, e))?;

    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("{} 响应结构异常，按空结果处理: {}", endpoint, e);
            Ok(T::default())
        }
    }
}

/// 从错误响应体中提取可读的错误说明
///
/// 依次尝试 `detail`（字符串，或 FastAPI 校验错误数组中的 `msg`）、`message`、`error`，
/// 都没有时退回原始文本
pub fn extract_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for key in ["detail", "message", "error"] {
            match value.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
                Some(Value::Array(items)) => {
                    let msgs: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(Value::as_str))
                        .collect();
                    if !msgs.is_empty() {
                        return msgs.join("; ");
                    }
                }
                _ => {}
            }
        }
    }

    truncate_text(String::from_utf8_lossy(body).trim(), 200)
}
