//! 业务能力层
//!
//! 每个服务只负责一种远程操作：发请求、按代次丢弃过期响应、保存最新结果。
//! 服务之间互不调用，联动由 `orchestrator::DashboardSession` 负责。

pub mod alert_service;
pub mod catalog_service;
pub mod query_service;
pub mod search_service;
pub mod stats_service;

pub use alert_service::AlertFetcher;
pub use catalog_service::BatchCatalogService;
pub use query_service::QueryContextBuilder;
pub use search_service::SearchFilter;
pub use stats_service::StatsFetcher;
