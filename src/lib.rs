//! # Batch Insight
//!
//! 学业数据看板的客户端：按批次选择学生数据，汇总统计，拉取学业预警，
//! 并以所选批次为上下文向 AI 提问。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - `DashboardApi` trait 与基于 reqwest 的 `HttpDashboardClient`
//! - `wire` - 后端原始响应结构，所有字段都有默认值
//!
//! ### ② 状态层（State）
//! - `SelectionSet` - 有序选择集，始终是目录的子集
//! - `aggregate` - 选择集汇总（纯函数）
//! - `RequestTracker` - 请求代次，最后发出的请求获胜
//!
//! ### ③ 业务能力层（Services）
//! - `BatchCatalogService` / `AlertFetcher` / `QueryContextBuilder` / `SearchFilter` / `StatsFetcher`
//!
//! ### ④ 编排层（Orchestration）
//! - `DashboardSession` - 持有全部状态，负责选择变化后的联动
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod utils;

// 重新导出常用类型
pub use clients::{DashboardApi, HttpDashboardClient};
pub use config::Config;
pub use error::{AppError, AppResult, ValidationError};
pub use models::{Alert, BatchCatalog, Department, FilterCriteria, QueryMessage};
pub use orchestrator::DashboardSession;
pub use state::{Aggregate, Fetched, OpState, SelectionSet};
