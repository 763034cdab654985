//! 看板会话 - 编排层
//!
//! ## 职责
//!
//! 持有全部状态和服务，是唯一可以修改批次目录和选择集的地方。
//!
//! ## 联动规则
//!
//! 1. **目录刷新**：落地后初始化或裁剪选择集，然后重新拉取预警
//! 2. **选择变化**：切换 / 全选 / 全不选真正改变了选择集时，重新拉取预警
//! 3. **提问**：以调用时的选择集快照作为上下文
//!
//! 搜索和统计与选择集无关，只是转发给对应服务。

use crate::clients::{DashboardApi, HttpDashboardClient};
use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::models::{
    Alert, BatchCatalog, ContextStats, DashboardStats, FilterCriteria, QueryMessage, StudentRecord,
};
use crate::services::{
    AlertFetcher, BatchCatalogService, QueryContextBuilder, SearchFilter, StatsFetcher,
};
use crate::state::{Aggregate, CatalogChange, Fetched, SelectionSet, Workspace};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 看板会话
pub struct DashboardSession {
    workspace: Arc<RwLock<Workspace>>,
    catalog: BatchCatalogService,
    alerts: AlertFetcher,
    query: QueryContextBuilder,
    search: SearchFilter,
    stats: StatsFetcher,
}

impl DashboardSession {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        let workspace = Arc::new(RwLock::new(Workspace::new()));
        Self {
            catalog: BatchCatalogService::new(api.clone(), workspace.clone()),
            alerts: AlertFetcher::new(api.clone()),
            query: QueryContextBuilder::new(api.clone()),
            search: SearchFilter::new(api.clone()),
            stats: StatsFetcher::new(api),
            workspace,
        }
    }

    /// 使用 HTTP 客户端创建会话
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = HttpDashboardClient::new(config)?;
        debug!("后端地址: {}", client.base_url());
        Ok(Self::new(Arc::new(client)))
    }

    // ========== 批次目录 / 选择集 ==========

    /// 刷新批次目录
    ///
    /// 目录落地后总会重新拉取一次预警（目录变化可能影响预警内容）。
    /// 预警失败只记录在预警服务的状态里，不影响本次刷新的结果。
    pub async fn refresh_catalog(&self) -> AppResult<Fetched<CatalogChange>> {
        let outcome = self.catalog.refresh().await?;
        if outcome.is_applied() {
            self.refetch_alerts().await;
        }
        Ok(outcome)
    }

    /// 切换批次的选中状态
    ///
    /// # 返回
    /// 选择集是否发生变化（不在目录中的批次不会改变选择集）
    pub async fn toggle(&self, id: &str) -> bool {
        let changed = self.workspace.write().await.toggle(id);
        self.after_selection_change(changed).await
    }

    pub async fn select_all(&self) -> bool {
        let changed = self.workspace.write().await.select_all();
        self.after_selection_change(changed).await
    }

    pub async fn deselect_all(&self) -> bool {
        let changed = self.workspace.write().await.deselect_all();
        self.after_selection_change(changed).await
    }

    /// 只选中给定批次，目录之外的批次被忽略
    pub async fn select_only(&self, ids: &[String]) -> bool {
        let changed = self.workspace.write().await.select_only(ids);
        self.after_selection_change(changed).await
    }

    async fn after_selection_change(&self, changed: bool) -> bool {
        if changed {
            debug!("选择集已变化: {:?}", self.selection().await.ids());
            self.refetch_alerts().await;
        }
        changed
    }

    async fn refetch_alerts(&self) {
        if let Err(e) = self.refresh_alerts().await {
            warn!("⚠️ 预警刷新失败: {}", e.user_message());
        }
    }

    pub async fn catalog(&self) -> BatchCatalog {
        self.workspace.read().await.catalog().clone()
    }

    pub async fn selection(&self) -> SelectionSet {
        self.workspace.read().await.selection().clone()
    }

    /// 当前选择集的汇总（每次重新计算）
    pub async fn aggregate(&self) -> Aggregate {
        self.workspace.read().await.aggregate()
    }

    // ========== 预警 ==========

    pub async fn refresh_alerts(&self) -> AppResult<Fetched<Vec<Alert>>> {
        let selection = self.selection().await;
        self.alerts.fetch(&selection).await
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.alerts().await
    }

    // ========== AI 问答 ==========

    /// 以当前选择集为上下文提问
    pub async fn ask(&self, text: &str) -> AppResult<QueryMessage> {
        let selection = self.selection().await;
        self.query.submit(text, &selection).await
    }

    pub async fn clear_conversation(&self) {
        self.query.clear().await;
    }

    pub async fn conversation(&self) -> Vec<QueryMessage> {
        self.query.messages().await
    }

    pub async fn last_context(&self) -> Option<ContextStats> {
        self.query.last_context().await
    }

    // ========== 搜索 / 统计 ==========

    pub async fn search(&self, criteria: &FilterCriteria) -> AppResult<Fetched<Vec<StudentRecord>>> {
        self.search.search(criteria).await
    }

    pub async fn search_results(&self) -> Vec<StudentRecord> {
        self.search.results().await
    }

    pub async fn refresh_stats(&self) -> AppResult<Fetched<DashboardStats>> {
        self.stats.refresh().await
    }

    pub async fn stats(&self) -> Option<DashboardStats> {
        self.stats.stats().await
    }

    /// 首屏加载：目录（含随后的预警）与统计并发拉取
    ///
    /// 两者互不依赖，任何一个失败都只记录在各自服务的状态里
    pub async fn load_dashboard(&self) {
        let (catalog, stats) = futures::join!(self.refresh_catalog(), self.refresh_stats());
        if let Err(e) = catalog {
            warn!("⚠️ 批次目录加载失败: {}", e.user_message());
        }
        if let Err(e) = stats {
            warn!("⚠️ 看板统计加载失败: {}", e.user_message());
        }
    }

    // ========== 各操作的状态 ==========

    pub fn catalog_service(&self) -> &BatchCatalogService {
        &self.catalog
    }

    pub fn alert_fetcher(&self) -> &AlertFetcher {
        &self.alerts
    }

    pub fn query_builder(&self) -> &QueryContextBuilder {
        &self.query
    }

    pub fn search_filter(&self) -> &SearchFilter {
        &self.search
    }

    pub fn stats_fetcher(&self) -> &StatsFetcher {
        &self.stats
    }
}
