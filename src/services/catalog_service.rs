//! 批次目录服务 - 业务能力层
//!
//! 只负责"拉取目录并落地"，不关心选择集之后要触发什么

use crate::clients::DashboardApi;
use crate::error::AppResult;
use crate::state::{CatalogChange, Fetched, OpState, RequestTracker, Workspace};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// 批次目录服务
///
/// 多次刷新可能同时在途，只有最后发出的那次会落地
pub struct BatchCatalogService {
    api: Arc<dyn DashboardApi>,
    workspace: Arc<RwLock<Workspace>>,
    tracker: RequestTracker,
}

impl BatchCatalogService {
    pub fn new(api: Arc<dyn DashboardApi>, workspace: Arc<RwLock<Workspace>>) -> Self {
        Self {
            api,
            workspace,
            tracker: RequestTracker::new("批次目录"),
        }
    }

    /// 刷新目录
    ///
    /// 成功时在同一个写锁内替换目录并初始化/裁剪选择集；
    /// 失败时保留旧目录，错误原样返回。
    ///
    /// # 返回
    /// - `Applied(change)`: 本次结果已落地，`change` 描述选择集的变化
    /// - `Superseded`: 期间又发起了新的刷新，本次结果被丢弃
    pub async fn refresh(&self) -> AppResult<Fetched<CatalogChange>> {
        let ticket = self.tracker.issue();
        debug!("刷新批次目录 (代次 {})", ticket.generation());

        let result = self.api.list_batches().await;

        let mut workspace = self.workspace.write().await;
        match self.tracker.finish(ticket, result)? {
            Fetched::Applied(catalog) => {
                info!(
                    "📚 批次目录已更新: {} 个批次, 当前批次 {:?}",
                    catalog.len(),
                    catalog.current_id()
                );
                Ok(Fetched::Applied(workspace.apply_catalog(catalog)))
            }
            Fetched::Superseded => Ok(Fetched::Superseded),
        }
    }

    pub fn state(&self) -> OpState {
        self.tracker.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<OpState> {
        self.tracker.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::MockApi;
    use crate::error::AppError;
    use crate::models::{Batch, BatchCatalog};

    fn catalog(ids: &[&str]) -> BatchCatalog {
        BatchCatalog::new(ids.iter().map(|id| Batch::new(*id, 1)).collect(), None)
    }

    fn service(api: &Arc<MockApi>) -> (BatchCatalogService, Arc<RwLock<Workspace>>) {
        let workspace = Arc::new(RwLock::new(Workspace::new()));
        let service = BatchCatalogService::new(api.clone(), workspace.clone());
        (service, workspace)
    }

    #[tokio::test]
    async fn test_later_refresh_wins_when_answered_first() {
        let api = Arc::new(MockApi::new());
        let first = api.gate_batches();
        let second = api.gate_batches();
        let (service, workspace) = service(&api);

        let driver = async {
            tokio::task::yield_now().await;
            second.send(Ok(catalog(&["R2"]))).unwrap();
            tokio::task::yield_now().await;
            first.send(Ok(catalog(&["R1"]))).unwrap();
        };

        let (r1, r2, _) = tokio::join!(service.refresh(), service.refresh(), driver);

        assert_eq!(r1.unwrap(), Fetched::Superseded);
        assert!(r2.unwrap().is_applied());
        let ids: Vec<String> = workspace.read().await.catalog().ids().map(String::from).collect();
        assert_eq!(ids, vec!["R2".to_string()]);
        assert_eq!(service.state(), OpState::Succeeded);
    }

    #[tokio::test]
    async fn test_stale_failure_is_ignored() {
        let api = Arc::new(MockApi::new());
        let first = api.gate_batches();
        let second = api.gate_batches();
        let (service, workspace) = service(&api);

        let driver = async {
            tokio::task::yield_now().await;
            second.send(Ok(catalog(&["A"]))).unwrap();
            tokio::task::yield_now().await;
            first
                .send(Err(AppError::remote("batches/all", 500, "late failure")))
                .unwrap();
        };

        let (r1, r2, _) = tokio::join!(service.refresh(), service.refresh(), driver);

        assert_eq!(r1.unwrap(), Fetched::Superseded);
        assert!(r2.is_ok());
        assert_eq!(workspace.read().await.catalog().len(), 1);
        assert_eq!(service.state(), OpState::Succeeded);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_catalog() {
        let api = Arc::new(MockApi::new());
        api.push_batches(Ok(catalog(&["A", "B"])));
        api.push_batches(Err(AppError::remote("batches/all", 500, "db offline")));
        let (service, workspace) = service(&api);

        service.refresh().await.unwrap();
        let err = service.refresh().await.unwrap_err();

        assert_eq!(err.user_message(), "db offline");
        assert_eq!(service.state(), OpState::Failed("db offline".to_string()));
        let ws = workspace.read().await;
        assert_eq!(ws.catalog().len(), 2);
        assert_eq!(ws.selection().ids(), &["B".to_string()]);
    }
}
