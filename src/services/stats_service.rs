//! 看板统计服务

use crate::clients::DashboardApi;
use crate::error::AppResult;
use crate::models::DashboardStats;
use crate::state::{Fetched, OpState, RequestTracker};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// 全量统计（与选择集无关）
pub struct StatsFetcher {
    api: Arc<dyn DashboardApi>,
    tracker: RequestTracker,
    stats: RwLock<Option<DashboardStats>>,
}

impl StatsFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            tracker: RequestTracker::new("看板统计"),
            stats: RwLock::new(None),
        }
    }

    pub async fn refresh(&self) -> AppResult<Fetched<DashboardStats>> {
        let ticket = self.tracker.issue();
        debug!("拉取看板统计 (代次 {})", ticket.generation());

        let result = self.api.dashboard_stats().await;

        let mut stats = self.stats.write().await;
        match self.tracker.finish(ticket, result)? {
            Fetched::Applied(fresh) => {
                info!(
                    "📊 统计已更新: {} 名学生, 平均 CGPA {:.2}",
                    fresh.total_students, fresh.average_cgpa
                );
                *stats = Some(fresh.clone());
                Ok(Fetched::Applied(fresh))
            }
            Fetched::Superseded => Ok(Fetched::Superseded),
        }
    }

    /// 最近一次成功拉取的统计，从未成功时为 `None`
    pub async fn stats(&self) -> Option<DashboardStats> {
        self.stats.read().await.clone()
    }

    pub fn state(&self) -> OpState {
        self.tracker.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<OpState> {
        self.tracker.subscribe()
    }
}
