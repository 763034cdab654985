//! 学业预警服务

use crate::clients::DashboardApi;
use crate::error::AppResult;
use crate::models::Alert;
use crate::state::{Fetched, OpState, RequestTracker, SelectionSet};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// 预警拉取器
///
/// 选择集每变化一次就拉取一次；结果整体替换，旧代次的响应直接丢弃
pub struct AlertFetcher {
    api: Arc<dyn DashboardApi>,
    tracker: RequestTracker,
    alerts: RwLock<Vec<Alert>>,
}

impl AlertFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            tracker: RequestTracker::new("学业预警"),
            alerts: RwLock::new(Vec::new()),
        }
    }

    /// 拉取选择集对应的预警
    ///
    /// 空选择集直接得到空列表，不发请求，但仍然领取新代次，
    /// 防止更早发出的请求回来后覆盖掉空状态
    pub async fn fetch(&self, selection: &SelectionSet) -> AppResult<Fetched<Vec<Alert>>> {
        let ticket = self.tracker.issue();

        let result = if selection.is_empty() {
            debug!("选择集为空，跳过预警请求 (代次 {})", ticket.generation());
            Ok(Vec::new())
        } else {
            debug!(
                "拉取预警: {:?} (代次 {})",
                selection.ids(),
                ticket.generation()
            );
            self.api.alerts(selection.ids()).await
        };

        let mut alerts = self.alerts.write().await;
        match self.tracker.finish(ticket, result)? {
            Fetched::Applied(list) => {
                info!("🔔 预警已更新: {} 条", list.len());
                *alerts = list.clone();
                Ok(Fetched::Applied(list))
            }
            Fetched::Superseded => Ok(Fetched::Superseded),
        }
    }

    /// 当前预警（按后端顺序）
    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
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
    use crate::clients::mock::{Call, MockApi};
    use crate::error::AppError;
    use crate::models::{AlertKind, Severity};

    fn alert(title: &str) -> Alert {
        Alert {
            kind: AlertKind::Warning,
            severity: Severity::High,
            title: title.to_string(),
            description: String::new(),
            details: None,
            count: 1,
            action: String::new(),
        }
    }

    fn selection(ids: &[&str]) -> SelectionSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_selection_skips_network() {
        let api = Arc::new(MockApi::new());
        let fetcher = AlertFetcher::new(api.clone());

        let result = fetcher.fetch(&SelectionSet::new()).await.unwrap();

        assert_eq!(result, Fetched::Applied(Vec::new()));
        assert!(api.calls().is_empty());
        assert_eq!(fetcher.state(), OpState::Succeeded);
    }

    #[tokio::test]
    async fn test_sends_selection_in_order() {
        let api = Arc::new(MockApi::new());
        api.push_alerts(Ok(vec![alert("Low CGPA")]));
        let fetcher = AlertFetcher::new(api.clone());

        fetcher.fetch(&selection(&["B", "A"])).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Alerts(vec!["B".to_string(), "A".to_string()])]
        );
        assert_eq!(fetcher.alerts().await[0].title, "Low CGPA");
    }

    #[tokio::test]
    async fn test_empty_selection_overrides_in_flight_request() {
        let api = Arc::new(MockApi::new());
        let gate = api.gate_alerts();
        let fetcher = AlertFetcher::new(api.clone());

        let driver = async {
            tokio::task::yield_now().await;
            gate.send(Ok(vec![alert("stale")])).unwrap();
        };

        let sel_a = selection(&["A"]);
        let sel_empty = SelectionSet::new();
        let (first, second, _) = tokio::join!(
            fetcher.fetch(&sel_a),
            fetcher.fetch(&sel_empty),
            driver
        );

        assert_eq!(first.unwrap(), Fetched::Superseded);
        assert!(second.unwrap().is_applied());
        assert!(fetcher.alerts().await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_alerts() {
        let api = Arc::new(MockApi::new());
        api.push_alerts(Ok(vec![alert("kept")]));
        api.push_alerts(Err(AppError::remote("dashboard/alerts", 500, "boom")));
        let fetcher = AlertFetcher::new(api.clone());

        fetcher.fetch(&selection(&["A"])).await.unwrap();
        assert!(fetcher.fetch(&selection(&["A"])).await.is_err());

        assert_eq!(fetcher.alerts().await.len(), 1);
        assert_eq!(fetcher.state().error(), Some("boom"));
    }
}
