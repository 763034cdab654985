//! 学生搜索服务

use crate::clients::DashboardApi;
use crate::error::AppResult;
use crate::models::{FilterCriteria, StudentRecord};
use crate::state::{Fetched, OpState, RequestTracker};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// 学生搜索
///
/// 与批次选择无关，只按过滤条件查询
pub struct SearchFilter {
    api: Arc<dyn DashboardApi>,
    tracker: RequestTracker,
    results: RwLock<Vec<StudentRecord>>,
}

impl SearchFilter {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            tracker: RequestTracker::new("学生搜索"),
            results: RwLock::new(Vec::new()),
        }
    }

    /// 按条件搜索
    ///
    /// 条件先在本地校验，不合法时直接返回 `Validation` 错误，不发请求
    pub async fn search(&self, criteria: &FilterCriteria) -> AppResult<Fetched<Vec<StudentRecord>>> {
        criteria.validate()?;

        let ticket = self.tracker.issue();
        debug!(
            "搜索学生: {:?} (代次 {})",
            criteria.query_params(),
            ticket.generation()
        );

        let result = self.api.search_students(criteria).await;

        let mut results = self.results.write().await;
        match self.tracker.finish(ticket, result)? {
            Fetched::Applied(records) => {
                info!("🔍 搜索完成: {} 名学生", records.len());
                *results = records.clone();
                Ok(Fetched::Applied(records))
            }
            Fetched::Superseded => Ok(Fetched::Superseded),
        }
    }

    pub async fn results(&self) -> Vec<StudentRecord> {
        self.results.read().await.clone()
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
    use crate::models::Department;

    fn student(name: &str) -> StudentRecord {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "roll_number": "CS001",
            "cgpa": "8.5",
            "department": "Computer Science"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_only_non_default_params() {
        let api = Arc::new(MockApi::new());
        api.push_search(Ok(vec![student("Asha")]));
        let filter = SearchFilter::new(api.clone());

        let criteria = FilterCriteria::new().with_cgpa_range(6.0, 8.0).unwrap();
        filter.search(&criteria).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Search(vec![
                ("min_cgpa", "6.0".to_string()),
                ("max_cgpa", "8.0".to_string()),
            ])]
        );
        assert_eq!(filter.results().await[0].cgpa, Some(8.5));
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        let api = Arc::new(MockApi::new());
        let first = api.gate_search();
        let second = api.gate_search();
        let filter = SearchFilter::new(api.clone());

        let old = FilterCriteria::new().with_query("a");
        let new = FilterCriteria::new()
            .with_query("asha")
            .with_department(Some(Department::ComputerScience));

        let driver = async {
            tokio::task::yield_now().await;
            second.send(Ok(vec![student("Asha")])).unwrap();
            tokio::task::yield_now().await;
            first
                .send(Ok(vec![student("Arun"), student("Asha")]))
                .unwrap();
        };

        let (r1, r2, _) = tokio::join!(filter.search(&old), filter.search(&new), driver);

        assert_eq!(r1.unwrap(), Fetched::Superseded);
        assert!(r2.unwrap().is_applied());
        let names: Vec<String> = filter.results().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Asha"]);
    }
}
