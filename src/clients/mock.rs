//! 内存版 `DashboardApi`，仅用于单元测试
//!
//! 每个接口维护一个应答队列：可以预先放入现成结果，也可以放入一个"闸门"，
//! 由测试决定响应何时、以什么结果返回，用来构造乱序到达的场景。

use crate::clients::{DashboardApi, QueryAnswer, QueryRequest};
use crate::error::{AppError, AppResult};
use crate::models::{Alert, BatchCatalog, DashboardStats, FilterCriteria, StudentRecord};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// 接口调用记录
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListBatches,
    Ask(QueryRequest),
    Alerts(Vec<String>),
    Search(Vec<(&'static str, String)>),
    Stats,
}

enum Reply<T> {
    Ready(AppResult<T>),
    Gated(oneshot::Receiver<AppResult<T>>),
}

struct Queue<T>(Mutex<VecDeque<Reply<T>>>);

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T> Queue<T> {
    fn ready(&self, result: AppResult<T>) {
        self.0.lock().unwrap().push_back(Reply::Ready(result));
    }

    fn gate(&self) -> oneshot::Sender<AppResult<T>> {
        let (tx, rx) = oneshot::channel();
        self.0.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }

    async fn next(&self, fallback: impl FnOnce() -> T) -> AppResult<T> {
        let reply = self.0.lock().unwrap().pop_front();
        match reply {
            None => Ok(fallback()),
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AppError::remote("mock", 499, "gate dropped"))),
        }
    }
}

#[derive(Default)]
pub struct MockApi {
    batches: Queue<BatchCatalog>,
    answers: Queue<QueryAnswer>,
    alerts: Queue<Vec<Alert>>,
    search: Queue<Vec<StudentRecord>>,
    stats: Queue<DashboardStats>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batches(&self, result: AppResult<BatchCatalog>) {
        self.batches.ready(result);
    }

    pub fn gate_batches(&self) -> oneshot::Sender<AppResult<BatchCatalog>> {
        self.batches.gate()
    }

    pub fn push_answer(&self, result: AppResult<QueryAnswer>) {
        self.answers.ready(result);
    }

    pub fn gate_answer(&self) -> oneshot::Sender<AppResult<QueryAnswer>> {
        self.answers.gate()
    }

    pub fn push_alerts(&self, result: AppResult<Vec<Alert>>) {
        self.alerts.ready(result);
    }

    pub fn gate_alerts(&self) -> oneshot::Sender<AppResult<Vec<Alert>>> {
        self.alerts.gate()
    }

    pub fn push_search(&self, result: AppResult<Vec<StudentRecord>>) {
        self.search.ready(result);
    }

    pub fn gate_search(&self) -> oneshot::Sender<AppResult<Vec<StudentRecord>>> {
        self.search.gate()
    }

    pub fn push_stats(&self, result: AppResult<DashboardStats>) {
        self.stats.ready(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// 便捷构造：回答文本，不带其他信息
pub fn answer(text: &str) -> QueryAnswer {
    QueryAnswer {
        response: text.to_string(),
        context_stats: None,
        batch_used: None,
        model: None,
        provider: None,
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn list_batches(&self) -> AppResult<BatchCatalog> {
        self.record(Call::ListBatches);
        self.batches.next(BatchCatalog::empty).await
    }

    async fn ask(&self, request: &QueryRequest) -> AppResult<QueryAnswer> {
        self.record(Call::Ask(request.clone()));
        self.answers.next(|| answer("ok")).await
    }

    async fn alerts(&self, batches: &[String]) -> AppResult<Vec<Alert>> {
        self.record(Call::Alerts(batches.to_vec()));
        self.alerts.next(Vec::new).await
    }

    async fn search_students(&self, criteria: &FilterCriteria) -> AppResult<Vec<StudentRecord>> {
        self.record(Call::Search(criteria.query_params()));
        self.search.next(Vec::new).await
    }

    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        self.record(Call::Stats);
        self.stats.next(DashboardStats::default).await
    }
}
