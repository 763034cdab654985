//! AI 问答服务
//!
//! 把用户问题和当前选择集打包成一次查询，并维护对话记录

use crate::clients::{DashboardApi, QueryAnswer, QueryRequest};
use crate::error::{AppResult, ValidationError};
use crate::models::{ContextStats, Conversation, QueryMessage};
use crate::state::{OpState, RequestTracker, SelectionSet};
use crate::utils::truncate_text;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

/// 空对话时给出的示例问题
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What is the average CGPA of all students?",
    "How many students are in the Computer Science department?",
    "Who are the top 5 performers?",
    "What's the CGPA distribution across departments?",
    "Show me students with CGPA above 8.5",
];

/// 问答上下文构建器
///
/// 同一个对话内的提问串行执行：上一问的"问题 + 回答"都写入对话之后，
/// 下一问才会发出。`clear()` 之后到达的旧回答会被丢弃。
pub struct QueryContextBuilder {
    api: Arc<dyn DashboardApi>,
    tracker: RequestTracker,
    conversation: RwLock<Conversation>,
    /// 每次清空对话加一
    epoch: AtomicU64,
    submit_lock: Mutex<()>,
}

impl QueryContextBuilder {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            tracker: RequestTracker::new("AI 问答"),
            conversation: RwLock::new(Conversation::default()),
            epoch: AtomicU64::new(0),
            submit_lock: Mutex::new(()),
        }
    }

    /// 提交问题
    ///
    /// # 参数
    /// - `text`: 用户输入，前后空白会被去掉
    /// - `selection`: 作为上下文的批次（调用时的快照）
    ///
    /// # 返回
    /// - 空问题或空选择集：`Validation` 错误，不发请求也不写对话
    /// - 否则返回写入对话的助手消息；后端出错时是 `is_error == true` 的错误消息
    pub async fn submit(&self, text: &str, selection: &SelectionSet) -> AppResult<QueryMessage> {
        let query = text.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let _turn = self.submit_lock.lock().await;

        let epoch = {
            let mut conversation = self.conversation.write().await;
            conversation.push(QueryMessage::user(query));
            self.epoch.load(Ordering::SeqCst)
        };

        let request = QueryRequest {
            query: query.to_string(),
            batches: selection.to_vec(),
        };
        let ticket = self.tracker.issue();
        info!(
            "💬 提问: {} (批次: {:?})",
            truncate_text(query, 60),
            request.batches
        );

        let reply = match self.api.ask(&request).await {
            Ok(answer) => {
                self.tracker.settle(ticket, OpState::Succeeded);
                debug!("回答长度: {} 字符", answer.response.len());
                answer_message(answer)
            }
            Err(e) => {
                warn!("❌ 提问失败: {}", e);
                let detail = e.user_message();
                self.tracker.settle(ticket, OpState::Failed(detail.clone()));
                QueryMessage::assistant_error(&detail)
            }
        };

        let mut conversation = self.conversation.write().await;
        if self.epoch.load(Ordering::SeqCst) == epoch {
            conversation.push(reply.clone());
        } else {
            debug!("对话已被清空，丢弃旧回答");
        }

        Ok(reply)
    }

    /// 清空对话
    pub async fn clear(&self) {
        let mut conversation = self.conversation.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        conversation.clear();
        info!("🗑️ 对话已清空");
    }

    pub async fn messages(&self) -> Vec<QueryMessage> {
        self.conversation.read().await.messages().to_vec()
    }

    /// 最近一次成功回答的上下文统计
    pub async fn last_context(&self) -> Option<ContextStats> {
        self.conversation.read().await.last_context().cloned()
    }

    pub fn suggested_questions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    pub fn state(&self) -> OpState {
        self.tracker.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<OpState> {
        self.tracker.subscribe()
    }
}

fn answer_message(answer: QueryAnswer) -> QueryMessage {
    QueryMessage {
        context_stats: answer.context_stats,
        provider: answer.provider,
        model: answer.model,
        batch_used: answer.batch_used,
        ..QueryMessage::assistant(answer.response)
    }
}
