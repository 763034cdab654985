use chrono::{DateTime, Local};
use serde::Serialize;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// 回答所依据数据的统计信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStats {
    pub total_students: u64,
    pub avg_cgpa: f64,
    /// 涉及的院系数量
    pub departments: u64,
}

/// 对话中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMessage {
    pub role: Role,
    pub content: String,
    pub context_stats: Option<ContextStats>,
    pub provider: Option<String>,
    pub model: Option<String>,
    /// 服务端实际使用的批次
    pub batch_used: Option<String>,
    pub is_error: bool,
    pub created_at: DateTime<Local>,
}

impl QueryMessage {
    /// 用户提问
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            context_stats: None,
            provider: None,
            model: None,
            batch_used: None,
            is_error: false,
            created_at: Local::now(),
        }
    }

    /// 助手回答
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(content)
        }
    }

    /// 请求失败时的助手消息
    pub fn assistant_error(detail: &str) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(format!(
                "Sorry, I encountered an error: {}. Please try again.",
                detail
            ))
        }
    }
}

/// 对话记录
///
/// 只能追加或整体清空，不能修改或删除单条消息
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<QueryMessage>,
}

impl Conversation {
    pub fn push(&mut self, message: QueryMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[QueryMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 最近一次成功回答附带的统计信息
    pub fn last_context(&self) -> Option<&ContextStats> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::Assistant && !m.is_error)
            .find_map(|m| m.context_stats.as_ref())
    }
}
