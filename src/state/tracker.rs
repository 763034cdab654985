//! 请求代次追踪
//!
//! 同一个逻辑操作（刷新目录、拉取预警……）可能同时有多个请求在途。
//! 每次发起请求都领取一个单调递增的代次号，响应回来时只有代次号仍是
//! 最新发出的那个才允许落地，其余响应直接丢弃（请求本身不取消）。

use crate::error::AppResult;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

/// 异步操作状态
///
/// `Idle → Pending → {Succeeded | Failed}`，任一终态都可以重新进入 `Pending`。
/// 界面上的"加载中"就是 `Pending`。没有重试状态，重试只能由用户手动触发。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl OpState {
    pub fn is_loading(&self) -> bool {
        matches!(self, OpState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OpState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// 请求代次号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// 异步结果：要么落地，要么因为有更新的请求而被丢弃
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Applied(T),
    Superseded,
}

impl<T> Fetched<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Fetched::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Fetched::Applied(value) => Some(value),
            Fetched::Superseded => None,
        }
    }
}

/// 单个逻辑操作的请求追踪器
#[derive(Debug)]
pub struct RequestTracker {
    name: &'static str,
    issued: AtomicU64,
    state: watch::Sender<OpState>,
}

impl RequestTracker {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(OpState::Idle);
        Self {
            name,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 发起新请求：领取代次号并进入 `Pending`
    pub fn issue(&self) -> Ticket {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(OpState::Pending);
        Ticket(generation)
    }

    /// 该代次是否仍是最新发出的请求
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// 以最新代次结束操作；过期代次不会改变状态
    ///
    /// # 返回
    /// 状态是否被更新
    pub fn settle(&self, ticket: Ticket, outcome: OpState) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state.send_replace(outcome);
        true
    }

    /// 处理一次响应
    ///
    /// - 代次已过期：丢弃结果（成功或失败都一样），状态不变，返回 `Superseded`
    /// - 成功：进入 `Succeeded`，返回 `Applied`
    /// - 失败：进入 `Failed`，错误原样返回
    ///
    /// 调用方应在持有目标状态的写锁时调用，保证"检查代次"和"写入结果"之间没有挂起点。
    pub fn finish<T>(&self, ticket: Ticket, result: AppResult<T>) -> AppResult<Fetched<T>> {
        if !self.is_current(ticket) {
            debug!(
                "{} 响应已过期 (代次 {} < {})，丢弃",
                self.name,
                ticket.0,
                self.issued.load(Ordering::SeqCst)
            );
            return Ok(Fetched::Superseded);
        }

        match result {
            Ok(value) => {
                self.state.send_replace(OpState::Succeeded);
                Ok(Fetched::Applied(value))
            }
            Err(e) => {
                warn!("{} 请求失败: {}", self.name, e);
                self.state.send_replace(OpState::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// 当前状态
    pub fn state(&self) -> OpState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<OpState> {
        self.state.subscribe()
    }
}
