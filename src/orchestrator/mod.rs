//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::DashboardSession (联动：目录 → 选择集 → 预警 / 问答)
//!     ↓
//! services (能力层：catalog / alert / query / search / stats)
//!     ↓
//! state (显式状态：Workspace / SelectionSet / RequestTracker)
//!     ↓
//! clients (DashboardApi：HTTP 或测试用内存实现)
//! ```
//!
//! ## 设计原则
//!
//! 1. **唯一写入方**：只有会话修改目录和选择集
//! 2. **向下依赖**：编排层 → services → state / clients
//! 3. **锁不跨网络调用**：写锁只在落地结果时短暂持有

pub mod session;

pub use session::DashboardSession;
