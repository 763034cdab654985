//! 显式状态层
//!
//! 选择集、汇总计算和请求代次追踪都是纯内存状态，不依赖网络，可以单独测试。

pub mod aggregate;
pub mod selection;
pub mod tracker;
pub mod workspace;

pub use aggregate::{aggregate, Aggregate};
pub use selection::SelectionSet;
pub use tracker::{Fetched, OpState, RequestTracker, Ticket};
pub use workspace::{CatalogChange, Workspace};
