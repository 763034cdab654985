pub mod dashboard_client;
pub mod wire;

#[cfg(test)]
pub mod mock;

pub use dashboard_client::{DashboardApi, HttpDashboardClient};
pub use wire::{QueryAnswer, QueryRequest};
