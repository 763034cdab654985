pub mod alert;
pub mod batch;
pub mod department;
pub mod lenient;
pub mod message;
pub mod search;
pub mod stats;

pub use alert::{Alert, AlertKind, Severity};
pub use batch::{Batch, BatchCatalog};
pub use department::Department;
pub use message::{ContextStats, Conversation, QueryMessage, Role};
pub use search::{FilterCriteria, StudentRecord};
pub use stats::DashboardStats;
