pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::item::{ItemPriority, ItemStatus, ItemUpdate, ScheduledItem};
pub use models::report::AdvisoryReport;
pub use models::settings::AdvisorSettings;
pub use services::advisory_service::{analyze, analyze_checked};
