pub mod advisory_service;
pub mod conflict_service;
pub mod interval_index;
pub mod redistribution_service;
pub mod schedule_utils;
pub mod settings_service;
pub mod suggestion_service;
pub mod workload_service;
