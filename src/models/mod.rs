pub mod item;
pub mod redistribution;
pub mod report;
pub mod settings;
pub mod suggestion;
pub mod violation;
pub mod workload;
