//! Application use cases. Orchestrate domain logic via ports.

pub mod auth_service;
pub mod export_service;
pub mod stats_service;

pub use auth_service::AuthService;
pub use export_service::ExportService;
pub use stats_service::StatsService;
