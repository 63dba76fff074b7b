//! Application use cases. Orchestrate domain logic via ports.

pub mod analyzer_service;
pub mod auth_service;
pub mod history_service;

pub use analyzer_service::AnalyzerService;
pub use auth_service::AuthService;
pub use history_service::HistoryService;
