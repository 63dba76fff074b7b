//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod group_id;
pub mod threading;
pub mod window;

pub use entities::{
    AnalysisResult, Chat, ChatType, DEFAULT_TIMEZONE, DaySummary, DayThread, HistoryPage,
    MediaKind, Message, SignInResult, ThreadMessage,
};
pub use errors::DomainError;
pub use group_id::GroupId;
pub use threading::analyze_messages;
