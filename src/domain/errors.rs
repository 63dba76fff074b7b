//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed group identifier. The only input-validation failure; everything else is operational.
    #[error("{0}")]
    InvalidGroupId(String),

    #[error("Telegram gateway error: {0}")]
    TgGateway(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// FloodWait error: caller should retry after `seconds` seconds.
    #[error("FloodWait: retry after {seconds} seconds")]
    FloodWait { seconds: u64 },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl DomainError {
    /// True for errors caused by bad user input rather than a failing collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::InvalidGroupId(_))
    }
}
