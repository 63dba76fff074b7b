//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Chat, DomainError, GroupId, HistoryPage, SignInResult};

/// Telegram API gateway. Resolve groups and page through their history.
#[async_trait::async_trait]
pub trait TgGateway: Send + Sync {
    /// Fetch all dialogs (chats) the user participates in.
    async fn get_dialogs(&self) -> Result<Vec<Chat>, DomainError>;

    /// Resolve a normalized group identifier to a chat.
    ///
    /// Returns `DomainError::GroupNotFound` when nothing matches.
    async fn resolve_group(&self, group: &GroupId) -> Result<Chat, DomainError>;

    /// Fetch one page of history, newest first.
    ///
    /// - `offset_id`: 0 = start from the newest message; N = only messages with id < N
    /// - `limit`: max messages per request
    ///
    /// The page reports its raw size and cursor even when some messages
    /// (service, empty) are not mapped.
    async fn get_history(
        &self,
        chat_id: i64,
        offset_id: i32,
        limit: i32,
    ) -> Result<HistoryPage, DomainError>;
}

/// Auth port. Login / 2FA against the Telegram session.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    async fn is_authenticated(&self) -> Result<bool, DomainError>;

    async fn request_login_code(&self, phone: &str, api_hash: &str) -> Result<(), DomainError>;

    async fn sign_in(&self, code: &str) -> Result<SignInResult, DomainError>;

    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError>;
}

/// Prompt port. Ask the operator for credentials during login.
#[async_trait::async_trait]
pub trait PromptPort: Send + Sync {
    async fn phone_number(&self) -> Result<String, DomainError>;

    async fn login_code(&self) -> Result<String, DomainError>;

    async fn password(&self, hint: Option<&str>) -> Result<String, DomainError>;
}
