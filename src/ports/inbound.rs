//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Pick a group (or use `preset`), analyse it and print the digest.
    async fn run(&self, preset: Option<String>) -> Result<(), DomainError>;
}
