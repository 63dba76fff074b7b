//! Handle Login / 2FA flow. Delegates to AuthPort; credentials come from PromptPort.

use crate::domain::{DomainError, SignInResult};
use crate::ports::{AuthPort, PromptPort};
use std::sync::Arc;
use tracing::info;

pub struct AuthService {
    auth: Arc<dyn AuthPort>,
    prompt: Arc<dyn PromptPort>,
    api_hash: String,
    /// Phone number from config; prompted for when absent.
    phone: Option<String>,
}

impl AuthService {
    pub fn new(
        auth: Arc<dyn AuthPort>,
        prompt: Arc<dyn PromptPort>,
        api_hash: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            auth,
            prompt,
            api_hash,
            phone,
        }
    }

    /// Check if we are already authenticated.
    pub async fn is_authenticated(&self) -> Result<bool, DomainError> {
        self.auth.is_authenticated().await
    }

    /// Run full auth flow (phone -> code -> 2FA if needed). No-op when the session is authorized.
    pub async fn run_auth_flow(&self) -> Result<(), DomainError> {
        if self.is_authenticated().await? {
            info!("session already authorized");
            return Ok(());
        }

        let phone = match self.phone.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => self.prompt.phone_number().await?,
        };
        self.auth.request_login_code(&phone, &self.api_hash).await?;
        info!("login code requested");

        let code = self.prompt.login_code().await?;
        match self.auth.sign_in(code.trim()).await? {
            SignInResult::Success => {}
            SignInResult::PasswordRequired { hint } => {
                info!("2FA password required");
                let password = self.prompt.password(hint.as_deref()).await?;
                self.auth.check_password(password.as_bytes()).await?;
            }
        }

        info!("signed in");
        Ok(())
    }
}
