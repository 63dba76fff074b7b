//! Implements AuthPort using grammers Client.
//!
//! Holds a client clone sharing the gateway's session. The token returned by each
//! step is kept until the next step consumes it.

use crate::domain::{DomainError, SignInResult};
use crate::ports::AuthPort;
use async_trait::async_trait;
use grammers_client::Client;
use grammers_client::SignInError;
use grammers_client::client::{LoginToken, PasswordToken};
use tokio::sync::Mutex;

/// Where the login flow currently stands.
enum AuthStage {
    Idle,
    CodeSent(LoginToken),
    PasswordRequired(PasswordToken),
}

/// Auth adapter. Wraps grammers Client for login/2FA.
pub struct GrammersAuthAdapter {
    client: Client,
    stage: Mutex<AuthStage>,
}

impl GrammersAuthAdapter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            stage: Mutex::new(AuthStage::Idle),
        }
    }
}

#[async_trait]
impl AuthPort for GrammersAuthAdapter {
    async fn is_authenticated(&self) -> Result<bool, DomainError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))
    }

    async fn request_login_code(&self, phone: &str, api_hash: &str) -> Result<(), DomainError> {
        let token = self
            .client
            .request_login_code(phone, api_hash)
            .await
            .map_err(|e| DomainError::Auth(format!("request_login_code: {}", e)))?;
        *self.stage.lock().await = AuthStage::CodeSent(token);
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInResult, DomainError> {
        let mut stage = self.stage.lock().await;
        let token = match std::mem::replace(&mut *stage, AuthStage::Idle) {
            AuthStage::CodeSent(token) => token,
            _ => {
                return Err(DomainError::Auth(
                    "request_login_code must be called before sign_in".into(),
                ));
            }
        };
        match self.client.sign_in(&token, code).await {
            Ok(_user) => Ok(SignInResult::Success),
            Err(SignInError::PasswordRequired(pt)) => {
                let hint = pt.hint().map(String::from);
                *stage = AuthStage::PasswordRequired(pt);
                Ok(SignInResult::PasswordRequired { hint })
            }
            Err(SignInError::InvalidCode) => Err(DomainError::Auth(
                "Invalid login code. Run again and enter the correct code.".into(),
            )),
            Err(SignInError::SignUpRequired) => Err(DomainError::Auth(
                "Sign-up required. Create an account with the official Telegram app first.".into(),
            )),
            Err(e) => Err(DomainError::Auth(format!("sign in: {}", e))),
        }
    }

    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError> {
        let token = match std::mem::replace(&mut *self.stage.lock().await, AuthStage::Idle) {
            AuthStage::PasswordRequired(token) => token,
            _ => {
                return Err(DomainError::Auth(
                    "sign_in must return PasswordRequired before check_password".into(),
                ));
            }
        };
        self.client
            .check_password(token, password)
            .await
            .map_err(|e| DomainError::Auth(format!("check_password: {}", e)))?;
        Ok(())
    }
}
