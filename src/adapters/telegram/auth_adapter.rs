//! Implements AuthPort using the grammers Client.
//!
//! Holds a client clone sharing the session with the channel gateway.
//! Stores login token and password token between calls for the auth flow.

use crate::domain::{DomainError, SignInResult};
use crate::ports::AuthPort;
use async_trait::async_trait;
use grammers_client::types::{LoginToken, PasswordToken};
use grammers_client::{Client, SignInError};
use tokio::sync::Mutex;

/// Auth adapter. Wraps a grammers Client for login and 2FA.
pub struct GrammersAuthAdapter {
    client: Client,
    /// Token from request_login_code; consumed by sign_in.
    login_token: Mutex<Option<LoginToken>>,
    /// Token from sign_in(PasswordRequired); consumed by check_password.
    password_token: Mutex<Option<PasswordToken>>,
}

impl GrammersAuthAdapter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            login_token: Mutex::new(None),
            password_token: Mutex::new(None),
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

    async fn request_login_code(&self, phone: &str) -> Result<(), DomainError> {
        let token = self
            .client
            .request_login_code(phone)
            .await
            .map_err(|e| DomainError::Auth(format!("request_login_code: {}", e)))?;
        *self.login_token.lock().await = Some(token);
        *self.password_token.lock().await = None;
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInResult, DomainError> {
        let token = self.login_token.lock().await.take().ok_or_else(|| {
            DomainError::Auth("request_login_code must be called before sign_in".into())
        })?;
        match self.client.sign_in(&token, code).await {
            Ok(_user) => Ok(SignInResult::Success),
            Err(SignInError::PasswordRequired(pt)) => {
                let hint = pt.hint().map(String::from);
                *self.password_token.lock().await = Some(pt);
                Ok(SignInResult::PasswordRequired { hint })
            }
            Err(SignInError::InvalidCode) => Err(DomainError::Auth(
                "invalid login code; run again and enter the correct code".into(),
            )),
            Err(SignInError::SignUpRequired { .. }) => Err(DomainError::Auth(
                "sign-up required; create an account with the official Telegram app first".into(),
            )),
            Err(e) => Err(DomainError::Auth(format!("sign in: {}", e))),
        }
    }

    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError> {
        let pt = self.password_token.lock().await.take().ok_or_else(|| {
            DomainError::Auth("sign_in must return PasswordRequired before check_password".into())
        })?;
        match self.client.check_password(pt, password).await {
            Ok(_user) => Ok(()),
            Err(SignInError::InvalidPassword) => {
                Err(DomainError::Auth("invalid 2FA password".into()))
            }
            Err(e) => Err(DomainError::Auth(format!("check_password: {}", e))),
        }
    }
}
