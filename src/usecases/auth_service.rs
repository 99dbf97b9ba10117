//! Interactive login flow: phone -> code -> optional 2FA password.
//!
//! Skipped entirely when the persisted session is already authorized.

use crate::domain::{DomainError, SignInResult};
use crate::ports::AuthPort;
use inquire::{Password, Text};
use std::sync::Arc;
use tracing::{debug, info};

/// Auth service. Drives the login conversation against the auth port.
pub struct AuthService {
    auth: Arc<dyn AuthPort>,
}

impl AuthService {
    pub fn new(auth: Arc<dyn AuthPort>) -> Self {
        Self { auth }
    }

    /// Ensure the session is authorized, prompting interactively when not.
    pub async fn run_auth_flow(&self) -> Result<(), DomainError> {
        if self.auth.is_authenticated().await? {
            debug!("session already authorized");
            return Ok(());
        }
        info!("session not authorized, starting interactive login");

        let phone = Text::new("Phone number (international format):")
            .prompt()
            .map_err(|e| DomainError::Auth(e.to_string()))?;
        self.auth.request_login_code(phone.trim()).await?;

        let code = Text::new("Login code:")
            .prompt()
            .map_err(|e| DomainError::Auth(e.to_string()))?;
        match self.auth.sign_in(code.trim()).await? {
            SignInResult::Success => {}
            SignInResult::PasswordRequired { hint } => {
                let label = match hint.as_deref() {
                    Some(hint) if !hint.is_empty() => format!("2FA password (hint: {hint}):"),
                    _ => "2FA password:".to_string(),
                };
                let password = Password::new(&label)
                    .without_confirmation()
                    .prompt()
                    .map_err(|e| DomainError::Auth(e.to_string()))?;
                self.auth.check_password(password.as_bytes()).await?;
            }
        }

        info!("login successful");
        Ok(())
    }
}
