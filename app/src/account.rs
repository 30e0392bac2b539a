//! Account flows: sign-in/out, password update, and recovery.

use std::sync::Arc;

use plateshare_core::{PlateshareClient, Session};

use crate::error::AppError;

/// Shortest password the platform accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account operations, validating inputs locally before any remote
/// call.
pub struct AccountService {
    client: Arc<PlateshareClient>,
}

impl AccountService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }
        Ok(self.client.auth().sign_in(email.trim(), password).await?)
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        Ok(self.client.auth().sign_out().await?)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.client.current_session()
    }

    /// Set a new password after local validation: minimum length and a
    /// matching confirmation.
    pub async fn update_password(
        &self,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), AppError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if new_password != confirmation {
            return Err(AppError::validation("Passwords don't match"));
        }
        Ok(self.client.auth().update_password(new_password).await?)
    }

    /// Email a password-reset link that lands on `redirect_to`.
    pub async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AppError> {
        if email.trim().is_empty() {
            return Err(AppError::validation("An email address is required"));
        }
        Ok(self
            .client
            .auth()
            .send_password_reset(email.trim(), redirect_to)
            .await?)
    }

    /// Adopt the tokens from a recovery link as the session so the
    /// password can then be updated. Missing tokens are a local
    /// validation error, not a platform round trip.
    pub async fn adopt_recovery(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Session, AppError> {
        let access_token = access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("Invalid or expired password reset link"))?;
        Ok(self
            .client
            .auth()
            .set_session_from_tokens(access_token, refresh_token)
            .await?)
    }
}
