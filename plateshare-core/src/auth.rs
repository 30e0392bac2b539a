//! Session API: password sign-in, sign-out, password maintenance, and
//! recovery-link adoption.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::PlateshareClient;
use crate::error::ApiError;
use crate::session::{AuthUser, Session};
use crate::transport::{Method, RequestBody, RestRequest};

const AUTH_BASE: &str = "/auth/v1";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth operations, bound to the client's session store.
pub struct AuthApi<'a> {
    client: &'a PlateshareClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a PlateshareClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password. The resulting session becomes
    /// the bearer identity for subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let mut request = RestRequest::new(Method::Post, format!("{}/token", AUTH_BASE));
        request
            .query
            .push(("grant_type".to_string(), "password".to_string()));
        request.body = RequestBody::Json(
            serde_json::to_value(PasswordGrant { email, password })
                .map_err(|e| ApiError::Decode(e.to_string()))?,
        );

        let response = self.client.execute(request).await?;
        let token: TokenResponse =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;

        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        };
        self.client.session_store().set(session.clone());
        tracing::debug!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// Sign out and clear the local session. The session is cleared
    /// even if the remote revocation fails.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let request = RestRequest::new(Method::Post, format!("{}/logout", AUTH_BASE));
        let result = self.client.execute(request).await;
        self.client.session_store().clear();
        result.map(|_| ())
    }

    /// The current signed-in session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.client.current_session()
    }

    /// Set a new password for the signed-in user.
    pub async fn update_password(&self, new_password: &str) -> Result<(), ApiError> {
        self.client.require_session()?;
        let mut request = RestRequest::new(Method::Put, format!("{}/user", AUTH_BASE));
        request.body = RequestBody::Json(json!({ "password": new_password }));
        self.client.execute(request).await?;
        Ok(())
    }

    /// Ask the platform to email a password-reset link pointing back at
    /// `redirect_to`.
    pub async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), ApiError> {
        let mut request = RestRequest::new(Method::Post, format!("{}/recover", AUTH_BASE));
        request
            .query
            .push(("redirect_to".to_string(), redirect_to.to_string()));
        request.body = RequestBody::Json(json!({ "email": email }));
        self.client.execute(request).await?;
        Ok(())
    }

    /// Adopt the tokens carried by a recovery link as the session. The
    /// user identity is fetched with the supplied access token before
    /// anything is stored, so an invalid token leaves the session
    /// untouched.
    pub async fn set_session_from_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<Session, ApiError> {
        let mut request = RestRequest::new(Method::Get, format!("{}/user", AUTH_BASE));
        request.headers.push((
            "Authorization".to_string(),
            format!("Bearer {}", access_token),
        ));
        let response = self.client.execute(request).await?;
        let user: AuthUser =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;

        let session = Session {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(|t| t.to_string()),
            user,
        };
        self.client.session_store().set(session.clone());
        Ok(session)
    }
}
