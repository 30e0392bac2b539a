//! The platform client handle.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthApi;
use crate::error::{error_message, ApiError};
use crate::rest::QueryBuilder;
use crate::session::{Session, SessionStore};
use crate::storage::StorageApi;
use crate::transport::{HttpTransport, RestRequest, RestResponse, RestTransport};

/// Configuration for [`PlateshareClient`].
#[derive(Clone)]
pub struct ClientBuilder {
    base_url: Option<String>,
    anon_key: Option<String>,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Environment variables:
    /// - `PLATESHARE_API_URL`: platform base URL
    /// - `PLATESHARE_ANON_KEY`: anonymous API key
    pub fn new() -> Self {
        Self {
            base_url: std::env::var("PLATESHARE_API_URL").ok(),
            anon_key: std::env::var("PLATESHARE_ANON_KEY").ok(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the platform base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the anonymous API key.
    pub fn anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client over the production HTTP transport.
    pub fn build(self) -> Result<PlateshareClient, ApiError> {
        let base_url = self.base_url.ok_or_else(|| {
            ApiError::InvalidRequest("missing base URL (set PLATESHARE_API_URL)".to_string())
        })?;
        let anon_key = self.anon_key.ok_or_else(|| {
            ApiError::InvalidRequest("missing anon key (set PLATESHARE_ANON_KEY)".to_string())
        })?;
        let transport = HttpTransport::new(&base_url, self.timeout)?;
        Ok(PlateshareClient::with_transport(
            Arc::new(transport),
            &base_url,
            &anon_key,
        ))
    }
}

/// Handle to the hosted data platform: relational tables, auth, and
/// object storage under one base URL.
///
/// Constructed explicitly and injected into the services that need it;
/// cloning shares the transport and session.
#[derive(Clone)]
pub struct PlateshareClient {
    transport: Arc<dyn RestTransport>,
    base_url: String,
    anon_key: String,
    session: SessionStore,
}

impl PlateshareClient {
    /// Get a builder for production configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client over an explicit transport. This is the seam tests
    /// use to drive services through a mock.
    pub fn with_transport(
        transport: Arc<dyn RestTransport>,
        base_url: &str,
        anon_key: &str,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: SessionStore::new(),
        }
    }

    /// Start a query against a table.
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    /// The auth API.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// The storage API for one bucket.
    pub fn storage(&self, bucket: &str) -> StorageApi<'_> {
        StorageApi::new(self, bucket)
    }

    /// The current signed-in session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.session.get()
    }

    /// The current session, or [`ApiError::MissingSession`].
    pub fn require_session(&self) -> Result<Session, ApiError> {
        self.session.get().ok_or(ApiError::MissingSession)
    }

    pub(crate) fn session_store(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request with auth headers applied, surfacing non-2xx
    /// responses as [`ApiError::Service`].
    ///
    /// The `apikey` header always carries the anon key; `Authorization`
    /// carries the session's bearer token when signed in (or the anon
    /// key otherwise) unless the request already set one.
    pub(crate) async fn execute(&self, mut request: RestRequest) -> Result<RestResponse, ApiError> {
        request
            .headers
            .push(("apikey".to_string(), self.anon_key.clone()));
        if request.header("authorization").is_none() {
            let token = self
                .session
                .get()
                .map(|s| s.access_token)
                .unwrap_or_else(|| self.anon_key.clone());
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Service {
                status: response.status,
                message: error_message(response.status, &response.body),
            })
        }
    }
}
