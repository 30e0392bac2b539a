//! REST transport trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::error::ApiError;

/// HTTP method of a platform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request body shapes the platform accepts.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Bytes { data: Vec<u8>, content_type: String },
}

/// A platform request, addressed relative to the base URL.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    /// Path under the base URL, e.g. "/rest/v1/recipes".
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Look up a query parameter by name (first match).
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name, case-insensitively (first match).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A platform response. Bodies are small JSON documents, kept as text
/// until the caller decodes them against its expected schema.
#[derive(Debug, Clone)]
pub struct RestResponse {
    pub status: u16,
    pub body: String,
    /// The Content-Range header, carrying the exact total when the
    /// request asked for one ("0-11/123" or "*/123").
    pub content_range: Option<String>,
}

impl RestResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for the wire layer, enabling mockability in tests.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Execute a request and return the raw response. Non-2xx statuses
    /// are returned as responses, not errors; the client layer decides
    /// how to surface them.
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, ApiError>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport for the given platform base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL: {}", e)))?;
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner, base_url })
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, ApiError> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path: {}", e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Bytes { data, content_type } => {
                builder.header("Content-Type", content_type).body(data)
            }
        };

        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            "platform request"
        );
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        tracing::debug!(path = %request.path, status, "platform response");
        Ok(RestResponse {
            status,
            body,
            content_range,
        })
    }
}

/// Canned response for [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_range: Option<String>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// A 200 response with the given JSON body.
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            content_range: None,
            delay: None,
        }
    }

    /// A 200 row-set response carrying an exact total in Content-Range.
    pub fn rows_with_total(rows: serde_json::Value, total: u64) -> Self {
        let len = rows.as_array().map(|a| a.len()).unwrap_or(0);
        let range = if len == 0 {
            format!("*/{}", total)
        } else {
            format!("0-{}/{}", len - 1, total)
        };
        let mut response = Self::json(rows);
        response.content_range = Some(range);
        response
    }

    /// A count-only response ("*/total", empty body) as returned for
    /// HEAD requests with `Prefer: count=exact`.
    pub fn count(total: u64) -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_range: Some(format!("*/{}", total)),
            delay: None,
        }
    }

    /// An empty-body success response (deletes, logouts).
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
            content_range: None,
            delay: None,
        }
    }

    /// An error response in the platform's `{"message": ...}` shape.
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "message": message }).to_string(),
            content_range: None,
            delay: None,
        }
    }

    /// Delay delivery, for tests that need an in-flight window.
    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }
}

type RouteKey = (Method, String);

/// Mock transport for testing.
///
/// Responses are registered per (method, path) route and consumed in
/// order; the last response registered for a route is repeated if more
/// requests arrive. Every executed request is recorded for assertions.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<RouteKey, Vec<MockResponse>>>,
    log: Mutex<Vec<RestRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for a route. Calling again for the same route
    /// queues the response after the ones already registered.
    pub fn with_response(self, method: Method, path: &str, response: MockResponse) -> Self {
        self.push_response(method, path, response);
        self
    }

    /// Non-consuming form of [`Self::with_response`].
    pub fn push_response(&self, method: Method, path: &str, response: MockResponse) {
        let mut routes = self.routes.lock().expect("mock routes lock");
        routes
            .entry((method, path.to_string()))
            .or_default()
            .push(response);
    }

    /// All requests executed so far, in order.
    pub fn requests(&self) -> Vec<RestRequest> {
        self.log.lock().expect("mock log lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().expect("mock log lock").len()
    }

    fn next_response(&self, method: Method, path: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().expect("mock routes lock");
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

#[async_trait]
impl RestTransport for MockTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, ApiError> {
        let response = self.next_response(request.method, &request.path);
        self.log.lock().expect("mock log lock").push(request.clone());

        let Some(response) = response else {
            return Err(ApiError::InvalidRequest(format!(
                "no mock response for {} {}",
                request.method.as_str(),
                request.path
            )));
        };
        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(RestResponse {
            status: response.status,
            body: response.body,
            content_range: response.content_range,
        })
    }
}
