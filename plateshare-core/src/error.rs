use thiserror::Error;

/// Errors at the platform boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("no signed-in session")]
    MissingSession,

    #[error("row not found")]
    NotFound,
}

/// Pull a human-readable message out of a platform error body.
///
/// The REST layer reports `{"message": ...}`, the auth layer uses
/// `{"msg": ...}` or `{"error_description": ...}`. Falls back to the raw
/// body, or the status line when the body is empty.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.trim().to_string()
    }
}
