use plateshare_core::ApiError;
use thiserror::Error;

/// Application-layer error taxonomy. Every service call surfaces one of
/// these; nothing is retried automatically.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caught before any remote call; surfaced inline next to the input.
    #[error("{0}")]
    Validation(String),

    /// An authenticated action was attempted without a session. No
    /// network call was made; the caller should prompt for sign-in.
    #[error("sign in required")]
    SignInRequired,

    /// The requested entity is absent or not public.
    #[error("not found")]
    NotFound,

    /// Anything that went wrong at the platform boundary.
    #[error(transparent)]
    Platform(ApiError),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => AppError::NotFound,
            ApiError::MissingSession => AppError::SignInRequired,
            other => AppError::Platform(other),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}
