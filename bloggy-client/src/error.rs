use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the `bloggy-client` library.
pub enum BloggyClientError {
    /// HTTP transport error (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authorization required or rejected (missing/invalid token, not owner).
    #[error("unauthorized")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// Invalid request or business validation error.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for `bloggy-client` operations.
pub type BloggyClientResult<T> = Result<T, BloggyClientError>;

impl BloggyClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
