//! REST error types

/// Errors returned by the REST API collaborator
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The token was rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request parameters
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the server's size limit
    #[error("Request too large")]
    RequestTooLarge,

    /// The server failed to process the request
    #[error("Server error: {0}")]
    Server(String),

    /// A status this client does not map
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// Connection-level failure (DNS, TLS, timeout, ...)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape
    #[error("Failed to decode response body")]
    Decode(#[source] serde_json::Error),
}

impl RestError {
    /// Map an HTTP status code and body to an error
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::BadRequest(body),
            401 | 403 => Self::Unauthorized(body),
            404 => Self::NotFound(body),
            413 => Self::RequestTooLarge,
            500..=599 => Self::Server(body),
            other => Self::UnexpectedStatus(other),
        }
    }

    /// Whether this error means the credentials are bad
    ///
    /// Authentication failures must never be retried.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
