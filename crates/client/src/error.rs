//! Client error types.

use clearline_shared::AppError;
use thiserror::Error;

/// Errors raised while talking to the back-office API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// The request could not be sent or timed out.
    #[error("Request to {url} failed: {message}")]
    Request {
        /// Endpoint URL.
        url: String,
        /// Transport error.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },

    /// The server answered 2xx but reported `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Returns the error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Build(_) => "CLIENT_BUILD_FAILED",
            Self::Request { .. } => "REQUEST_FAILED",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Rejected(_) => "REQUEST_REJECTED",
            Self::Decode(_) => "INVALID_RESPONSE",
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Build(message) => Self::Config(message),
            ClientError::Status { status, message } => Self::from_status(status, message),
            ClientError::Rejected(message) => Self::BusinessRule(message),
            other @ (ClientError::Request { .. } | ClientError::Decode(_)) => {
                Self::ExternalService(other.to_string())
            }
        }
    }
}
