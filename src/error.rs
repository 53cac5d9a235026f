//! Request-path error definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can end a lookup request.
///
/// Cloneable so a coalesced fetch can hand the same outcome to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Upstream answered with a status of 300 or above.
    #[error("upstream rejected the request with status {0}")]
    UpstreamRejected(StatusCode),

    /// Upstream could not be reached or the body could not be read.
    #[error("upstream transport failure: {0}")]
    Transport(String),

    /// Upstream answered 2xx with a body that is not a recordings document.
    #[error("malformed upstream body: {0}")]
    MalformedBody(String),
}

impl ProxyError {
    /// Status code returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamRejected(status) => *status,
            ProxyError::Transport(_) | ProxyError::MalformedBody(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(e.to_string())
    }
}

/// Failed lookups carry no body.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Result type for lookup operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
