//! Error types for the posts API client.
//!
//! # Design
//! Three failure classes reach callers: a client that could not be built
//! (`InvalidConfiguration`), a server or transport that said no
//! (`RequestFailed`), and a server that said yes with a body that is not JSON
//! (`MalformedResponse`). `InvalidPayload` covers caller-supplied bodies that
//! cannot be encoded, and `InvalidArgument` identifiers that cannot address a
//! resource. Both are raised before anything is sent.

use crate::transport::TransportError;

/// Errors returned by `PostsClient` construction and operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Base scheme, host, port or root path do not form a usable URL.
    #[error("invalid client configuration: {0}")]
    InvalidConfiguration(String),

    /// The server answered with a non-2xx status, or the transport failed
    /// before any status was received (`status` is `None`).
    #[error("request failed{}: {body}", describe_status(.status))]
    RequestFailed { status: Option<u16>, body: String },

    /// The server answered 2xx but the body is not valid JSON.
    #[error("malformed response body (HTTP {status}): {source}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("request payload could not be serialized: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// An identifier argument would not address a single resource.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server was reached.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            ApiError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404) && matches!(self, ApiError::RequestFailed { .. })
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::RequestFailed {
            status: None,
            body: err.to_string(),
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with HTTP {code}"),
        None => String::new(),
    }
}
