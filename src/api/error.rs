// ABOUTME: Transport-level error types for control-plane requests.
// ABOUTME: Classifies failures at the source so callers match on kinds, not messages.

use reqwest::StatusCode;

use super::models::ErrorBody;

/// Errors returned by the REST client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 401. The body format differs from other errors and is ignored.
    #[error("not authenticated")]
    Unauthenticated,

    /// HTTP 404 outside the set of accepted statuses.
    #[error("{message}")]
    NotFound { message: String },

    /// Any other unexpected status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("failed to parse error response body. Response body: {body}")]
    UnparseableError { status: u16, body: String },

    #[error("failed to parse response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network failure or client misconfiguration.
    Transport,
    /// Credentials were rejected.
    Unauthenticated,
    /// The addressed resource does not exist.
    NotFound,
    /// The control plane rejected the request.
    Remote,
    /// A body could not be encoded or decoded.
    Malformed,
}

impl ApiError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Transport { .. } | ApiError::Client(_) => ApiErrorKind::Transport,
            ApiError::Unauthenticated => ApiErrorKind::Unauthenticated,
            ApiError::NotFound { .. } => ApiErrorKind::NotFound,
            ApiError::UnparseableError { status, .. } if *status == 404 => ApiErrorKind::NotFound,
            ApiError::Remote { .. } | ApiError::UnparseableError { .. } => ApiErrorKind::Remote,
            ApiError::Decode(_) | ApiError::Encode(_) => ApiErrorKind::Malformed,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ApiErrorKind::NotFound
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Remote { status, .. } | ApiError::UnparseableError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Map an unexpected response to a typed error.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthenticated;
    }

    let parsed: ErrorBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => {
            return ApiError::UnparseableError {
                status: status.as_u16(),
                body: body.to_string(),
            };
        }
    };

    let message = parsed.message();
    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound { message }
    } else {
        ApiError::Remote {
            status: status.as_u16(),
            message,
        }
    }
}
