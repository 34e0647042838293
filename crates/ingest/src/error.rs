//! Error types produced by the ingestion client.
//!
//! Every hard failure of [`IngestClient::ingest`](crate::IngestClient::ingest)
//! is an [`IngestError`]. Soft failures (the endpoint answered with a non-200
//! status) are not errors; they come back as
//! [`IngestOutcome::Rejected`](crate::IngestOutcome::Rejected).
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`InvalidResponse`](IngestError::InvalidResponse) | 200 with a body that is not JSON |
//! | [`InvalidCustomerId`](IngestError::InvalidCustomerId) | envelope status `FAILED_PRECONDITION` or `PERMISSION_DENIED` |
//! | [`InvalidEvent`](IngestError::InvalidEvent) | envelope status `INVALID_ARGUMENT` |
//! | [`Unknown`](IngestError::Unknown) | any other envelope status |
//! | [`ConnectionFailure`](IngestError::ConnectionFailure) | endpoint unreachable |
//! | [`Timeout`](IngestError::Timeout) | request timed out |
//! | [`Http`](IngestError::Http) | other transport or HTTP-layer failure |
//! | [`Auth`](IngestError::Auth) | no bearer token could be obtained |
//! | [`Unexpected`](IngestError::Unexpected) | anything else, e.g. a non-empty body without an error envelope |
//! | [`Config`](IngestError::Config) | the client was built from an invalid configuration |
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the ingestion client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("invalid JSON response received from API: {0}")]
    InvalidResponse(String),

    #[error("invalid customer ID provided: {0}")]
    InvalidCustomerId(String),

    #[error("invalid UDM event provided: {0}")]
    InvalidEvent(String),

    /// The endpoint reported a status outside the known taxonomy.
    /// Carries the envelope fields verbatim.
    #[error("status_code: {code}, message: {message}, status: {status}")]
    Unknown {
        code: i64,
        message: String,
        status: String,
    },

    #[error("unable to establish connection with {plugin} while ingesting data; check the region or custom URL: {detail}")]
    ConnectionFailure { plugin: String, detail: String },

    #[error("request timed out while ingesting data: {0}")]
    Timeout(String),

    #[error("HTTP error occurred while ingesting data: {0}")]
    Http(String),

    #[error("unable to obtain an access token: {0}")]
    Auth(String),

    #[error("unexpected error while ingesting data: {0}")]
    Unexpected(String),

    #[error("invalid ingest configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Discriminant of [`IngestError`], handy for metrics labels and matching in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestErrorKind {
    InvalidResponse,
    InvalidCustomerId,
    InvalidEvent,
    Unknown,
    ConnectionFailure,
    Timeout,
    Http,
    Auth,
    Unexpected,
    Config,
}

impl IngestErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IngestErrorKind::InvalidResponse => "invalid_response",
            IngestErrorKind::InvalidCustomerId => "invalid_customer_id",
            IngestErrorKind::InvalidEvent => "invalid_event",
            IngestErrorKind::Unknown => "unknown",
            IngestErrorKind::ConnectionFailure => "connection_failure",
            IngestErrorKind::Timeout => "timeout",
            IngestErrorKind::Http => "http",
            IngestErrorKind::Auth => "auth",
            IngestErrorKind::Unexpected => "unexpected",
            IngestErrorKind::Config => "config",
        }
    }
}

impl IngestError {
    pub fn kind(&self) -> IngestErrorKind {
        match self {
            IngestError::InvalidResponse(_) => IngestErrorKind::InvalidResponse,
            IngestError::InvalidCustomerId(_) => IngestErrorKind::InvalidCustomerId,
            IngestError::InvalidEvent(_) => IngestErrorKind::InvalidEvent,
            IngestError::Unknown { .. } => IngestErrorKind::Unknown,
            IngestError::ConnectionFailure { .. } => IngestErrorKind::ConnectionFailure,
            IngestError::Timeout(_) => IngestErrorKind::Timeout,
            IngestError::Http(_) => IngestErrorKind::Http,
            IngestError::Auth(_) => IngestErrorKind::Auth,
            IngestError::Unexpected(_) => IngestErrorKind::Unexpected,
            IngestError::Config(_) => IngestErrorKind::Config,
        }
    }

    /// True for failures that happened before the endpoint produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            IngestError::ConnectionFailure { .. } | IngestError::Timeout(_) | IngestError::Http(_)
        )
    }

    /// Maps a `reqwest` failure onto the ingestion taxonomy.
    pub(crate) fn from_transport(err: &reqwest::Error, plugin: &str) -> Self {
        if err.is_timeout() {
            IngestError::Timeout(err.to_string())
        } else if err.is_connect() {
            IngestError::ConnectionFailure {
                plugin: plugin.to_string(),
                detail: err.to_string(),
            }
        } else if err.is_request() || err.is_status() || err.is_body() || err.is_redirect() {
            IngestError::Http(err.to_string())
        } else {
            IngestError::Unexpected(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_carries_envelope_verbatim() {
        let err = IngestError::Unknown {
            code: 429,
            message: "Quota exceeded".into(),
            status: "RESOURCE_EXHAUSTED".into(),
        };
        assert_eq!(
            err.to_string(),
            "status_code: 429, message: Quota exceeded, status: RESOURCE_EXHAUSTED"
        );
        assert_eq!(err.kind(), IngestErrorKind::Unknown);
    }

    #[test]
    fn messages_name_the_failure() {
        let err = IngestError::InvalidCustomerId("customer not found".into());
        assert!(err.to_string().contains("invalid customer ID"));
        assert!(err.to_string().contains("customer not found"));

        let err = IngestError::ConnectionFailure {
            plugin: "Chronicle".into(),
            detail: "refused".into(),
        };
        assert!(err.to_string().contains("Chronicle"));
        assert!(err.is_transport());
    }

    #[test]
    fn config_error_converts() {
        let err: IngestError = ConfigError::MissingCustomerId.into();
        assert_eq!(err.kind(), IngestErrorKind::Config);
        assert!(!err.is_transport());
    }

    #[test]
    fn kind_labels_are_snake_case() {
        assert_eq!(IngestErrorKind::InvalidEvent.as_str(), "invalid_event");
        assert_eq!(IngestErrorKind::ConnectionFailure.as_str(), "connection_failure");
    }
}
