//! Error types for solrflow operations.
//!
//! The taxonomy separates caller programming errors (configuration,
//! serialization) from remote failures (HTTP status, undecodable
//! payloads). Configuration and serialization errors are raised before
//! any request is sent and are never retried; remote and decode errors
//! carry the status code and the engine's payload so callers can
//! inspect Solr's own error detail.

use thiserror::Error;

/// Result type alias for solrflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building queries or talking to Solr.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid query model configuration: a required field is missing,
    /// mutually exclusive fields collide, or a value is out of range.
    /// Always raised at construction time, before any request.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A parameter value could not be rendered in its declared wire
    /// form. Construction-time validation should make this
    /// unreachable; treat it as an internal invariant violation.
    #[error("cannot serialize parameter `{key}`: {reason}")]
    Serialization {
        /// Wire parameter key that failed to serialize.
        key: String,
        /// Why the value could not be rendered.
        reason: String,
    },

    /// Solr answered with a non-2xx HTTP status.
    #[error("Solr request failed with status {status}: {message}")]
    Remote {
        /// HTTP status code returned by Solr.
        status: u16,
        /// Short description of the failure.
        message: String,
        /// Parsed error body, when Solr returned one.
        body: Option<serde_json::Value>,
    },

    /// The response body could not be decoded into the typed envelope.
    #[error("failed to decode Solr response: {message}")]
    Decode {
        /// What went wrong during decoding.
        message: String,
        /// The payload (or the fragment of it) that failed to decode.
        payload: Option<serde_json::Value>,
    },

    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create a serialization error for a wire key.
    pub fn serialization(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Serialization {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a remote error from an HTTP status and error body.
    pub fn remote(
        status: u16,
        message: impl Into<String>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Error::Remote {
            status,
            message: message.into(),
            body,
        }
    }

    /// Create a decode error, attaching the offending payload.
    pub fn decode(message: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Error::Decode {
            message: message.into(),
            payload,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Error::Network(message.into())
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The Solr payload carried by this error, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Remote { body, .. } => body.as_ref(),
            Error::Decode { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Whether this error was raised locally, before any request.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Serialization { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("rows must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid configuration: rows must be non-negative"
        );
        assert!(err.is_local());
    }

    #[test]
    fn test_remote_error_carries_status_and_body() {
        let body = json!({"error": {"msg": "undefined field foo"}});
        let err = Error::remote(400, "bad request", Some(body.clone()));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.payload(), Some(&body));
        assert!(!err.is_local());
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_decode_error_carries_payload() {
        let payload = json!({"id": 42});
        let err = Error::decode("missing required field `id`", Some(payload.clone()));
        assert_eq!(err.payload(), Some(&payload));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_serialization_error_display() {
        let err = Error::serialization("qf", "weight is not finite");
        assert!(err.to_string().contains("qf"));
        assert!(err.is_local());
    }
}
