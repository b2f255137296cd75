//! Error types for the movies API client.
//!
//! # Design
//! `UnexpectedStatusCode` and `MissingCredential` are the two domain errors
//! callers assert on. Transport failures are carried through untouched in
//! `Transport` so the original error (and its source chain) stays visible.
//! Logging errors never leave the logger; `LogError` exists so the logger can
//! report what went wrong.

use std::collections::BTreeSet;

/// Error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the executor and the domain wrappers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The response status is not in the acceptance set.
    #[error("unexpected status code: {status}, expected: {}", format_codes(.allowed))]
    UnexpectedStatusCode { status: u16, allowed: BTreeSet<u16> },

    /// The login response did not carry the token field.
    #[error("credential field `{field}` is missing from the login response")]
    MissingCredential { field: &'static str },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the requested type.
    #[error("response deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while reading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got `{value}`")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{present} is set but {missing} is not")]
    IncompleteCredentials {
        present: &'static str,
        missing: &'static str,
    },
}

/// Failures while formatting a request/response log entry.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("response body is not valid UTF-8: {0}")]
    NonUtf8Body(#[from] std::str::Utf8Error),

    #[error("response body could not be re-encoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("formatting failed: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Renders a status set as `{200, 201}`.
pub(crate) fn format_codes(codes: &BTreeSet<u16>) -> String {
    let joined = codes
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{joined}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_lists_allowed_codes() {
        let err = ApiError::UnexpectedStatusCode {
            status: 404,
            allowed: BTreeSet::from([201, 200]),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status code: 404, expected: {200, 201}"
        );
    }

    #[test]
    fn transport_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::from(Box::new(io) as TransportError);
        assert_eq!(err.to_string(), "refused");
    }
}
