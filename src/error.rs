//! Error types for the Mailgun client.

use crate::connection::StatusFamily;

/// Errors that can occur during Mailgun operations.
///
/// Remote failures of operations that answer yes/no are reported as `Ok(false)`
/// and remote failures of lookups as `Ok(None)`; only operations with no such
/// channel use [`Error::Unsuccessful`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An email address is not a valid RFC 5322 mailbox.
    #[error("invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Account settings are missing or incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// Account settings could not be read or deserialized.
    #[error("failed to load account settings: {0}")]
    Settings(#[from] config::ConfigError),

    /// A request was invoked before `configure_request` was called.
    #[error("must configure request before invoking (uri: {uri}, target: {target})")]
    Unconfigured { uri: String, target: String },

    /// Member vars could not be converted into the requested type.
    #[error("member vars do not convert to {vars_type}: {source}")]
    VarsType {
        vars_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The account's base URI is not a usable URL.
    #[error("invalid base URI {base_uri:?}: {reason}")]
    BaseUri { base_uri: String, reason: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-2xx status.
    #[error("{operation} was not successful ({family})")]
    Unsuccessful {
        operation: &'static str,
        family: StatusFamily,
    },

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
