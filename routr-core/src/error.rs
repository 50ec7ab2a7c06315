//! Error taxonomy shared by the routing client and the batch pipeline.
//!
//! Configuration, enumeration and validation failures are fatal and carry
//! the offending input. Transport failures wrap whatever the HTTP layer
//! reported. A response that decodes but lacks a usable route is never an
//! error: it degrades to [`crate::Distance::Unknown`].

use thiserror::Error;

/// An operation or profile name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value provided for {kind}: {value}")]
pub struct InvalidEnumValue {
    /// Name of the enumeration that rejected the input.
    pub kind: &'static str,
    /// The unresolvable input, verbatim.
    pub value: String,
}

/// Malformed request payloads or headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload had no entries at all.
    #[error("payload is required")]
    EmptyPayload,
    /// A mandatory payload entry was absent.
    #[error("'{key}' missing from payload")]
    MissingEntry {
        /// Name of the missing entry.
        key: &'static str,
    },
    /// A payload entry was present but had an unusable shape.
    #[error("'{key}' is malformed: {message}")]
    MalformedEntry {
        /// Name of the offending entry.
        key: String,
        /// What was wrong with it.
        message: String,
    },
    /// A caller-supplied header could not be encoded.
    #[error("invalid header {name:?}: {message}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Reason the header was rejected.
        message: String,
    },
}

/// Invalid or missing client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The base URL lacks a scheme or has nothing after it.
    #[error("urlbase must specify a scheme: {url:?}")]
    MissingScheme {
        /// The rejected base URL.
        url: String,
    },
    /// The base URL is not a valid absolute URL.
    #[error("urlbase {url:?} is not a valid URL: {message}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Parser error description.
        message: String,
    },
    /// A required setting was not supplied.
    #[error("missing required setting `{key}`")]
    MissingSetting {
        /// Setting name.
        key: &'static str,
    },
    /// The configured engine cannot be scoped to a service and profile.
    #[error("{engine} client cannot be scoped to a routing service")]
    UnscopedEngine {
        /// Engine identifier of the client.
        engine: String,
    },
}

/// Failures talking to the remote routing service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The connection failed or was interrupted.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body was not valid JSON.
    #[error("response from {url} could not be decoded: {message}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

/// Umbrella error for routing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// See [`InvalidEnumValue`].
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// See [`TransportError`].
    #[error(transparent)]
    Transport(#[from] TransportError),
}
