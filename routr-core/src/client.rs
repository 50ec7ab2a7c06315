//! Abstraction over a routing backend.

use serde_json::Value;

use crate::error::RoutingError;
use crate::payload::{Payload, RequestOptions};
use crate::service::{Profile, Service};

/// A client able to issue routing calls and to derive re-scoped copies of
/// itself.
///
/// Implementations are immutable: [`RoutingClient::with_service`] returns a
/// new value and leaves `self` untouched, so a shared client can be
/// re-scoped freely.
pub trait RoutingClient {
    /// Derive a client for `service` and `profile`, sharing this client's
    /// base URL and API key.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Configuration`] when the backend cannot be
    /// scoped this way.
    fn with_service(&self, service: Service, profile: Profile) -> Result<Self, RoutingError>
    where
        Self: Sized;

    /// Perform one call and return the decoded response body.
    ///
    /// The body is returned uninterpreted; deciding whether it carries a
    /// usable answer is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Validation`] for malformed payloads and
    /// [`RoutingError::Transport`] when the service cannot be reached, answers
    /// with a non-success status, or returns a body that is not JSON.
    fn call(&self, payload: &Payload, options: &RequestOptions) -> Result<Value, RoutingError>;
}
