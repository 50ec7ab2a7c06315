//! Deterministic test doubles for the routing pipeline.
//!
//! [`StubRoutingClient`] replays scripted responses and records every
//! request and scoping call, so pipeline behaviour can be checked without a
//! routing service. [`CountingThrottle`] counts pauses instead of sleeping.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::client::RoutingClient;
use crate::error::{ConfigurationError, RoutingError, TransportError};
use crate::payload::{Payload, RequestOptions};
use crate::pipeline::Throttle;
use crate::service::{Profile, Service};

/// A request observed by [`StubRoutingClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Scope of the client that issued the request, if it had been scoped.
    pub scope: Option<(Service, Profile)>,
    /// Payload as passed to `call`.
    pub payload: Payload,
    /// Options as passed to `call`.
    pub options: RequestOptions,
}

#[derive(Debug, Default)]
struct StubState {
    responses: VecDeque<Result<Value, RoutingError>>,
    requests: Vec<RecordedRequest>,
    scopes: Vec<(Service, Profile)>,
}

/// Scripted [`RoutingClient`].
///
/// Derived clients share the script and the recordings of their parent.
/// Once the script is exhausted every call fails with a network error.
///
/// # Example
///
/// ```
/// use routr_core::test_support::StubRoutingClient;
/// use routr_core::{Payload, Profile, RequestOptions, RoutingClient, Service};
/// use serde_json::json;
///
/// let client = StubRoutingClient::with_responses([json!({"code": "Ok"})]);
/// let scoped = client.with_service(Service::Route, Profile::Foot)?;
/// let body = scoped.call(&Payload::new(), &RequestOptions::default())?;
/// assert_eq!(body, json!({"code": "Ok"}));
/// assert_eq!(client.requests().len(), 1);
/// # Ok::<(), routr_core::RoutingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubRoutingClient {
    scope: Option<(Service, Profile)>,
    unscopable: Option<String>,
    state: Rc<RefCell<StubState>>,
}

impl StubRoutingClient {
    /// A client replaying `responses` in order.
    #[must_use]
    pub fn with_responses<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let client = Self::default();
        for response in responses {
            client.push_response(response);
        }
        client
    }

    /// A client whose engine refuses service scoping.
    #[must_use]
    pub fn unscopable(engine: impl Into<String>) -> Self {
        Self {
            unscopable: Some(engine.into()),
            ..Self::default()
        }
    }

    /// Queue a successful response body.
    pub fn push_response(&self, body: Value) {
        self.state.borrow_mut().responses.push_back(Ok(body));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: impl Into<RoutingError>) {
        self.state
            .borrow_mut()
            .responses
            .push_back(Err(error.into()));
    }

    /// Requests received so far, across all derived clients.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.borrow().requests.clone()
    }

    /// Every `with_service` call made so far.
    #[must_use]
    pub fn scopes(&self) -> Vec<(Service, Profile)> {
        self.state.borrow().scopes.clone()
    }

    /// Scope of this particular instance.
    #[must_use]
    pub const fn scope(&self) -> Option<(Service, Profile)> {
        self.scope
    }
}

impl RoutingClient for StubRoutingClient {
    fn with_service(&self, service: Service, profile: Profile) -> Result<Self, RoutingError> {
        if let Some(engine) = &self.unscopable {
            return Err(ConfigurationError::UnscopedEngine {
                engine: engine.clone(),
            }
            .into());
        }
        self.state.borrow_mut().scopes.push((service, profile));
        Ok(Self {
            scope: Some((service, profile)),
            unscopable: None,
            state: Rc::clone(&self.state),
        })
    }

    fn call(&self, payload: &Payload, options: &RequestOptions) -> Result<Value, RoutingError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(RecordedRequest {
            scope: self.scope,
            payload: payload.clone(),
            options: options.clone(),
        });
        state.responses.pop_front().unwrap_or_else(|| {
            Err(TransportError::Network {
                url: "stub://routing".to_owned(),
                message: "no scripted response left".to_owned(),
            }
            .into())
        })
    }
}

/// [`Throttle`] that counts pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct CountingThrottle {
    pauses: Cell<usize>,
}

impl CountingThrottle {
    /// Pauses requested so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pauses.get()
    }
}

impl Throttle for CountingThrottle {
    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
    }
}
