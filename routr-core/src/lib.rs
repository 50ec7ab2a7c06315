//! Core domain for `routr`: batch distance computation against a routing
//! service.
//!
//! Responsibilities:
//! - Define the closed sets of routing operations and travel profiles.
//! - Model coordinates, payloads and the rows flowing through a batch.
//! - Abstract the routing backend behind [`RoutingClient`].
//! - Group rows by origin and dispatch one request per destination.
//!
//! Boundaries:
//! - No HTTP, file or environment access; adapters live in `routr-data`.
//!
//! Invariants:
//! - Coordinates are never parsed to numbers.
//! - Clients are immutable; re-scoping produces a new instance.

#![forbid(unsafe_code)]

mod client;
mod coordinate;
mod error;
mod payload;
mod pipeline;
mod response;
mod service;

#[doc(hidden)]
pub mod test_support;

pub use client::RoutingClient;
pub use coordinate::{
    Coordinate, DestinationRecord, Distance, InputRow, OriginGroup, OriginKey, OutputRow,
};
pub use error::{
    ConfigurationError, InvalidEnumValue, RoutingError, TransportError, ValidationError,
};
pub use payload::{COORDINATES, Method, Payload, RequestOptions};
pub use pipeline::{
    BatchPipeline, DEFAULT_REQUEST_PAUSE, FixedDelay, Throttle, flatten_groups, group_by_origin,
};
pub use response::{DISTANCE_DIVISOR, OK_CODE, RouteResponse, interpret_route_response};
pub use service::{EnumInput, Profile, Service, ServiceEnum, resolve};
