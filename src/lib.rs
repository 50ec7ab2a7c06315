//! Facade crate for the `routr` batch distance router.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the HTTP routing client and CSV table adapters.

#![forbid(unsafe_code)]

pub use routr_core::{
    BatchPipeline, ConfigurationError, Coordinate, DEFAULT_REQUEST_PAUSE, Distance, FixedDelay,
    InputRow, InvalidEnumValue, Method, OutputRow, Payload, Profile, RequestOptions,
    RoutingClient, RoutingError, Service, ServiceEnum, Throttle, TransportError, ValidationError,
};

#[cfg(feature = "http")]
pub use routr_data::routing::{
    BaseUrl, ClientSettings, ContextError, ExecutionContext, HttpRoutingClient,
    HttpRoutingClientConfig,
};

#[cfg(feature = "http")]
pub use routr_data::table::{TableError, read_rows, write_rows};
