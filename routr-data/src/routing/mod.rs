//! HTTP routing clients for OSRM-compatible services.
//!
//! This module provides [`HttpRoutingClient`], an implementation of
//! [`routr_core::RoutingClient`] that issues blocking HTTP calls, and the
//! factory pieces that build one from key-value settings.
//!
//! # Architecture
//!
//! The [`routr_core::RoutingClient`] trait is synchronous so the batch
//! pipeline stays free of async machinery. The client bridges to `reqwest`
//! by blocking on a Tokio runtime it owns. An [`ExecutionContext`] holds the
//! settings for one caller and builds the client on first use.
//!
//! # Example
//!
//! ```no_run
//! use routr_core::{COORDINATES, Payload, Profile, RequestOptions, RoutingClient, Service};
//! use routr_data::routing::{ClientSettings, ExecutionContext};
//!
//! let context = ExecutionContext::new(ClientSettings::new("http://localhost:5000"));
//! let client = context.client()?.with_service(Service::Route, Profile::Foot)?;
//! let payload = Payload::new().with(COORDINATES, vec!["13.38,52.51", "13.42,52.50"]);
//! let body = client.call(&payload, &RequestOptions::default())?;
//! println!("{body}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod base_url;
mod client;
mod config;
mod context;
mod osrm;

pub use base_url::BaseUrl;
pub use client::{ClientScope, HttpRoutingClient, OSRM_ENGINE};
pub use config::{ClientBuildError, DEFAULT_USER_AGENT, HttpRoutingClientConfig};
pub use context::{ClientSettings, ContextError, ExecutionContext, build_client};
pub use osrm::{DEFAULT_API_VERSION, OsrmScope};
