//! Adapters for the `routr` batch router.
//!
//! Responsibilities:
//! - Talk HTTP to OSRM-compatible routing services.
//! - Build clients from key-value settings and cache them per caller.
//! - Read input tables and write result tables as CSV.
//!
//! Boundaries:
//! - Do not encode grouping or response rules (live in `routr-core`).
//! - Blocking calls run on a runtime owned by the client, never on the
//!   caller's executor threads.
//!
//! Invariants:
//! - Clients are immutable; derived clients share one connection pool.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod routing;
pub mod table;
