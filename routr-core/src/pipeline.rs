//! Batch computation of origin/destination distances.
//!
//! Rows are grouped by origin, preserving first-seen order, then each
//! destination is sent to the route service one request at a time. A
//! [`Throttle`] pauses after every request to respect the service's rate
//! limit. Transport and validation failures abort the batch; unusable
//! responses degrade to [`Distance::Unknown`] for that destination only.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::client::RoutingClient;
use crate::coordinate::{Distance, InputRow, OriginGroup, OriginKey, OutputRow};
use crate::error::RoutingError;
use crate::payload::{COORDINATES, Payload, RequestOptions};
use crate::response::RouteResponse;
use crate::service::{Profile, Service};

/// Pause between consecutive route requests.
pub const DEFAULT_REQUEST_PAUSE: Duration = Duration::from_secs(10);

/// Blocks the calling thread between requests.
pub trait Throttle {
    /// Wait before the next request may be issued.
    fn pause(&self);
}

impl<T: Throttle + ?Sized> Throttle for &T {
    fn pause(&self) {
        (**self).pause();
    }
}

/// Sleeps for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// A throttle sleeping for `delay` after each request.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The configured interval.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_PAUSE)
    }
}

impl Throttle for FixedDelay {
    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Group destinations by origin.
///
/// Groups appear in the order their origin was first seen; destinations
/// keep input order within a group.
///
/// # Examples
///
/// ```
/// use routr_core::{Coordinate, InputRow, group_by_origin};
///
/// let row = |o: (&str, &str), d: (&str, &str)| InputRow {
///     origin_long: o.0.into(),
///     origin_lat: o.1.into(),
///     dest_long: d.0.into(),
///     dest_lat: d.1.into(),
/// };
/// let groups = group_by_origin([
///     row(("10", "20"), ("11", "21")),
///     row(("30", "40"), ("31", "41")),
///     row(("10", "20"), ("12", "22")),
/// ]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].origin, Coordinate::new("10", "20"));
/// assert_eq!(groups[0].destinations.len(), 2);
/// ```
pub fn group_by_origin<I>(rows: I) -> Vec<OriginGroup>
where
    I: IntoIterator<Item = InputRow>,
{
    let mut positions: HashMap<OriginKey, usize> = HashMap::new();
    let mut groups: Vec<OriginGroup> = Vec::new();
    for row in rows {
        let (origin, destination) = row.into_parts();
        match positions.get(&origin) {
            Some(&position) => groups[position].destinations.push(destination),
            None => {
                positions.insert(origin.clone(), groups.len());
                groups.push(OriginGroup {
                    origin,
                    destinations: vec![destination],
                });
            }
        }
    }
    groups
}

/// Flatten processed groups into output rows, group by group.
#[must_use]
pub fn flatten_groups(groups: &[OriginGroup]) -> Vec<OutputRow> {
    groups
        .iter()
        .flat_map(|group| {
            group
                .destinations
                .iter()
                .map(|destination| OutputRow::new(&group.origin, destination))
        })
        .collect()
}

/// Sequential distance computation over a shared routing client.
#[derive(Debug)]
pub struct BatchPipeline<'a, C, T = FixedDelay> {
    client: &'a C,
    throttle: T,
}

impl<'a, C: RoutingClient> BatchPipeline<'a, C> {
    /// A pipeline pausing [`DEFAULT_REQUEST_PAUSE`] between requests.
    #[must_use]
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            throttle: FixedDelay::default(),
        }
    }
}

impl<'a, C: RoutingClient, T: Throttle> BatchPipeline<'a, C, T> {
    /// Replace the throttle.
    #[must_use]
    pub fn with_throttle<U: Throttle>(self, throttle: U) -> BatchPipeline<'a, C, U> {
        BatchPipeline {
            client: self.client,
            throttle,
        }
    }

    /// Compute a distance for every row.
    ///
    /// Output rows are ordered by first-seen origin, then by input order
    /// within each origin.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, validation or transport error; rows
    /// not yet processed are abandoned.
    pub fn run<I>(&self, rows: I) -> Result<Vec<OutputRow>, RoutingError>
    where
        I: IntoIterator<Item = InputRow>,
    {
        let groups = group_by_origin(rows);
        info!("computing distances for {} origin(s)", groups.len());
        let processed = groups
            .into_iter()
            .map(|group| self.compute_distances(group))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(flatten_groups(&processed))
    }

    /// Annotate every destination of `group` with its distance from the
    /// group's origin.
    ///
    /// # Errors
    ///
    /// Propagates failures from scoping the client or from any request.
    pub fn compute_distances(&self, mut group: OriginGroup) -> Result<OriginGroup, RoutingError> {
        let client = self.client.with_service(Service::Route, Profile::Car)?;
        let origin = group.origin.to_string();
        let options = RequestOptions::default();
        debug!(
            "origin {origin}: {} destination(s)",
            group.destinations.len()
        );

        for destination in &mut group.destinations {
            let target = destination.coordinate.to_string();
            let payload = Payload::new().with(COORDINATES, vec![origin.clone(), target.clone()]);
            let body = client.call(&payload, &options)?;

            let response = RouteResponse::from_value(&body);
            let distance = response.distance();
            if distance == Distance::Unknown {
                warn!(
                    "no usable route from {origin} to {target} (code: {})",
                    response.code.unwrap_or("<missing>")
                );
            }
            destination.distance = Some(distance);

            self.throttle.pause();
        }

        Ok(group)
    }
}
