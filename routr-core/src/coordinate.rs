//! Coordinates and the row types flowing through the batch pipeline.
//!
//! Coordinates stay textual end to end so the precision written in the
//! source table is exactly what reaches the routing service and the output.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A `(longitude, latitude)` pair kept as the original strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Longitude text.
    pub longitude: String,
    /// Latitude text.
    pub latitude: String,
}

impl Coordinate {
    /// Construct a coordinate from longitude and latitude text.
    pub fn new(longitude: impl Into<String>, latitude: impl Into<String>) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
        }
    }
}

/// Formats as `lon,lat`, the shape the routing service expects.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Grouping key for destinations sharing an origin. Equality is exact
/// string equality on both components.
pub type OriginKey = Coordinate;

/// Distance computed for a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// The service returned no usable route or distance.
    Unknown,
    /// Distance in metres.
    Metres(f64),
}

impl Distance {
    /// Numeric value, if known.
    #[must_use]
    pub const fn metres(self) -> Option<f64> {
        match self {
            Self::Unknown => None,
            Self::Metres(value) => Some(value),
        }
    }
}

/// `?` for [`Distance::Unknown`]; whole numbers keep one decimal place
/// (`10.0`), anything else uses the shortest round-trip form.
impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown => f.write_str("?"),
            Self::Metres(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Metres(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One input row: an origin and a destination coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRow {
    /// Origin longitude.
    pub origin_long: String,
    /// Origin latitude.
    pub origin_lat: String,
    /// Destination longitude.
    pub dest_long: String,
    /// Destination latitude.
    pub dest_lat: String,
}

impl InputRow {
    /// Origin coordinate of the row.
    #[must_use]
    pub fn origin(&self) -> Coordinate {
        Coordinate::new(self.origin_long.as_str(), self.origin_lat.as_str())
    }

    /// Split the row into its origin key and a pending destination record.
    #[must_use]
    pub fn into_parts(self) -> (OriginKey, DestinationRecord) {
        let origin = Coordinate::new(self.origin_long, self.origin_lat);
        let destination = DestinationRecord::new(Coordinate::new(self.dest_long, self.dest_lat));
        (origin, destination)
    }
}

/// A destination awaiting, or annotated with, its distance from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationRecord {
    /// Destination coordinate.
    pub coordinate: Coordinate,
    /// `None` until the pipeline has processed the record.
    pub distance: Option<Distance>,
}

impl DestinationRecord {
    /// A record with no distance computed yet.
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            distance: None,
        }
    }
}

/// Destinations recorded under a single origin, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginGroup {
    /// Shared origin.
    pub origin: OriginKey,
    /// Destinations for this origin.
    pub destinations: Vec<DestinationRecord>,
}

/// One output row. Field order is the column order of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    /// Origin latitude.
    pub origin_lat: String,
    /// Origin longitude.
    pub origin_long: String,
    /// Destination latitude.
    pub dest_lat: String,
    /// Destination longitude.
    pub dest_long: String,
    /// Computed distance.
    pub distance: Distance,
}

impl OutputRow {
    /// Column names, in output order.
    pub const HEADERS: [&'static str; 5] =
        ["origin_lat", "origin_long", "dest_lat", "dest_long", "distance"];

    /// Combine an origin with an annotated destination.
    ///
    /// A destination that was never processed is reported as unknown.
    #[must_use]
    pub fn new(origin: &Coordinate, destination: &DestinationRecord) -> Self {
        Self {
            origin_lat: origin.latitude.clone(),
            origin_long: origin.longitude.clone(),
            dest_lat: destination.coordinate.latitude.clone(),
            dest_long: destination.coordinate.longitude.clone(),
            distance: destination.distance.unwrap_or(Distance::Unknown),
        }
    }
}
