//! Interpretation of route service responses.
//!
//! Every field is optional: missing or wrong-typed fields read as absent,
//! and absence degrades to [`Distance::Unknown`] rather than an error.

use serde_json::Value;

use crate::coordinate::Distance;

/// Status code the route service reports on success.
pub const OK_CODE: &str = "Ok";

/// Divisor converting the service's raw distance unit to the reported one.
pub const DISTANCE_DIVISOR: f64 = 100.0;

/// Lenient view over a decoded route response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteResponse<'a> {
    /// `code`, when present and a string.
    pub code: Option<&'a str>,
    /// `routes`, when present and an array.
    pub routes: Option<&'a [Value]>,
}

impl<'a> RouteResponse<'a> {
    /// Read the fields of interest from `body`.
    #[must_use]
    pub fn from_value(body: &'a Value) -> Self {
        Self {
            code: body.get("code").and_then(Value::as_str),
            routes: body
                .get("routes")
                .and_then(Value::as_array)
                .map(Vec::as_slice),
        }
    }

    /// Whether the service reported success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == Some(OK_CODE)
    }

    /// Raw `distance` of the first route, if the response is usable.
    #[must_use]
    pub fn first_route_distance(&self) -> Option<f64> {
        if !self.is_ok() {
            return None;
        }
        self.routes?.first()?.get("distance")?.as_f64()
    }

    /// The scaled distance, or [`Distance::Unknown`].
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.first_route_distance()
            .map_or(Distance::Unknown, |raw| Distance::Metres(raw / DISTANCE_DIVISOR))
    }
}

/// Extract the distance from a decoded route response body.
///
/// # Examples
///
/// ```
/// use routr_core::{Distance, interpret_route_response};
/// use serde_json::json;
///
/// let body = json!({"code": "Ok", "routes": [{"distance": 1000}]});
/// assert_eq!(interpret_route_response(&body), Distance::Metres(10.0));
///
/// let body = json!({"code": "NoRoute"});
/// assert_eq!(interpret_route_response(&body), Distance::Unknown);
/// ```
#[must_use]
pub fn interpret_route_response(body: &Value) -> Distance {
    RouteResponse::from_value(body).distance()
}
