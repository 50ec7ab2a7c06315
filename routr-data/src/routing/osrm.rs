//! OSRM request derivation.
//!
//! An OSRM request path encodes the service, API version, profile and the
//! coordinate list:
//!
//! ```text
//! /{service}/{version}/{profile}/{lon,lat;lon,lat;...}.json
//! ```
//!
//! Every payload entry other than `coordinates` travels as a query
//! parameter. See <http://project-osrm.org/docs/v5.24.0/api/#requests>.

use routr_core::{COORDINATES, Payload, Profile, Service, ServiceEnum, ValidationError};
use serde_json::Value;

/// Default OSRM API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Payload entries an OSRM request cannot do without.
const REQUIRED_ENTRIES: [&str; 1] = [COORDINATES];

/// Service, profile and API version an OSRM client is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmScope {
    /// Routing operation.
    pub service: Service,
    /// Travel profile.
    pub profile: Profile,
    /// API version path segment.
    pub version: String,
}

impl Default for OsrmScope {
    fn default() -> Self {
        Self::new(Service::Route, Profile::Car)
    }
}

impl OsrmScope {
    /// Scope on the default API version.
    #[must_use]
    pub fn new(service: Service, profile: Profile) -> Self {
        Self {
            service,
            profile,
            version: DEFAULT_API_VERSION.to_owned(),
        }
    }

    /// Override the API version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Same version, different service and profile.
    #[must_use]
    pub fn rescoped(&self, service: Service, profile: Profile) -> Self {
        Self {
            service,
            profile,
            version: self.version.clone(),
        }
    }

    /// Derive the request path and query parameters from `payload`.
    pub(crate) fn request_target<'p>(
        &self,
        payload: &'p Payload,
    ) -> Result<RequestTarget<'p>, ValidationError> {
        if payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        for key in REQUIRED_ENTRIES {
            if !payload.contains_key(key) {
                return Err(ValidationError::MissingEntry { key });
            }
        }
        let coordinates = payload
            .get(COORDINATES)
            .map(coordinate_list)
            .transpose()?
            .unwrap_or_default();
        let path = format!(
            "/{}/{}/{}/{}.json",
            self.service.value(),
            self.version,
            self.profile.value(),
            coordinates.join(";"),
        );
        let query = payload
            .iter()
            .filter(|(key, _)| *key != COORDINATES)
            .collect();
        Ok(RequestTarget { path, query })
    }
}

/// Path and query parameters of a request, before joining onto a base URL.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RequestTarget<'p> {
    pub(crate) path: String,
    pub(crate) query: Vec<(&'p str, &'p Value)>,
}

fn malformed_coordinates(message: &str) -> ValidationError {
    ValidationError::MalformedEntry {
        key: COORDINATES.to_owned(),
        message: message.to_owned(),
    }
}

/// Trimmed, non-empty coordinate strings from a list or a single string.
fn coordinate_list(value: &Value) -> Result<Vec<&str>, ValidationError> {
    let candidates: Vec<&str> = match value {
        Value::String(single) => vec![single.as_str()],
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| malformed_coordinates("coordinates must be strings"))
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(malformed_coordinates(
                "expected a list of \"lon,lat\" strings",
            ));
        }
    };
    let coordinates: Vec<&str> = candidates
        .into_iter()
        .map(str::trim)
        .filter(|coordinate| !coordinate.is_empty())
        .collect();
    if coordinates.is_empty() {
        return Err(malformed_coordinates("at least one coordinate is required"));
    }
    Ok(coordinates)
}

/// Render one payload entry as query pairs.
///
/// Strings pass through verbatim, arrays expand to repeated keys and `null`
/// is dropped. Anything else uses its JSON text.
pub(crate) fn query_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(query_values).collect(),
        other => vec![other.to_string()],
    }
}
