//! `ROUTE_` environment variables.
//!
//! Names drop the prefix and any further leading underscores, are
//! lowercased, and use `.` for `_`: both `ROUTE_URLBASE` and
//! `ROUTE__URLBASE` become `urlbase`, while `ROUTE__OSRM_URLBASE` becomes
//! the engine-namespaced `osrm.urlbase`.

use std::ffi::OsString;

use serde_json::{Map, Value};

/// Prefix shared by every variable read here.
pub(crate) const ENV_PREFIX: &str = "ROUTE_";

/// Keys that map onto [`crate::ComputeArgs`] fields.
const ARGS_KEYS: [&str; 5] = ["source", "output", "urlbase", "apikey", "engine"];

/// Normalised `(key, value)` pairs of every `ROUTE_` variable in `vars`.
///
/// Variables whose name or value is not valid Unicode are skipped, as are
/// names with nothing after the prefix.
pub(crate) fn route_settings<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let value = value.into_string().ok()?;
            let name = key.strip_prefix(ENV_PREFIX)?.trim_start_matches('_');
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase().replace('_', "."), value))
        })
        .collect()
}

/// The process environment, normalised by [`route_settings`].
pub(crate) fn process_settings() -> Vec<(String, String)> {
    route_settings(std::env::vars_os())
}

/// Configuration layer holding the plain settings that name an argument.
pub(crate) fn args_layer(settings: &[(String, String)]) -> Value {
    let object: Map<String, Value> = settings
        .iter()
        .filter(|(key, _)| ARGS_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(object)
}
