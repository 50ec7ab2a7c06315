//! Validated base URL for routing services.

use std::fmt;

use routr_core::ConfigurationError;
use url::Url;

const SCHEME_MARKER: &str = "://";

/// Absolute base URL of a routing service, without trailing slashes.
///
/// # Examples
///
/// ```
/// use routr_data::routing::BaseUrl;
///
/// let base = BaseUrl::parse("http://router.example.com/")?;
/// assert_eq!(base.as_str(), "http://router.example.com");
/// assert!(BaseUrl::parse("router.example.com").is_err());
/// # Ok::<(), routr_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Validate `raw` and strip its trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingScheme`] when `raw` has no
    /// scheme or nothing but a scheme, and
    /// [`ConfigurationError::InvalidBaseUrl`] when it does not parse as an
    /// absolute URL or carries a query or fragment.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ConfigurationError> {
        let url = raw.into();
        let Some((scheme, rest)) = url.split_once(SCHEME_MARKER) else {
            return Err(ConfigurationError::MissingScheme { url });
        };
        if scheme.is_empty() || rest.trim_matches('/').is_empty() {
            return Err(ConfigurationError::MissingScheme { url });
        }
        let trimmed = url.trim_end_matches('/');
        let parsed = match Url::parse(trimmed) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(ConfigurationError::InvalidBaseUrl {
                    message: err.to_string(),
                    url,
                });
            }
        };
        // Request paths are appended to the text, so nothing may follow the path.
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigurationError::InvalidBaseUrl {
                message: "a base URL cannot carry a query or fragment".to_owned(),
                url,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a request path onto the base.
    ///
    /// The path is appended verbatim; a missing leading slash is supplied.
    pub(crate) fn join(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{path}", self.0)
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for BaseUrl {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:5000", "http://localhost:5000")]
    #[case("http://localhost:5000/", "http://localhost:5000")]
    #[case("https://router.example.com/osrm//", "https://router.example.com/osrm")]
    fn parse_strips_trailing_slashes(#[case] raw: &str, #[case] expected: &str) {
        let base = BaseUrl::parse(raw).expect("valid base URL");
        assert_eq!(base.as_str(), expected);
    }

    #[rstest]
    #[case("localhost:5000")]
    #[case("://localhost")]
    #[case("http://")]
    #[case("http:///")]
    #[case("")]
    fn parse_rejects_urls_without_scheme_or_host(#[case] raw: &str) {
        let err = BaseUrl::parse(raw).expect_err("should be rejected");
        assert_eq!(
            err,
            ConfigurationError::MissingScheme {
                url: raw.to_owned()
            }
        );
    }

    #[rstest]
    fn parse_rejects_unparseable_urls() {
        let err = BaseUrl::parse("http://exa mple.com").expect_err("space in host");
        assert!(matches!(err, ConfigurationError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    #[case("http://h?x=1")]
    #[case("http://h/osrm?")]
    #[case("http://h/osrm#top")]
    fn parse_rejects_queries_and_fragments(#[case] raw: &str) {
        match BaseUrl::parse(raw) {
            Err(ConfigurationError::InvalidBaseUrl { url, .. }) => assert_eq!(url, raw),
            other => panic!("expected InvalidBaseUrl, found {other:?}"),
        }
    }

    #[rstest]
    #[case("/route/v1", "http://h/route/v1")]
    #[case("status", "http://h/status")]
    #[case("", "http://h")]
    fn join_supplies_leading_slash(#[case] path: &str, #[case] expected: &str) {
        let base = BaseUrl::parse("http://h/").expect("valid base URL");
        assert_eq!(base.join(path), expected);
    }
}
