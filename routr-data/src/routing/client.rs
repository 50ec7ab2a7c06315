//! Blocking HTTP routing client.
//!
//! [`HttpRoutingClient`] implements the synchronous
//! [`routr_core::RoutingClient`] trait by blocking on asynchronous `reqwest`
//! calls. The HTTP connection pool and the Tokio runtime live behind an
//! [`Arc`], so clients derived with `with_service` reuse both.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use routr_core::{
    ConfigurationError, Method, Payload, Profile, RequestOptions, RoutingClient, RoutingError,
    Service, TransportError, ValidationError,
};
use serde_json::Value;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::base_url::BaseUrl;
use super::config::{ClientBuildError, HttpRoutingClientConfig};
use super::osrm::{OsrmScope, query_values};

/// Engine identifier of the OSRM flavour.
pub const OSRM_ENGINE: &str = "OSRM";

const JSON_MEDIA_TYPE: &str = "application/json";

/// How a client derives request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientScope {
    /// OSRM client bound to a service, profile and API version.
    Osrm(OsrmScope),
    /// Engine-agnostic client: path from the call options, whole payload as
    /// query.
    Generic {
        /// Engine identifier from configuration.
        engine: String,
    },
}

/// State shared by a client and everything derived from it.
struct Transport {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP routing client.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, calls block on the client's own
/// `current_thread` runtime. Inside a multi-threaded runtime (detected via
/// [`Handle::try_current()`]) the caller's handle is used with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime the
/// client falls back to its own runtime, which blocks the caller's executor
/// for the duration of the request.
#[derive(Debug, Clone)]
pub struct HttpRoutingClient {
    base_url: BaseUrl,
    api_key: Option<String>,
    scope: ClientScope,
    transport: Arc<Transport>,
}

impl HttpRoutingClient {
    /// An OSRM client bound to `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn osrm(
        base_url: BaseUrl,
        scope: OsrmScope,
        config: &HttpRoutingClientConfig,
    ) -> Result<Self, ClientBuildError> {
        Self::build(base_url, ClientScope::Osrm(scope), config)
    }

    /// A generic client for a non-OSRM engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn generic(
        base_url: BaseUrl,
        engine: impl Into<String>,
        config: &HttpRoutingClientConfig,
    ) -> Result<Self, ClientBuildError> {
        let scope = ClientScope::Generic {
            engine: engine.into(),
        };
        Self::build(base_url, scope, config)
    }

    fn build(
        base_url: BaseUrl,
        scope: ClientScope,
        config: &HttpRoutingClientConfig,
    ) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            base_url,
            api_key: None,
            scope,
            transport: Arc::new(Transport {
                client,
                runtime,
                timeout: config.timeout,
            }),
        })
    }

    /// Attach an API key. It is carried by derived clients but not sent.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Base URL of the routing service.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Configured API key, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Current scope.
    #[must_use]
    pub const fn scope(&self) -> &ClientScope {
        &self.scope
    }

    /// Engine identifier.
    #[must_use]
    pub fn engine(&self) -> &str {
        match &self.scope {
            ClientScope::Osrm(_) => OSRM_ENGINE,
            ClientScope::Generic { engine } => engine,
        }
    }

    /// Whether `other` shares this client's connection pool and runtime.
    #[must_use]
    pub fn shares_transport_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transport, &other.transport)
    }

    /// Build the fully qualified URL for a call.
    ///
    /// GET requests carry the non-path payload entries as query parameters;
    /// POST requests carry none.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Validation`] when an OSRM payload is empty,
    /// lacks coordinates, or the resulting URL does not parse.
    pub fn request_url(
        &self,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<Url, RoutingError> {
        let (path, query) = match &self.scope {
            ClientScope::Osrm(scope) => {
                if let Some(path) = &options.path {
                    debug!("ignoring path override {path:?} on {OSRM_ENGINE} client");
                }
                let target = scope.request_target(payload)?;
                (target.path, target.query)
            }
            ClientScope::Generic { .. } => (
                options.path.clone().unwrap_or_default(),
                payload.iter().collect(),
            ),
        };
        let mut url =
            Url::parse(&self.base_url.join(&path)).map_err(|err| {
                ValidationError::MalformedEntry {
                    key: "path".to_owned(),
                    message: err.to_string(),
                }
            })?;
        if options.method == Method::Get {
            let pairs: Vec<(&str, String)> = query
                .iter()
                .flat_map(|&(key, value)| {
                    query_values(value)
                        .into_iter()
                        .map(move |text| (key, text))
                })
                .collect();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        debug!("built routing URL {url}");
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Value, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        })
    }

    /// Convert a reqwest error to a [`TransportError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.transport.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        // block_in_place needs a multi-threaded runtime; anything else uses
        // the client's own runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.transport.runtime.block_on(future),
        }
    }
}

/// Default headers overlaid with the caller's.
fn request_headers(options: &RequestOptions) -> Result<HeaderMap, ValidationError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    for (name, value) in &options.headers {
        let invalid = |message: String| ValidationError::InvalidHeader {
            name: name.clone(),
            message,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid(err.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

impl RoutingClient for HttpRoutingClient {
    fn with_service(&self, service: Service, profile: Profile) -> Result<Self, RoutingError> {
        match &self.scope {
            ClientScope::Osrm(scope) => Ok(Self {
                base_url: self.base_url.clone(),
                api_key: self.api_key.clone(),
                scope: ClientScope::Osrm(scope.rescoped(service, profile)),
                transport: Arc::clone(&self.transport),
            }),
            ClientScope::Generic { engine } => Err(ConfigurationError::UnscopedEngine {
                engine: engine.clone(),
            }
            .into()),
        }
    }

    fn call(&self, payload: &Payload, options: &RequestOptions) -> Result<Value, RoutingError> {
        let url = self.request_url(payload, options)?;
        let headers = request_headers(options)?;
        let client = &self.transport.client;
        let request = match options.method {
            Method::Get => client.get(url.clone()),
            Method::Post => client.post(url.clone()).json(&payload.to_json()),
        }
        .headers(headers);
        Ok(self.block_on(self.send(request, url.as_str()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routr_core::COORDINATES;
    use rstest::{fixture, rstest};

    #[fixture]
    fn osrm_client() -> HttpRoutingClient {
        let base = BaseUrl::parse("http://router.example.com/").expect("valid base URL");
        HttpRoutingClient::osrm(base, OsrmScope::default(), &HttpRoutingClientConfig::default())
            .expect("client should build")
            .with_api_key("secret")
    }

    #[fixture]
    fn generic_client() -> HttpRoutingClient {
        let base = BaseUrl::parse("http://router.example.com").expect("valid base URL");
        HttpRoutingClient::generic(base, "VALHALLA", &HttpRoutingClientConfig::default())
            .expect("client should build")
    }

    fn two_point_payload() -> Payload {
        Payload::new()
            .with(COORDINATES, vec!["13.38,52.51", "13.42,52.50"])
            .with("overview", "false")
            .with("alternatives", 2)
    }

    #[rstest]
    fn osrm_url_encodes_path_and_query(osrm_client: HttpRoutingClient) {
        let url = osrm_client
            .request_url(&two_point_payload(), &RequestOptions::default())
            .expect("valid request");

        assert_eq!(
            url.as_str(),
            "http://router.example.com/route/v1/car/13.38,52.51;13.42,52.50.json?overview=false&alternatives=2"
        );
    }

    #[rstest]
    fn osrm_url_ignores_path_override(osrm_client: HttpRoutingClient) {
        let options = RequestOptions::default().with_path("/elsewhere");
        let url = osrm_client
            .request_url(&Payload::new().with(COORDINATES, "1,2"), &options)
            .expect("valid request");

        assert_eq!(url.path(), "/route/v1/car/1,2.json");
    }

    #[rstest]
    fn post_url_has_no_query(osrm_client: HttpRoutingClient) {
        let url = osrm_client
            .request_url(&two_point_payload(), &RequestOptions::post())
            .expect("valid request");

        assert_eq!(url.query(), None);
        assert_eq!(url.path(), "/route/v1/car/13.38,52.51;13.42,52.50.json");
    }

    #[rstest]
    fn osrm_url_rejects_payload_without_coordinates(osrm_client: HttpRoutingClient) {
        let err = osrm_client
            .request_url(&Payload::new().with("steps", true), &RequestOptions::default())
            .expect_err("coordinates are mandatory");

        assert_eq!(
            err,
            RoutingError::Validation(ValidationError::MissingEntry { key: COORDINATES })
        );
    }

    #[rstest]
    fn generic_url_uses_path_and_whole_payload(generic_client: HttpRoutingClient) {
        let payload = Payload::new()
            .with("costing", "auto")
            .with("locations", vec!["a", "b"])
            .with("unused", Value::Null);
        let options = RequestOptions::default().with_path("route");

        let url = generic_client
            .request_url(&payload, &options)
            .expect("generic URLs are not validated");

        assert_eq!(
            url.as_str(),
            "http://router.example.com/route?costing=auto&locations=a&locations=b"
        );
    }

    #[rstest]
    fn with_service_rescopes_and_keeps_shared_state(osrm_client: HttpRoutingClient) {
        let derived = osrm_client
            .with_service(Service::Table, Profile::Foot)
            .expect("OSRM clients can be scoped");

        assert_eq!(
            derived.scope(),
            &ClientScope::Osrm(OsrmScope::new(Service::Table, Profile::Foot))
        );
        assert_eq!(derived.base_url(), osrm_client.base_url());
        assert_eq!(derived.api_key(), Some("secret"));
        assert!(derived.shares_transport_with(&osrm_client));
        assert_eq!(
            osrm_client.scope(),
            &ClientScope::Osrm(OsrmScope::default()),
            "the original client must keep its scope"
        );
    }

    #[rstest]
    fn generic_client_cannot_be_scoped(generic_client: HttpRoutingClient) {
        let err = generic_client
            .with_service(Service::Route, Profile::Car)
            .expect_err("generic engines have no services");

        assert_eq!(
            err,
            RoutingError::Configuration(ConfigurationError::UnscopedEngine {
                engine: "VALHALLA".to_owned()
            })
        );
        assert_eq!(generic_client.engine(), "VALHALLA");
    }

    #[rstest]
    fn caller_headers_override_defaults() {
        let options = RequestOptions::default()
            .with_header("Accept", "text/plain")
            .with_header("X-Trace", "abc");

        let headers = request_headers(&options).expect("valid headers");

        assert_eq!(headers.get(ACCEPT), Some(&HeaderValue::from_static("text/plain")));
        assert_eq!(headers.get("x-trace"), Some(&HeaderValue::from_static("abc")));
    }

    #[rstest]
    #[case("bad header", "value")]
    #[case("X-Ok", "line\nbreak")]
    fn invalid_headers_are_rejected(#[case] name: &str, #[case] value: &str) {
        let options = RequestOptions::default().with_header(name, value);
        let err = request_headers(&options).expect_err("header must be rejected");
        assert!(
            matches!(&err, ValidationError::InvalidHeader { name: rejected, .. } if rejected == name),
            "unexpected error {err:?}"
        );
    }
}
