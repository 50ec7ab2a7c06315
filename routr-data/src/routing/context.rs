//! Client settings and the per-caller execution context.

use std::cell::OnceCell;

use log::info;
use routr_core::{ConfigurationError, Profile, RoutingError, Service, ServiceEnum};

use super::base_url::BaseUrl;
use super::client::{HttpRoutingClient, OSRM_ENGINE};
use super::config::{ClientBuildError, HttpRoutingClientConfig};
use super::osrm::OsrmScope;

/// Key-value settings consumed by the client factory.
///
/// # Examples
///
/// ```
/// use routr_data::routing::ClientSettings;
///
/// let settings = ClientSettings::from_pairs([
///     ("urlbase", "http://localhost:5000"),
///     ("profile", "foot"),
///     ("colour", "blue"),
/// ]);
/// assert_eq!(settings.engine(), "OSRM");
/// assert_eq!(settings.urlbase.as_deref(), Some("http://localhost:5000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Engine identifier; `OSRM` when absent.
    pub engine: Option<String>,
    /// Base URL of the routing service.
    pub urlbase: Option<String>,
    /// API key carried by the client.
    pub apikey: Option<String>,
    /// Initial OSRM service, by name or value.
    pub service: Option<String>,
    /// Initial OSRM profile, by name or value.
    pub profile: Option<String>,
    /// OSRM API version segment.
    pub version: Option<String>,
}

impl ClientSettings {
    /// Settings for an OSRM service at `urlbase`.
    #[must_use]
    pub fn new(urlbase: impl Into<String>) -> Self {
        Self {
            urlbase: Some(urlbase.into()),
            ..Self::default()
        }
    }

    /// Collect settings from arbitrary pairs.
    ///
    /// Keys are case-insensitive and unknown keys are ignored. A key
    /// namespaced by the effective engine, such as `osrm.urlbase`, overrides
    /// its plain counterpart; keys namespaced by other engines are ignored.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_ascii_lowercase(), value.into()))
            .collect();
        let mut settings = Self::default();
        for (key, value) in &entries {
            settings.assign(key, value);
        }
        let namespace = format!("{}.", settings.engine().to_ascii_lowercase());
        for (key, value) in &entries {
            if let Some(field) = key.strip_prefix(&namespace)
                && field != "engine"
            {
                settings.assign(field, value);
            }
        }
        settings
    }

    fn assign(&mut self, key: &str, value: &str) {
        let slot = match key {
            "engine" => &mut self.engine,
            "urlbase" => &mut self.urlbase,
            "apikey" => &mut self.apikey,
            "service" => &mut self.service,
            "profile" => &mut self.profile,
            "version" => &mut self.version,
            _ => return,
        };
        *slot = Some(value.to_owned());
    }

    /// Select an engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Attach an API key.
    #[must_use]
    pub fn with_apikey(mut self, apikey: impl Into<String>) -> Self {
        self.apikey = Some(apikey.into());
        self
    }

    /// Effective engine identifier.
    #[must_use]
    pub fn engine(&self) -> &str {
        self.engine.as_deref().unwrap_or(OSRM_ENGINE)
    }

    /// Initial OSRM scope described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidEnumValue`] when `service` or
    /// `profile` does not resolve.
    pub fn osrm_scope(&self) -> Result<OsrmScope, RoutingError> {
        let mut scope = OsrmScope::default();
        if let Some(service) = &self.service {
            scope.service = Service::resolve(service)?;
        }
        if let Some(profile) = &self.profile {
            scope.profile = Profile::resolve(profile)?;
        }
        if let Some(version) = &self.version {
            scope.version.clone_from(version);
        }
        Ok(scope)
    }
}

/// Errors raised while building a client from settings.
#[derive(Debug)]
pub enum ContextError {
    /// Settings did not describe a valid client.
    Routing(RoutingError),
    /// The HTTP machinery failed to start.
    Build(ClientBuildError),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routing(err) => err.fmt(f),
            Self::Build(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Routing(err) => Some(err),
            Self::Build(err) => Some(err),
        }
    }
}

impl From<RoutingError> for ContextError {
    fn from(err: RoutingError) -> Self {
        Self::Routing(err)
    }
}

impl From<ConfigurationError> for ContextError {
    fn from(err: ConfigurationError) -> Self {
        Self::Routing(err.into())
    }
}

impl From<ClientBuildError> for ContextError {
    fn from(err: ClientBuildError) -> Self {
        match err {
            ClientBuildError::Configuration(inner) => inner.into(),
            other => Self::Build(other),
        }
    }
}

/// Build the client described by `settings`.
///
/// The `OSRM` engine yields an OSRM client scoped per the settings; any
/// other engine yields a generic client.
///
/// # Errors
///
/// Returns [`ContextError::Routing`] when `urlbase` is missing or invalid or
/// the scope does not resolve, and [`ContextError::Build`] when the HTTP
/// machinery cannot start.
pub fn build_client(
    settings: &ClientSettings,
    config: &HttpRoutingClientConfig,
) -> Result<HttpRoutingClient, ContextError> {
    let urlbase = settings
        .urlbase
        .as_deref()
        .ok_or(ConfigurationError::MissingSetting { key: "urlbase" })?;
    let base_url = BaseUrl::parse(urlbase)?;
    let engine = settings.engine();
    let client = if engine == OSRM_ENGINE {
        HttpRoutingClient::osrm(base_url, settings.osrm_scope()?, config)?
    } else {
        HttpRoutingClient::generic(base_url, engine, config)?
    };
    info!("routing through {engine} at {}", client.base_url());
    Ok(match &settings.apikey {
        Some(apikey) => client.with_api_key(apikey.clone()),
        None => client,
    })
}

/// Per-caller owner of settings and a lazily built client.
///
/// The first successful [`ExecutionContext::client`] call builds the client;
/// later calls return the same instance. Contexts never share clients.
#[derive(Debug)]
pub struct ExecutionContext {
    settings: ClientSettings,
    config: HttpRoutingClientConfig,
    client: OnceCell<HttpRoutingClient>,
}

impl ExecutionContext {
    /// A context with default HTTP tuning.
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self::with_config(settings, HttpRoutingClientConfig::default())
    }

    /// A context with explicit HTTP tuning.
    #[must_use]
    pub const fn with_config(settings: ClientSettings, config: HttpRoutingClientConfig) -> Self {
        Self {
            settings,
            config,
            client: OnceCell::new(),
        }
    }

    /// Settings this context was created with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The cached client, built on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`build_client`] failures; nothing is cached on failure.
    pub fn client(&self) -> Result<&HttpRoutingClient, ContextError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = build_client(&self.settings, &self.config)?;
        Ok(self.client.get_or_init(|| client))
    }
}
