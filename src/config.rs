use std::{sync::Arc, time::Duration};

use crate::{
    source::{ConfigurationSource, HttpConfigurationSource, LocalConfigurationSource},
    ConfigStoreClient, Result,
};

/// Configuration for [`ConfigStoreClient`].
///
/// Application and environment ids are fixed for the lifetime of the client. The profile id set
/// here is the default profile; most operations also accept an explicit profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub(crate) application_id: String,
    pub(crate) environment_id: String,
    pub(crate) profile_id: String,
    pub(crate) base_url: String,
    pub(crate) offline: bool,
    pub(crate) request_timeout: Duration,
}

impl ClientConfig {
    /// Default agent address. The AppConfig agent listens on loopback next to the service.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:2772";

    /// Default timeout for a single request to the agent.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Fallback application id when `AWS_APPCONFIG_APP_ID` is not set.
    pub const DEFAULT_APPLICATION_ID: &'static str = "appconfig-app-id";
    /// Fallback environment id when `AWS_APPCONFIG_ENV_ID` is not set.
    pub const DEFAULT_ENVIRONMENT_ID: &'static str = "appconfig-env-id";
    /// Fallback profile id when `AWS_APPCONFIG_PROFILE_ID` is not set.
    pub const DEFAULT_PROFILE_ID: &'static str = "appconfig-profile-id";

    /// Create a configuration for the given application and environment.
    ///
    /// ```
    /// # use appconfig_flags::ClientConfig;
    /// let mut config = ClientConfig::new("my-app", "production");
    /// config.profile_id("feature-flags").base_url("http://127.0.0.1:2772");
    /// ```
    pub fn new(application_id: impl Into<String>, environment_id: impl Into<String>) -> Self {
        ClientConfig {
            application_id: application_id.into(),
            environment_id: environment_id.into(),
            profile_id: ClientConfig::DEFAULT_PROFILE_ID.to_owned(),
            base_url: ClientConfig::DEFAULT_BASE_URL.to_owned(),
            offline: false,
            request_timeout: ClientConfig::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `AWS_APPCONFIG_APP_ID` | [`DEFAULT_APPLICATION_ID`](Self::DEFAULT_APPLICATION_ID) |
    /// | `AWS_APPCONFIG_ENV_ID` | [`DEFAULT_ENVIRONMENT_ID`](Self::DEFAULT_ENVIRONMENT_ID) |
    /// | `AWS_APPCONFIG_PROFILE_ID` | [`DEFAULT_PROFILE_ID`](Self::DEFAULT_PROFILE_ID) |
    /// | `AWS_APPCONFIG_BASE_URL` | [`DEFAULT_BASE_URL`](Self::DEFAULT_BASE_URL) |
    /// | `AWS_APPCONFIG_REQUEST_TIMEOUT_MS` | 5000 |
    /// | `IS_OFFLINE` | `false` |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_owned());

        let mut config = ClientConfig::new(
            var("AWS_APPCONFIG_APP_ID", Self::DEFAULT_APPLICATION_ID),
            var("AWS_APPCONFIG_ENV_ID", Self::DEFAULT_ENVIRONMENT_ID),
        );
        config
            .profile_id(var("AWS_APPCONFIG_PROFILE_ID", Self::DEFAULT_PROFILE_ID))
            .base_url(var("AWS_APPCONFIG_BASE_URL", Self::DEFAULT_BASE_URL))
            .offline(lookup("IS_OFFLINE").is_some_and(|v| parse_bool(&v)));

        if let Some(timeout) = lookup("AWS_APPCONFIG_REQUEST_TIMEOUT_MS") {
            match timeout.trim().parse::<u64>() {
                Ok(ms) => {
                    config.request_timeout(Duration::from_millis(ms));
                }
                Err(_) => {
                    log::warn!(target: "appconfig", value = timeout.as_str(); "ignoring invalid AWS_APPCONFIG_REQUEST_TIMEOUT_MS");
                }
            }
        }

        config
    }

    /// Set the default configuration profile.
    pub fn profile_id(&mut self, profile_id: impl Into<String>) -> &mut Self {
        self.profile_id = profile_id.into();
        self
    }

    /// Override the agent base URL.
    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    /// Serve the built-in fixture flags instead of calling the agent.
    pub fn offline(&mut self, offline: bool) -> &mut Self {
        self.offline = offline;
        self
    }

    /// Set the timeout applied to every request to the agent.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.request_timeout = timeout;
        self
    }

    /// Default configuration profile id.
    pub fn default_profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Whether the fixture flags are served instead of the agent's.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Create a new [`ConfigStoreClient`] using this configuration.
    ///
    /// Fails if the base URL cannot be parsed or the HTTP client cannot be built.
    ///
    /// ```
    /// # use appconfig_flags::ClientConfig;
    /// let client = ClientConfig::new("my-app", "production").to_client().unwrap();
    /// ```
    pub fn to_client(&self) -> Result<ConfigStoreClient> {
        let source: Arc<dyn ConfigurationSource> = if self.offline {
            log::info!(target: "appconfig", "serving feature flags in OFFLINE mode");
            Arc::new(LocalConfigurationSource::new())
        } else {
            Arc::new(HttpConfigurationSource::new(self)?)
        };
        Ok(ConfigStoreClient::new(source, self.profile_id.clone()))
    }
}

/// Settings of the HTTP entry layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_addr: String,
    /// Value of the `Access-Control-Allow-Origin` response header.
    pub allow_origin: String,
}

impl ServerConfig {
    /// Listen address when `BIND_ADDR` is not set.
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";
    /// Allowed origin when `ALLOW_ORIGIN` is not set.
    pub const DEFAULT_ALLOW_ORIGIN: &'static str = "*";

    /// Read `BIND_ADDR` and `ALLOW_ORIGIN` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ServerConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_owned()),
            allow_origin: lookup("ALLOW_ORIGIN")
                .unwrap_or_else(|| Self::DEFAULT_ALLOW_ORIGIN.to_owned()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
