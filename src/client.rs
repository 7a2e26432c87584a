use std::sync::Arc;

use crate::{source::ConfigurationSource, ConfigurationDocument, Flag, Result};

/// A client for the configuration agent.
///
/// The client applies the error policy of each retrieval path on top of a
/// [`ConfigurationSource`]: full-document fetches never fail (they degrade to an empty document),
/// while targeted flag fetches return a typed [`Error`](crate::Error) for the caller to handle.
///
/// Cloning is cheap and clones share the underlying connection pool.
///
/// # Examples
/// ```
/// # use appconfig_flags::ClientConfig;
/// let client = ClientConfig::new("my-app", "production").to_client().unwrap();
/// assert_eq!(client.default_profile_id(), "appconfig-profile-id");
/// ```
#[derive(Clone)]
pub struct ConfigStoreClient {
    source: Arc<dyn ConfigurationSource>,
    profile_id: String,
}

impl ConfigStoreClient {
    /// Create a client reading from `source`. `default_profile_id` is used by operations that do
    /// not take an explicit profile.
    pub fn new(
        source: Arc<dyn ConfigurationSource>,
        default_profile_id: impl Into<String>,
    ) -> ConfigStoreClient {
        ConfigStoreClient {
            source,
            profile_id: default_profile_id.into(),
        }
    }

    /// Default configuration profile id.
    pub fn default_profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Fetch the complete configuration document for `profile_id`.
    ///
    /// On any failure (transport error, non-2xx status, malformed body) an empty document is
    /// returned, so callers can always iterate the result.
    pub async fn fetch_configuration(&self, profile_id: &str) -> ConfigurationDocument {
        self.try_fetch_configuration(profile_id)
            .await
            .unwrap_or_default()
    }

    /// Same as [`fetch_configuration`](Self::fetch_configuration), but hands the failure to the
    /// caller instead of replacing it with an empty document.
    pub async fn try_fetch_configuration(
        &self,
        profile_id: &str,
    ) -> Result<ConfigurationDocument> {
        log::debug!(target: "appconfig", profile_id; "fetching configuration");
        self.source
            .fetch_configuration(profile_id)
            .await
            .inspect_err(|err| {
                log::warn!(target: "appconfig", profile_id; "failed to fetch configuration: {}", err);
            })
    }

    /// Fetch a single flag directly from the agent. `Ok(None)` means the flag does not exist.
    pub async fn fetch_flag(&self, profile_id: &str, flag_key: &str) -> Result<Option<Flag>> {
        log::debug!(target: "appconfig", profile_id, flag_key; "fetching flag");
        let definition = self
            .source
            .fetch_flag(profile_id, flag_key)
            .await
            .inspect_err(|err| {
                log::warn!(target: "appconfig", profile_id, flag_key; "failed to fetch flag: {}", err);
            })?;

        Ok(definition.map(|definition| definition.into_flag(flag_key)))
    }

    /// Fetch several flags with one request. The document is keyed by flag key, in the order the
    /// agent returned them.
    pub async fn fetch_flags(
        &self,
        profile_id: &str,
        flag_keys: &[String],
    ) -> Result<ConfigurationDocument> {
        log::debug!(target: "appconfig", profile_id, flag_keys:serde = flag_keys; "fetching flags");
        self.source
            .fetch_flags(profile_id, flag_keys)
            .await
            .inspect_err(|err| {
                log::warn!(target: "appconfig", profile_id; "failed to fetch flags: {}", err);
            })
    }
}
