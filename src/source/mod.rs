//! Transports that retrieve configuration documents.
//!
//! A [`ConfigurationSource`] performs exactly one attempt per call and reports every failure as
//! an [`Error`](crate::Error). Deciding which failures callers get to see is the job of
//! [`ConfigStoreClient`](crate::ConfigStoreClient).
use async_trait::async_trait;

use crate::{ConfigurationDocument, FlagDefinition, Result};

mod http;
mod local;

pub use http::HttpConfigurationSource;
pub use local::LocalConfigurationSource;

#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// Fetch the complete document of a configuration profile.
    async fn fetch_configuration(&self, profile_id: &str) -> Result<ConfigurationDocument>;

    /// Fetch a single flag. Returns `Ok(None)` if the profile has no such flag.
    async fn fetch_flag(&self, profile_id: &str, flag_key: &str)
        -> Result<Option<FlagDefinition>>;

    /// Fetch several flags at once. The result is keyed by flag key; flags the profile does not
    /// define are missing from it.
    async fn fetch_flags(
        &self,
        profile_id: &str,
        flag_keys: &[String],
    ) -> Result<ConfigurationDocument>;
}

#[cfg(test)]
pub(crate) mod stub;
