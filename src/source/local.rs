use std::collections::HashMap;

use async_trait::async_trait;

use crate::{ConfigurationDocument, FlagDefinition, Result};

use super::ConfigurationSource;

/// Serves a static set of flags, used when running disconnected from the agent. The profile id
/// is ignored: every profile resolves to the same flags.
pub struct LocalConfigurationSource {
    flags: HashMap<String, FlagDefinition>,
}

impl LocalConfigurationSource {
    /// Source serving the built-in local flags.
    pub fn new() -> Self {
        Self::with_flags(local_flags())
    }

    /// Source serving `flags`.
    pub fn with_flags(flags: HashMap<String, FlagDefinition>) -> Self {
        LocalConfigurationSource { flags }
    }

    fn to_document<'a>(
        &self,
        flags: impl IntoIterator<Item = (&'a String, &'a FlagDefinition)>,
    ) -> Result<ConfigurationDocument> {
        flags
            .into_iter()
            .map(|(key, flag)| -> Result<_> { Ok((key.clone(), serde_json::to_value(flag)?)) })
            .collect()
    }
}

impl Default for LocalConfigurationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigurationSource for LocalConfigurationSource {
    async fn fetch_configuration(&self, _profile_id: &str) -> Result<ConfigurationDocument> {
        log::debug!(target: "appconfig", "fetching configuration in OFFLINE mode");
        self.to_document(&self.flags)
    }

    async fn fetch_flag(
        &self,
        _profile_id: &str,
        flag_key: &str,
    ) -> Result<Option<FlagDefinition>> {
        Ok(self.flags.get(flag_key).cloned())
    }

    async fn fetch_flags(
        &self,
        _profile_id: &str,
        flag_keys: &[String],
    ) -> Result<ConfigurationDocument> {
        self.to_document(
            flag_keys
                .iter()
                .filter_map(|key| self.flags.get_key_value(key)),
        )
    }
}

fn local_flags() -> HashMap<String, FlagDefinition> {
    let flag = |enabled: bool, customers: Option<&[&str]>| FlagDefinition {
        enabled,
        customers: customers.map(|c| c.iter().map(|s| s.to_string()).collect()),
        attributes: Default::default(),
    };

    HashMap::from([
        ("release-api-feature".to_owned(), flag(true, None)),
        (
            "release-api-feature-customer".to_owned(),
            flag(true, Some(&["C000001", "C000002"])),
        ),
        ("release-feature-three".to_owned(), flag(true, None)),
        ("release-feature-four".to_owned(), flag(false, None)),
    ])
}
