use crate::{ConfigurationDocument, Flag, FlagDefinition, FlagRepository, Result};

impl FlagRepository {
    /// Fetch several flags of the default profile with a single request.
    ///
    /// Flags come back in the order the agent lists them, which is not necessarily the order of
    /// `keys`. Keys the profile does not define are left out. Unlike the full-document
    /// operations, fetch errors are returned to the caller.
    pub async fn get_flags(&self, keys: &[String]) -> Result<Vec<Flag>> {
        self.get_flags_in(self.client().default_profile_id(), keys)
            .await
    }

    /// Same as [`get_flags`](Self::get_flags) for an explicit profile.
    pub async fn get_flags_in(&self, profile_id: &str, keys: &[String]) -> Result<Vec<Flag>> {
        let response = self.client().fetch_flags(profile_id, keys).await?;
        flags_from_response(response)
    }
}

/// Convert an agent response keyed by flag key (`{key: {enabled, ...attributes}}`) into
/// canonical flags, keeping the response order.
///
/// Fails with [`Error::MalformedResponse`](crate::Error::MalformedResponse) if any entry is not
/// a flag definition.
pub fn flags_from_response(response: ConfigurationDocument) -> Result<Vec<Flag>> {
    response
        .into_iter()
        .map(|(key, value)| -> Result<Flag> {
            let definition: FlagDefinition = serde_json::from_value(value)?;
            Ok(definition.into_flag(key))
        })
        .collect()
}
