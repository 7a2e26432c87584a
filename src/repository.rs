use crate::{flag::find_flag, ConfigStoreClient, ConfigurationDocument, Flag, MultiFlag, Result};

/// Looks flags up in freshly fetched configuration documents.
///
/// There is no caching: every call issues a new request through the [`ConfigStoreClient`].
#[derive(Clone)]
pub struct FlagRepository {
    client: ConfigStoreClient,
}

impl FlagRepository {
    pub fn new(client: ConfigStoreClient) -> FlagRepository {
        FlagRepository { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &ConfigStoreClient {
        &self.client
    }

    /// Find a flag by exact key in the default profile.
    ///
    /// Returns `None` if the key is missing or the configuration could not be fetched.
    pub async fn find_flag_by_key(&self, key: &str) -> Option<Flag> {
        self.find_flag(self.client.default_profile_id(), key).await
    }

    /// Find a flag by exact key in `profile_id`.
    pub async fn find_flag(&self, profile_id: &str, key: &str) -> Option<Flag> {
        let document = self.client.fetch_configuration(profile_id).await;
        let flag = find_flag(document, key);
        if flag.is_none() {
            log::debug!(target: "appconfig", profile_id, flag_key = key; "flag not found");
        }
        flag
    }

    /// All flags of the default profile, exactly as the agent sent them. Empty if the
    /// configuration could not be fetched.
    pub async fn list_flags(&self) -> MultiFlag {
        self.list_flags_in(self.client.default_profile_id()).await
    }

    /// All flags of `profile_id`.
    pub async fn list_flags_in(&self, profile_id: &str) -> MultiFlag {
        self.client.fetch_configuration(profile_id).await
    }

    /// The raw configuration document of `profile_id`, or `None` if it could not be fetched.
    pub async fn get_configuration(&self, profile_id: &str) -> Option<ConfigurationDocument> {
        self.client.try_fetch_configuration(profile_id).await.ok()
    }

    /// Fetch a single flag directly, surfacing fetch errors to the caller.
    pub async fn get_flag(&self, profile_id: &str, key: &str) -> Result<Option<Flag>> {
        self.client.fetch_flag(profile_id, key).await
    }
}
