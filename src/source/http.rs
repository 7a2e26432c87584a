//! An HTTP client that fetches configuration from the AppConfig agent.
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ConfigurationDocument, Error, FlagDefinition, Result};

use super::ConfigurationSource;

/// Reads configuration profiles from the agent at
/// `{base_url}/applications/{app}/environments/{env}/configurations/{profile}`.
pub struct HttpConfigurationSource {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::Client,
    base_url: Url,
    application_id: String,
    environment_id: String,
}

impl HttpConfigurationSource {
    pub fn new(config: &ClientConfig) -> Result<HttpConfigurationSource> {
        let base_url = Url::parse(&config.base_url).map_err(Error::InvalidBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(HttpConfigurationSource {
            client,
            base_url,
            application_id: config.application_id.clone(),
            environment_id: config.environment_id.clone(),
        })
    }

    fn configuration_url(&self, profile_id: &str, flag_keys: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so path segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "applications",
                self.application_id.as_str(),
                "environments",
                self.environment_id.as_str(),
                "configurations",
                profile_id,
            ]);
        }
        if !flag_keys.is_empty() {
            let mut query = url.query_pairs_mut();
            for key in flag_keys {
                query.append_pair("flag", key);
            }
        }
        url
    }

    /// Issue a GET request and parse the JSON body. Returns `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        log::debug!(target: "appconfig", url:display = url; "requesting configuration");
        let response = self.client.get(url).send().await.map_err(|err| {
            log::warn!(target: "appconfig", "error while fetching configuration: {:?}", err);
            Error::from(err)
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(|err| {
            log::warn!(target: "appconfig", "received non-200 response while fetching configuration: {:?}", err.status());
            Error::from(err)
        })?;

        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body).map_err(|err| {
            log::warn!(target: "appconfig", "failed to parse configuration response body: {:?}", err);
            Error::from(err)
        })?;

        Ok(Some(value))
    }
}

#[async_trait]
impl ConfigurationSource for HttpConfigurationSource {
    async fn fetch_configuration(&self, profile_id: &str) -> Result<ConfigurationDocument> {
        let url = self.configuration_url(profile_id, &[]);
        let document = self
            .get_json(url)
            .await?
            .ok_or(Error::UnexpectedStatus(StatusCode::NOT_FOUND))?;

        log::debug!(target: "appconfig", profile_id; "successfully fetched configuration");
        Ok(document)
    }

    async fn fetch_flag(
        &self,
        profile_id: &str,
        flag_key: &str,
    ) -> Result<Option<FlagDefinition>> {
        let url = self.configuration_url(profile_id, &[flag_key]);
        self.get_json(url).await
    }

    async fn fetch_flags(
        &self,
        profile_id: &str,
        flag_keys: &[String],
    ) -> Result<ConfigurationDocument> {
        let keys: Vec<&str> = flag_keys.iter().map(String::as_str).collect();
        match keys.as_slice() {
            [] => Ok(ConfigurationDocument::new()),
            // The agent flattens a single requested flag into the top-level object.
            [key] => {
                let url = self.configuration_url(profile_id, &keys);
                let flat: Option<serde_json::Value> = self.get_json(url).await?;
                Ok(flat
                    .map(|flag| ConfigurationDocument::from_iter([(key.to_string(), flag)]))
                    .unwrap_or_default())
            }
            _ => {
                let url = self.configuration_url(profile_id, &keys);
                Ok(self.get_json(url).await?.unwrap_or_default())
            }
        }
    }
}
