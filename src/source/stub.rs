use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{ConfigStoreClient, ConfigurationDocument, Error, FlagDefinition, Result};

use super::ConfigurationSource;

/// Test source answering every request from one fixed document (or one fixed error) and
/// counting how many requests it served.
pub(crate) struct StubSource {
    response: Result<ConfigurationDocument>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn with_document(document: serde_json::Value) -> Self {
        let serde_json::Value::Object(document) = document else {
            panic!("stub document must be a JSON object");
        };
        Self::with_response(Ok(document))
    }

    /// The document in `tests/data/flags.json`.
    pub fn fixture() -> Self {
        let f = std::fs::File::open("tests/data/flags.json")
            .expect("Failed to open tests/data/flags.json");
        Self::with_document(serde_json::from_reader(std::io::BufReader::new(f)).unwrap())
    }

    pub fn failing() -> Self {
        Self::with_response(Err(Error::UnexpectedStatus(
            StatusCode::INTERNAL_SERVER_ERROR,
        )))
    }

    pub fn malformed() -> Self {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        Self::with_response(Err(err.into()))
    }

    fn with_response(response: Result<ConfigurationDocument>) -> Self {
        StubSource {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wrap the stub into a client with default profile `"profile"`, keeping a handle to
    /// inspect the call count.
    pub fn into_client(self) -> (ConfigStoreClient, Arc<StubSource>) {
        let stub = Arc::new(self);
        (ConfigStoreClient::new(stub.clone(), "profile"), stub)
    }

    fn respond(&self) -> Result<ConfigurationDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

#[async_trait]
impl ConfigurationSource for StubSource {
    async fn fetch_configuration(&self, _profile_id: &str) -> Result<ConfigurationDocument> {
        self.respond()
    }

    async fn fetch_flag(
        &self,
        _profile_id: &str,
        flag_key: &str,
    ) -> Result<Option<FlagDefinition>> {
        match self.respond()?.remove(flag_key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn fetch_flags(
        &self,
        _profile_id: &str,
        flag_keys: &[String],
    ) -> Result<ConfigurationDocument> {
        Ok(self
            .respond()?
            .into_iter()
            .filter(|(key, _)| flag_keys.contains(key))
            .collect())
    }
}
