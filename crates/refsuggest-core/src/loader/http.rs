// crates/refsuggest-core/src/loader/http.rs
use super::{DatasetSource, SourceTemplate};
use crate::error::Result;
use crate::locale::PartitionKey;

/// Fetches partition payloads with an HTTP GET against a content endpoint.
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    client: reqwest::Client,
    template: SourceTemplate,
}

impl HttpDatasetSource {
    pub fn new(template: SourceTemplate) -> Self {
        Self::with_client(reqwest::Client::new(), template)
    }

    pub fn with_client(client: reqwest::Client, template: SourceTemplate) -> Self {
        Self { client, template }
    }
}

impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self, key: &PartitionKey) -> Result<Vec<u8>> {
        let url = self.template.resolve(key);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self, key: &PartitionKey) -> String {
        self.template.resolve(key)
    }
}
