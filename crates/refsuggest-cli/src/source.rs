use anyhow::{bail, Result};
use refsuggest_core::loader::{DatasetSource, FileDatasetSource, SourceTemplate};
#[cfg(feature = "http")]
use refsuggest_core::loader::HttpDatasetSource;
use refsuggest_core::locale::PartitionKey;

/// File or HTTP source, picked from the shape of the template.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileDatasetSource),
    #[cfg(feature = "http")]
    Http(HttpDatasetSource),
}

impl AnySource {
    pub fn from_template(template: SourceTemplate) -> Result<Self> {
        if template.is_remote() {
            #[cfg(feature = "http")]
            return Ok(Self::Http(HttpDatasetSource::new(template)));
            #[cfg(not(feature = "http"))]
            bail!("{} is remote but this build has no 'http' feature", template.as_str());
        }
        if template.as_str().trim().is_empty() {
            bail!("empty dataset source");
        }
        Ok(Self::File(FileDatasetSource::new(template)))
    }
}

impl DatasetSource for AnySource {
    async fn fetch(&self, key: &PartitionKey) -> refsuggest_core::Result<Vec<u8>> {
        match self {
            Self::File(s) => s.fetch(key).await,
            #[cfg(feature = "http")]
            Self::Http(s) => s.fetch(key).await,
        }
    }

    fn describe(&self, key: &PartitionKey) -> String {
        match self {
            Self::File(s) => s.describe(key),
            #[cfg(feature = "http")]
            Self::Http(s) => s.describe(key),
        }
    }
}
