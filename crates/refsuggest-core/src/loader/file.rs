// crates/refsuggest-core/src/loader/file.rs
use super::{DatasetSource, SourceTemplate};
use crate::error::{LookupError, Result};
use crate::locale::PartitionKey;
use std::path::PathBuf;

/// Reads partition payloads from disk.
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    template: SourceTemplate,
}

impl FileDatasetSource {
    pub fn new(template: SourceTemplate) -> Self {
        Self { template }
    }

    pub fn path_for(&self, key: &PartitionKey) -> PathBuf {
        PathBuf::from(self.template.resolve(key))
    }
}

impl DatasetSource for FileDatasetSource {
    async fn fetch(&self, key: &PartitionKey) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        tokio::fs::read(&path).await.map_err(|e| {
            LookupError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
        })
    }

    fn describe(&self, key: &PartitionKey) -> String {
        self.path_for(key).display().to_string()
    }
}
