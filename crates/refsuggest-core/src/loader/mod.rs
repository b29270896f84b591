// crates/refsuggest-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (transport, decompression) and the per-partition
//! cache in front of it.
//!
//! - [`DatasetSource`] fetches the raw payload for one partition. The HTTP and
//!   file-system sources resolve a [`SourceTemplate`], so the payload location
//!   is a pure function of the [`PartitionKey`].
//! - [`decode_payload`] sniffs gzip / zlib / plain JSON and parses records.
//! - [`DatasetProvider`] memoizes decoded partitions and shares one in-flight
//!   fetch between concurrent callers.

mod common_io;
mod file;
#[cfg(feature = "http")]
mod http;
mod provider;

pub use common_io::{decode_payload, sniff, PayloadEncoding};
pub use file::FileDatasetSource;
#[cfg(feature = "http")]
pub use http::HttpDatasetSource;
pub use provider::{DatasetProvider, LoadOutcome};

use crate::error::Result;
use crate::locale::PartitionKey;
use std::future::Future;

/// Placeholder substituted with the partition key in a [`SourceTemplate`].
pub const PARTITION_PLACEHOLDER: &str = "{partition}";

/// Fetches the raw (possibly compressed) payload of one partition.
pub trait DatasetSource: Send + Sync + 'static {
    fn fetch(&self, key: &PartitionKey) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Where `key` is fetched from, for logs.
    fn describe(&self, key: &PartitionKey) -> String;
}

/// URL or path pattern addressing one shard per partition.
///
/// ```rust
/// use refsuggest_core::loader::SourceTemplate;
/// use refsuggest_core::locale::PartitionKey;
///
/// let t = SourceTemplate::new("https://cdn.example.org/zip_city_{partition}.json.gz");
/// assert_eq!(
///     t.resolve(&PartitionKey::from("europe")),
///     "https://cdn.example.org/zip_city_europe.json.gz"
/// );
/// ```
///
/// A template without the placeholder addresses the same global payload for
/// every partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate(String);

impl SourceTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn resolve(&self, key: &PartitionKey) -> String {
        self.0.replace(PARTITION_PLACEHOLDER, key.as_str())
    }

    pub fn is_partitioned(&self) -> bool {
        self.0.contains(PARTITION_PLACEHOLDER)
    }

    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
