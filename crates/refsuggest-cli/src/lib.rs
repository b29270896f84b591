//! refsuggest-cli
//! ==============
//!
//! Command-line interface for the `refsuggest-core` autocomplete engine.
//!
//! This crate primarily provides a binary (`refsuggest`). The library target
//! only exists so that docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! refsuggest --source 'data/zip_city_{partition}.json.gz' partitions
//! refsuggest --source 'data/zip_city_{partition}.json.gz' -p europe countries
//! refsuggest --source 'data/zip_city_{partition}.json.gz' -p europe -c FR search pari
//! refsuggest --kind institution --source data/colleges.json search "bost univ"
//! refsuggest --source 'https://cdn.example.org/zip_city_{partition}.json.gz' \
//!     session --detect focus type:bo wait:300 down enter
//! ```
//!
//! The dataset location can also come from `REFSUGGEST_DATASET_URL`; flags win
//! over the environment. Use `RUST_LOG` or `-v` for logs on stderr.
#![cfg_attr(docsrs, feature(doc_cfg))]

// Intentionally no API; the binary is the deliverable.
