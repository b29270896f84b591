// crates/refsuggest-core/src/lib.rs

//! # refsuggest-core
//!
//! Autocomplete over static reference data (institutions, postal locations).
//!
//! - [`locale`] picks the dataset partition for the caller (IP geolocation,
//!   falling back to `"us"`).
//! - [`loader`] fetches, decompresses and caches partitions, sharing one
//!   in-flight fetch between widgets.
//! - [`search`] ranks records against a typed query.
//! - [`controller`] is the synchronous input / debounce / keyboard state
//!   machine of one field; [`widget`] runs it on a tokio task.
//! - [`emitter`] reports committed selections to the hosting form.

pub mod common;
pub mod config;
pub mod controller;
pub mod emitter;
pub mod error;
pub mod loader;
pub mod locale;
pub mod model;
pub mod search;
pub mod text;
pub mod traits;
pub mod widget;

// Re-exports
pub use crate::common::{country_options, DatasetStats};
pub use crate::config::SuggestConfig;
pub use crate::controller::{
    ControllerConfig, DropdownState, Key, KeyOutcome, QueryState, SuggestionController,
};
pub use crate::emitter::{Commit, FormSink, SelectionEmitter};
pub use crate::error::{LookupError, Result};
pub use crate::loader::{DatasetProvider, DatasetSource, FileDatasetSource, SourceTemplate};
#[cfg(feature = "http")]
pub use crate::loader::HttpDatasetSource;
pub use crate::locale::{CountryScope, Locale, LocaleResolver, PartitionKey, PartitionSelection};
pub use crate::model::{InstitutionRecord, LocationRecord, SelectionValue};
pub use crate::search::{FuzzyMatcher, MatchOptions};
pub use crate::traits::ReferenceRecord;
pub use crate::widget::{SuggestWidget, ViewState, WidgetHandle};
