// crates/refsuggest-core/src/common.rs
use crate::text::fold_key;
use crate::traits::ReferenceRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simple aggregate statistics for one loaded partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub records: usize,
    pub countries: usize,
}

impl DatasetStats {
    pub fn of<R: ReferenceRecord>(dataset: &[R]) -> Self {
        Self {
            records: dataset.len(),
            countries: country_options(dataset).len(),
        }
    }
}

/// Sorted, de-duplicated countries present in `dataset`.
///
/// Feeds the manual country selector. Spellings that differ only in case or
/// accents collapse to the first one seen; empty countries are skipped.
pub fn country_options<R: ReferenceRecord>(dataset: &[R]) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for rec in dataset {
        let country = rec.country().trim();
        if country.is_empty() {
            continue;
        }
        seen.entry(fold_key(country))
            .or_insert_with(|| country.to_owned());
    }
    seen.into_values().collect()
}
