// crates/refsuggest-core/src/locale/mod.rs

//! # Locale Resolution
//!
//! Decides which dataset partition applies to the current user. Detection is
//! best-effort (IP geolocation); a manual choice made through the UI wins for
//! the rest of the session.

mod resolver;
mod table;

pub use resolver::{GeoLocator, GeoResponse, LocaleResolver, ResolverConfig};
#[cfg(feature = "http")]
pub use resolver::HttpGeoLocator;
pub use table::{
    countries_in, country_spellings, known_partitions, partition_for_country,
    partition_or_default, REGION_TABLE,
};

use crate::text::fold_key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition used when nothing better is known.
pub const DEFAULT_PARTITION: &str = "us";

/// Locale-derived identifier selecting one dataset shard.
///
/// Keys are trimmed and lowercased on construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionKey(String);

impl PartitionKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PartitionKey {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION)
    }
}

impl From<&str> for PartitionKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PartitionKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of locale detection.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Locale {
    pub partition: PartitionKey,
    /// ISO2 code as reported by the geolocation service.
    pub country_code: Option<String>,
    /// Display name as reported by the geolocation service.
    pub country_name: Option<String>,
}

impl Locale {
    /// Locale used when detection failed: default partition, no country.
    pub fn fallback(partition: PartitionKey) -> Self {
        Self {
            partition,
            country_code: None,
            country_name: None,
        }
    }

    /// Whether the detected country belongs to `partition`.
    fn serves(&self, partition: &PartitionKey) -> bool {
        self.country_code.as_deref().and_then(partition_for_country).as_ref() == Some(partition)
    }

    /// Country pre-filter matching either the detected code or name.
    pub fn scope(&self) -> Option<CountryScope> {
        CountryScope::any_of(
            self.country_code
                .iter()
                .chain(self.country_name.iter())
                .map(String::as_str),
        )
    }
}

/// Hard country filter applied to location datasets before fuzzy scoring.
///
/// A record is admitted when its `country` equals any accepted spelling,
/// compared accent- and case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryScope {
    accepted: Vec<String>,
}

impl CountryScope {
    pub fn new(country: &str) -> Option<Self> {
        Self::any_of(std::iter::once(country))
    }

    pub fn any_of<'a>(spellings: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let accepted: Vec<String> = spellings
            .into_iter()
            .map(|s| fold_key(s.trim()))
            .filter(|s| !s.is_empty())
            .collect();
        if accepted.is_empty() {
            None
        } else {
            Some(Self { accepted })
        }
    }

    /// Every country the region table maps to `partition`. `None` for a
    /// partition the table does not know, which leaves the dataset unfiltered.
    pub fn for_partition(partition: &PartitionKey) -> Option<Self> {
        Self::any_of(country_spellings(partition))
    }

    pub fn admits(&self, country: &str) -> bool {
        let folded = fold_key(country.trim());
        self.accepted.iter().any(|a| *a == folded)
    }
}

/// Session-level partition choice: detected value plus manual override.
#[derive(Clone, Debug, Default)]
pub struct PartitionSelection {
    default: PartitionKey,
    detected: Option<Locale>,
    manual_partition: Option<PartitionKey>,
    manual_country: Option<String>,
}

impl PartitionSelection {
    pub fn new(default: PartitionKey) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    /// Partition that should be loaded right now.
    pub fn active(&self) -> PartitionKey {
        self.manual_partition
            .clone()
            .or_else(|| self.detected.as_ref().map(|l| l.partition.clone()))
            .unwrap_or_else(|| self.default.clone())
    }

    /// Country pre-filter currently in effect.
    ///
    /// A manual country wins. Otherwise the detected country applies while
    /// its partition is the active one, and anything else narrows to the
    /// countries of the active partition.
    pub fn scope(&self) -> Option<CountryScope> {
        if let Some(country) = &self.manual_country {
            return CountryScope::new(country);
        }
        let active = self.active();
        let detected = self
            .detected
            .as_ref()
            .filter(|l| self.manual_partition.is_none() && l.serves(&active))
            .and_then(Locale::scope);
        detected.or_else(|| CountryScope::for_partition(&active))
    }

    pub fn detected(&self) -> Option<&Locale> {
        self.detected.as_ref()
    }

    pub fn is_manual(&self) -> bool {
        self.manual_partition.is_some() || self.manual_country.is_some()
    }

    /// Record a detection result. Returns `true` if the active partition changed.
    ///
    /// A manual choice already made stays in force.
    pub fn apply_detected(&mut self, locale: Locale) -> bool {
        let before = self.active();
        self.detected = Some(locale);
        self.active() != before
    }

    /// Manual partition choice. Returns `true` if the active partition changed.
    pub fn select_partition(&mut self, key: PartitionKey) -> bool {
        let before = self.active();
        self.manual_partition = Some(key);
        self.manual_country = None;
        self.active() != before
    }

    /// Manual country choice. An ISO2 code known to the region table also
    /// selects its partition. Returns `true` if the active partition changed.
    pub fn select_country(&mut self, country: impl Into<String>) -> bool {
        let country = country.into();
        let before = self.active();
        if let Some(partition) = partition_for_country(&country) {
            self.manual_partition = Some(partition);
        }
        self.manual_country = Some(country);
        self.active() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> Locale {
        Locale {
            partition: PartitionKey::from("europe"),
            country_code: Some("FR".into()),
            country_name: Some("France".into()),
        }
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(PartitionKey::new("  Europe "), PartitionKey::from("europe"));
        assert_eq!(PartitionKey::default().as_str(), "us");
    }

    #[test]
    fn detection_applies_until_manual_choice() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        assert_eq!(sel.active().as_str(), "us");
        assert!(sel.apply_detected(france()));
        assert_eq!(sel.active().as_str(), "europe");
        assert!(sel.scope().unwrap().admits("france"));
        assert!(sel.scope().unwrap().admits("FR"));

        assert!(sel.select_partition(PartitionKey::from("asia")));
        let scope = sel.scope().unwrap();
        assert!(scope.admits("Japan") && scope.admits("KR"));
        assert!(!scope.admits("France"));
        assert!(!sel.apply_detected(france()));
        assert_eq!(sel.active().as_str(), "asia");
    }

    #[test]
    fn late_detection_keeps_manual_country() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        assert!(sel.select_country("JP"));
        assert_eq!(sel.active().as_str(), "asia");
        assert!(!sel.apply_detected(france()));
        assert!(sel.scope().unwrap().admits("jp"));
        assert!(!sel.scope().unwrap().admits("France"));
    }

    #[test]
    fn country_name_without_table_entry_keeps_partition() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        assert!(!sel.select_country("United States"));
        assert!(sel.scope().unwrap().admits("UNITED STATES"));
    }

    #[test]
    fn failed_detection_narrows_to_default_partition() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        assert!(!sel.apply_detected(Locale::fallback(PartitionKey::default())));
        let scope = sel.scope().unwrap();
        assert!(scope.admits("US") && scope.admits("united states"));
        assert!(!scope.admits("FR"));
    }

    #[test]
    fn unmapped_detected_country_falls_back_to_partition_scope() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        sel.apply_detected(Locale {
            partition: PartitionKey::default(),
            country_code: Some("AQ".into()),
            country_name: Some("Antarctica".into()),
        });
        let scope = sel.scope().unwrap();
        assert!(scope.admits("US"));
        assert!(!scope.admits("Antarctica"));
    }

    #[test]
    fn unknown_partition_is_unscoped() {
        let mut sel = PartitionSelection::new(PartitionKey::default());
        sel.select_partition(PartitionKey::from("fr"));
        assert!(sel.scope().is_none());
    }

    #[test]
    fn empty_scope_is_none() {
        assert!(CountryScope::new("  ").is_none());
        assert!(Locale::fallback(PartitionKey::default()).scope().is_none());
    }
}
