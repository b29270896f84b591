// crates/refsuggest-core/src/locale/table.rs

//! Static country → partition lookup.
//!
//! Every widget kind reads this one table; unmapped countries fall back to
//! the default partition.

use super::{PartitionKey, DEFAULT_PARTITION};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// ISO 3166-1 alpha-2 code, dataset partition, English country name.
pub static REGION_TABLE: &[(&str, &str, &str)] = &[
    // North America
    ("US", "us", "United States"),
    ("CA", "mexico_canada", "Canada"),
    ("MX", "mexico_canada", "Mexico"),
    // South America
    ("AR", "south_america", "Argentina"),
    ("BR", "south_america", "Brazil"),
    ("CO", "south_america", "Colombia"),
    ("CL", "south_america", "Chile"),
    ("PE", "south_america", "Peru"),
    ("VE", "south_america", "Venezuela"),
    ("UY", "south_america", "Uruguay"),
    ("PY", "south_america", "Paraguay"),
    ("BO", "south_america", "Bolivia"),
    ("EC", "south_america", "Ecuador"),
    ("SR", "south_america", "Suriname"),
    // Europe
    ("GB", "europe", "United Kingdom"),
    ("FR", "europe", "France"),
    ("DE", "europe", "Germany"),
    ("IT", "europe", "Italy"),
    ("ES", "europe", "Spain"),
    ("NL", "europe", "Netherlands"),
    ("SE", "europe", "Sweden"),
    ("NO", "europe", "Norway"),
    ("FI", "europe", "Finland"),
    ("PL", "europe", "Poland"),
    ("RO", "europe", "Romania"),
    ("RU", "europe", "Russia"),
    ("UA", "europe", "Ukraine"),
    ("CH", "europe", "Switzerland"),
    ("BE", "europe", "Belgium"),
    ("DK", "europe", "Denmark"),
    ("PT", "europe", "Portugal"),
    ("CZ", "europe", "Czechia"),
    ("GR", "europe", "Greece"),
    ("HU", "europe", "Hungary"),
    ("SK", "europe", "Slovakia"),
    ("BG", "europe", "Bulgaria"),
    ("IE", "europe", "Ireland"),
    ("SI", "europe", "Slovenia"),
    ("HR", "europe", "Croatia"),
    // Asia
    ("CN", "asia", "China"),
    ("IN", "asia", "India"),
    ("JP", "asia", "Japan"),
    ("KR", "asia", "South Korea"),
    ("ID", "asia", "Indonesia"),
    ("PH", "asia", "Philippines"),
    ("TH", "asia", "Thailand"),
    ("VN", "asia", "Vietnam"),
    ("MY", "asia", "Malaysia"),
    ("PK", "asia", "Pakistan"),
    ("BD", "asia", "Bangladesh"),
    ("SA", "asia", "Saudi Arabia"),
    ("AE", "asia", "United Arab Emirates"),
    ("SG", "asia", "Singapore"),
    ("KZ", "asia", "Kazakhstan"),
    // Africa
    ("ZA", "africa", "South Africa"),
    ("NG", "africa", "Nigeria"),
    ("KE", "africa", "Kenya"),
    ("EG", "africa", "Egypt"),
    ("MA", "africa", "Morocco"),
    ("DZ", "africa", "Algeria"),
    ("ET", "africa", "Ethiopia"),
    ("GH", "africa", "Ghana"),
    ("TN", "africa", "Tunisia"),
    ("SN", "africa", "Senegal"),
    // Oceania
    ("AU", "oceania", "Australia"),
    ("NZ", "oceania", "New Zealand"),
    ("PG", "oceania", "Papua New Guinea"),
    ("FJ", "oceania", "Fiji"),
    // Caribbean
    ("JM", "caribbean", "Jamaica"),
    ("HT", "caribbean", "Haiti"),
    ("TT", "caribbean", "Trinidad and Tobago"),
    ("BB", "caribbean", "Barbados"),
    ("DO", "caribbean", "Dominican Republic"),
    ("BS", "caribbean", "Bahamas"),
    ("LC", "caribbean", "Saint Lucia"),
    ("GD", "caribbean", "Grenada"),
];

static REGION_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| REGION_TABLE.iter().map(|(code, p, _)| (*code, *p)).collect());

/// Partition for an ISO2 country code, `None` if the table has no entry.
///
/// ```rust
/// use refsuggest_core::locale::partition_for_country;
///
/// assert_eq!(partition_for_country("fr").unwrap().as_str(), "europe");
/// assert!(partition_for_country("XX").is_none());
/// ```
pub fn partition_for_country(iso2: &str) -> Option<PartitionKey> {
    let code = iso2.trim().to_ascii_uppercase();
    REGION_INDEX.get(code.as_str()).map(|p| PartitionKey::from(*p))
}

/// Like [`partition_for_country`], falling back to the default partition.
pub fn partition_or_default(iso2: Option<&str>) -> PartitionKey {
    iso2.and_then(partition_for_country)
        .unwrap_or_else(|| PartitionKey::from(DEFAULT_PARTITION))
}

/// Every partition named by the table, sorted.
pub fn known_partitions() -> Vec<PartitionKey> {
    REGION_TABLE
        .iter()
        .map(|(_, p, _)| *p)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(PartitionKey::from)
        .collect()
}

/// ISO2 codes mapped to `partition`, in table order.
pub fn countries_in(partition: &PartitionKey) -> Vec<&'static str> {
    REGION_TABLE
        .iter()
        .filter(|(_, p, _)| *p == partition.as_str())
        .map(|(c, _, _)| *c)
        .collect()
}

/// Code and name of every country mapped to `partition`.
///
/// Datasets spell `country` either way, so a partition filter accepts both.
pub fn country_spellings(partition: &PartitionKey) -> Vec<&'static str> {
    REGION_TABLE
        .iter()
        .filter(|(_, p, _)| *p == partition.as_str())
        .flat_map(|(c, _, name)| [*c, *name])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_country_uses_default() {
        assert_eq!(partition_or_default(Some("AQ")).as_str(), DEFAULT_PARTITION);
        assert_eq!(partition_or_default(None).as_str(), DEFAULT_PARTITION);
        assert_eq!(partition_or_default(Some(" mx ")).as_str(), "mexico_canada");
    }

    #[test]
    fn partitions_are_unique_and_sorted() {
        let parts = known_partitions();
        let names: Vec<_> = parts.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "africa",
                "asia",
                "caribbean",
                "europe",
                "mexico_canada",
                "oceania",
                "south_america",
                "us"
            ]
        );
        assert_eq!(countries_in(&PartitionKey::from("oceania")), vec!["AU", "NZ", "PG", "FJ"]);
    }

    #[test]
    fn spellings_cover_codes_and_names() {
        let us = country_spellings(&PartitionKey::from("us"));
        assert_eq!(us, vec!["US", "United States"]);
        assert!(country_spellings(&PartitionKey::from("atlantis")).is_empty());
    }

    #[test]
    fn table_has_no_duplicate_countries() {
        assert_eq!(REGION_INDEX.len(), REGION_TABLE.len());
    }
}
