// crates/refsuggest-core/src/config.rs
//! Environment-driven configuration.
//!
//! | Variable                 | Default                 |
//! |--------------------------|-------------------------|
//! | `REFSUGGEST_DATASET_URL` | unset                   |
//! | `REFSUGGEST_GEO_URL`     | `https://ipapi.co/json` |
//! | `REFSUGGEST_DEBOUNCE_MS` | `250`                   |
//! | `REFSUGGEST_LIMIT`       | `8`                     |
//! | `REFSUGGEST_THRESHOLD`   | `0.3`                   |
//!
//! A value that fails to parse is reported with `warn!` and the default is
//! kept.

use crate::controller::ControllerConfig;
use crate::loader::SourceTemplate;
use crate::locale::ResolverConfig;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const ENV_DATASET_URL: &str = "REFSUGGEST_DATASET_URL";
pub const ENV_GEO_URL: &str = "REFSUGGEST_GEO_URL";
pub const ENV_DEBOUNCE_MS: &str = "REFSUGGEST_DEBOUNCE_MS";
pub const ENV_LIMIT: &str = "REFSUGGEST_LIMIT";
pub const ENV_THRESHOLD: &str = "REFSUGGEST_THRESHOLD";

#[derive(Debug, Clone, Default)]
pub struct SuggestConfig {
    /// Dataset location, `{partition}` substituted per partition.
    pub dataset: Option<SourceTemplate>,
    pub resolver: ResolverConfig,
    pub controller: ControllerConfig,
}

impl SuggestConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SuggestConfig::from_env`], reading from `lookup` instead of
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_DATASET_URL).filter(|s| !s.trim().is_empty()) {
            config.dataset = Some(SourceTemplate::new(url.trim()));
        }
        if let Some(url) = lookup(ENV_GEO_URL).filter(|s| !s.trim().is_empty()) {
            config.resolver.endpoint = url.trim().to_owned();
        }

        let ctrl = &mut config.controller;
        if let Some(ms) = try_load::<u64>(&lookup, ENV_DEBOUNCE_MS) {
            ctrl.debounce = Duration::from_millis(ms);
        }
        if let Some(limit) = try_load::<usize>(&lookup, ENV_LIMIT) {
            ctrl.limit = limit;
        }
        if let Some(threshold) = try_load::<f64>(&lookup, ENV_THRESHOLD) {
            ctrl.matching = ctrl.matching.clone().with_threshold(threshold);
        }
        config
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            debug!("{key} set to {raw}");
            Some(value)
        }
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> SuggestConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SuggestConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let c = from(&[]);
        assert!(c.dataset.is_none());
        assert_eq!(c.controller, ControllerConfig::default());
        assert_eq!(c.resolver.endpoint, "https://ipapi.co/json");
    }

    #[test]
    fn reads_overrides() {
        let c = from(&[
            (ENV_DATASET_URL, "data/zip_city_{partition}.json.gz"),
            (ENV_DEBOUNCE_MS, "120"),
            (ENV_LIMIT, " 5 "),
            (ENV_THRESHOLD, "0.2"),
        ]);
        assert!(c.dataset.unwrap().is_partitioned());
        assert_eq!(c.controller.debounce, Duration::from_millis(120));
        assert_eq!(c.controller.limit, 5);
        assert_eq!(c.controller.matching.threshold, 0.2);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let c = from(&[(ENV_LIMIT, "many"), (ENV_DEBOUNCE_MS, "-1")]);
        assert_eq!(c.controller.limit, 8);
        assert_eq!(c.controller.debounce, Duration::from_millis(250));
    }
}
