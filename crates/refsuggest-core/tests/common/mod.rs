#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use parking_lot::Mutex;
use refsuggest_core::error::{LookupError, Result};
use refsuggest_core::loader::DatasetSource;
use refsuggest_core::locale::{GeoLocator, GeoResponse, PartitionKey};
use refsuggest_core::model::{InstitutionRecord, LocationRecord, SelectionValue};
use refsuggest_core::FormSink;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

/// In-memory partitions, gzip-encoded, served after `delay`.
#[derive(Clone, Default)]
pub struct MemorySource {
    payloads: Arc<HashMap<PartitionKey, Vec<u8>>>,
    delay: Duration,
    fetches: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
    log: Arc<Mutex<Vec<PartitionKey>>>,
}

impl MemorySource {
    pub fn new(partitions: &[(&str, serde_json::Value)]) -> Self {
        let payloads = partitions
            .iter()
            .map(|(key, json)| (PartitionKey::from(*key), gzip(json.to_string().as_bytes())))
            .collect();
        Self {
            payloads: Arc::new(payloads),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The next `n` fetches fail as if the network were down.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<PartitionKey> {
        self.log.lock().clone()
    }
}

impl DatasetSource for MemorySource {
    async fn fetch(&self, key: &PartitionKey) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(key.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LookupError::InvalidData(format!("{key} unreachable")));
        }
        self.payloads
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("no partition {key}")))
    }

    fn describe(&self, key: &PartitionKey) -> String {
        format!("memory://{key}")
    }
}

/// Geolocation stub answering after `delay`.
pub struct ScriptedLocator {
    pub response: Option<GeoResponse>,
    pub delay: Duration,
}

impl ScriptedLocator {
    pub fn country(code: &str, name: &str, delay: Duration) -> Self {
        Self {
            response: Some(GeoResponse {
                country: Some(code.into()),
                country_name: Some(name.into()),
                ..GeoResponse::default()
            }),
            delay,
        }
    }

    pub fn offline() -> Self {
        Self {
            response: None,
            delay: Duration::ZERO,
        }
    }
}

impl GeoLocator for ScriptedLocator {
    async fn locate(&self) -> Result<GeoResponse> {
        tokio::time::sleep(self.delay).await;
        self.response
            .clone()
            .ok_or_else(|| LookupError::NotFound("offline".into()))
    }
}

/// Form stand-in recording every update.
#[derive(Default)]
pub struct RecordingForm(Mutex<Vec<(String, SelectionValue)>>);

impl RecordingForm {
    pub fn updates(&self) -> Vec<(String, SelectionValue)> {
        self.0.lock().clone()
    }
}

impl FormSink for RecordingForm {
    fn on_change(&self, field_id: &str, value: SelectionValue) {
        self.0.lock().push((field_id.to_owned(), value));
    }
}

pub fn colleges() -> Vec<InstitutionRecord> {
    vec![
        InstitutionRecord::new("Stanford University", "US"),
        InstitutionRecord::new("Boston University", "US"),
        InstitutionRecord::new("Boston College", "US"),
        InstitutionRecord::new("Sorbonne Université", "FR"),
    ]
}

pub fn colleges_json() -> serde_json::Value {
    serde_json::to_value(colleges()).unwrap()
}

pub fn us_locations() -> serde_json::Value {
    serde_json::json!([
        { "zip": "10001", "city": "Paris", "state": "TX", "country": "US" },
        { "zip": 94105, "city": "San Francisco", "state": "CA", "country": "US" },
        { "zip": "02108", "city": "Boston", "state": "MA", "country": "US" }
    ])
}

pub fn europe_locations() -> serde_json::Value {
    serde_json::json!([
        { "zip": "75001", "city": "Paris", "state": "IDF", "country": "France" },
        { "zip": "10115", "city": "Berlin", "state": "BE", "country": "Germany" },
        { "postalCode": "69001", "city": "Lyon", "state": "ARA", "country": "France" }
    ])
}

pub fn location(zip: &str, city: &str, state: &str, country: &str) -> LocationRecord {
    LocationRecord::new(zip, city, state, country)
}
