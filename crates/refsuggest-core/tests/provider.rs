mod common;

use common::{colleges, colleges_json, europe_locations, us_locations, MemorySource};
use refsuggest_core::loader::DatasetProvider;
use refsuggest_core::locale::PartitionKey;
use refsuggest_core::model::{InstitutionRecord, LocationRecord};
use refsuggest_core::LookupError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn locations() -> (DatasetProvider<LocationRecord, MemorySource>, MemorySource) {
    let source = MemorySource::new(&[("us", us_locations()), ("europe", europe_locations())])
        .with_delay(Duration::from_millis(50));
    (DatasetProvider::new(source.clone()), source)
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_share_one_fetch() {
    let (provider, source) = locations();
    let key = PartitionKey::from("us");

    let (a, b, c) = tokio::join!(provider.load(&key), provider.load(&key), provider.load(&key));
    assert_eq!(a.len(), 3);
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(source.fetches(), 1);
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn loaded_partition_is_served_from_memory() {
    let (provider, source) = locations();
    let us = PartitionKey::from("us");
    let europe = PartitionKey::from("europe");

    provider.load(&us).await;
    provider.load(&europe).await;
    let again = provider.load(&us).await;

    assert_eq!(again[1], LocationRecord::new("94105", "San Francisco", "CA", "US"));
    assert_eq!(source.fetched(), vec![us.clone(), europe]);
    assert!(provider.cached(&us).is_some());
}

#[tokio::test(start_paused = true)]
async fn failure_degrades_to_empty_and_is_not_cached() {
    let (provider, source) = locations();
    let asia = PartitionKey::from("asia");

    assert!(provider.load(&asia).await.is_empty());
    let err = provider.try_load(&asia).await.unwrap_err();
    assert!(matches!(*err, LookupError::NotFound(_)));
    assert_eq!(source.fetches(), 2);
    assert!(provider.cached(&asia).is_none());
    assert!(!provider.is_loading(&asia));
}

#[tokio::test(start_paused = true)]
async fn malformed_payload_is_an_error() {
    let source = MemorySource::new(&[("us", serde_json::json!({ "not": "an array" }))]);
    let provider: DatasetProvider<LocationRecord, _> = DatasetProvider::new(source);
    let err = provider.try_load(&PartitionKey::from("us")).await.unwrap_err();
    assert!(matches!(*err, LookupError::Json(_)));
}

#[tokio::test(start_paused = true)]
async fn fetch_completes_after_caller_gives_up() {
    let (provider, source) = locations();
    let key = PartitionKey::from("europe");

    let gave_up = tokio::time::timeout(Duration::from_millis(10), provider.load(&key)).await;
    assert!(gave_up.is_err());
    assert!(provider.is_loading(&key));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(provider.cached(&key).map(|d| d.len()), Some(3));
    provider.load(&key).await;
    assert_eq!(source.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn clear_forces_refetch() {
    let (provider, source) = locations();
    let key = PartitionKey::from("us");
    provider.load(&key).await;
    provider.clear();
    assert!(provider.cached(&key).is_none());
    provider.load(&key).await;
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn stats_count_records_and_countries() {
    let source = MemorySource::new(&[("us", colleges_json())]);
    let provider: DatasetProvider<InstitutionRecord, _> = DatasetProvider::new(source);
    let key = PartitionKey::from("us");
    assert!(provider.stats(&key).is_none());

    let data = provider.load(&key).await;
    assert_eq!(&*data, colleges().as_slice());
    let stats = provider.stats(&key).unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.countries, 2);
}

#[tokio::test]
async fn decoding_a_large_partition_leaves_timers_running() {
    let rows: Vec<serde_json::Value> = (0..100_000)
        .map(|i| serde_json::json!({ "zip": format!("{i:05}"), "city": format!("City {i}"), "state": "ST", "country": "US" }))
        .collect();
    let provider: DatasetProvider<LocationRecord, _> =
        DatasetProvider::new(MemorySource::new(&[("us", serde_json::Value::Array(rows))]));

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = Arc::clone(&ticks);
        tokio::spawn(async move {
            let mut every_ms = tokio::time::interval(Duration::from_millis(1));
            loop {
                every_ms.tick().await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
    };
    tokio::task::yield_now().await;

    let before = ticks.load(Ordering::SeqCst);
    let data = provider.try_load(&PartitionKey::from("us")).await.unwrap();
    let during = ticks.load(Ordering::SeqCst) - before;
    ticker.abort();

    assert_eq!(data.len(), 100_000);
    assert!(during >= 3, "timer starved while decoding: {during} ticks");
}
