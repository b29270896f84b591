//! refsuggest: command-line interface for refsuggest-core
//!
//! This binary exercises the autocomplete engine from a terminal. It can
//! print dataset statistics, list partitions and the countries inside one,
//! detect the partition for the current machine, rank a partition against a
//! query, and replay a scripted keyboard/mouse session against a live widget.
//!
//! Usage examples
//! --------------
//!
//! - Show record counts of the European partition
//!   $ refsuggest -s 'data/zip_city_{partition}.json.gz' -p europe stats
//!
//! - Which partition serves which countries
//!   $ refsuggest partitions
//!
//! - One-shot search, restricted to France
//!   $ refsuggest -s 'data/zip_city_{partition}.json.gz' -p europe -c FR search pari
//!
//! - Colleges, printed as the payload the form would receive
//!   $ refsuggest -k institution -s data/colleges.json search "bost univ" --json
//!
//! - Replay a session: type, wait out the debounce, highlight, commit
//!   $ refsuggest -s 'data/zip_city_{partition}.json.gz' session --detect \
//!       focus type:bo wait:300 down enter
//!
//! Data source
//! -----------
//!
//! `--source` (or `REFSUGGEST_DATASET_URL`) is a path or URL template;
//! `{partition}` is replaced by the partition key. Payloads may be gzip, zlib
//! or plain JSON.
mod args;
mod session;
mod source;

use crate::args::{CliArgs, Commands, Kind};
use crate::source::AnySource;
use anyhow::{Context, Result};
use clap::Parser;
use refsuggest_core::common::{country_options, DatasetStats};
use refsuggest_core::config::SuggestConfig;
use refsuggest_core::emitter::SelectionEmitter;
use refsuggest_core::loader::{DatasetProvider, SourceTemplate};
use refsuggest_core::locale::{countries_in, known_partitions, CountryScope, PartitionKey};
use refsuggest_core::model::{InstitutionRecord, LocationRecord, SelectionValue};
use refsuggest_core::search::FuzzyMatcher;
use refsuggest_core::traits::ReferenceRecord;
use refsuggest_core::widget::SuggestWidget;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = build_config(&args);
    match args.kind {
        Kind::Institution => run::<InstitutionRecord>(&args, config).await,
        Kind::Location => run::<LocationRecord>(&args, config).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Environment first, then flags on top.
fn build_config(args: &CliArgs) -> SuggestConfig {
    let mut config = SuggestConfig::from_env();

    if let Some(source) = &args.source {
        config.dataset = Some(SourceTemplate::new(source.as_str()));
    }
    if let Some(url) = &args.geo_url {
        config.resolver.endpoint = url.clone();
    }
    if let Some(partition) = &args.partition {
        config.resolver.default_partition = PartitionKey::new(partition);
    }
    let ctrl = &mut config.controller;
    if let Some(limit) = args.limit {
        ctrl.limit = limit;
    }
    if let Some(threshold) = args.threshold {
        ctrl.matching = ctrl.matching.clone().with_threshold(threshold);
    }
    if let Some(ms) = args.debounce_ms {
        ctrl.debounce = Duration::from_millis(ms);
    }
    config
}

async fn run<R: ReferenceRecord>(args: &CliArgs, config: SuggestConfig) -> Result<()> {
    match &args.command {
        Commands::Partitions => {
            for key in known_partitions() {
                println!("{key}: {}", countries_in(&key).join(", "));
            }
            return Ok(());
        }
        Commands::Resolve => return resolve(config).await,
        _ => {}
    }

    let template = config
        .dataset
        .clone()
        .context("no dataset source: pass --source or set REFSUGGEST_DATASET_URL")?;
    let provider: DatasetProvider<R, AnySource> =
        DatasetProvider::new(AnySource::from_template(template)?);
    let partition = config.resolver.default_partition.clone();

    match &args.command {
        Commands::Stats => {
            let data = provider
                .try_load(&partition)
                .await
                .with_context(|| format!("loading partition {partition}"))?;
            let stats = DatasetStats::of(&data);
            println!("Dataset statistics ({} / {partition}):", R::KIND);
            println!("  Records: {}", stats.records);
            println!("  Countries: {}", stats.countries);
        }

        Commands::Countries => {
            let data = provider
                .try_load(&partition)
                .await
                .with_context(|| format!("loading partition {partition}"))?;
            for country in country_options(&data) {
                println!("{country}");
            }
        }

        Commands::Search { query, json } => {
            let data = provider
                .try_load(&partition)
                .await
                .with_context(|| format!("loading partition {partition}"))?;
            let matcher = FuzzyMatcher::new(config.controller.matching.clone());
            let scope = match args.country.as_deref() {
                Some(country) => CountryScope::new(country),
                None => CountryScope::for_partition(&partition),
            };
            let results = matcher.search_scoped(&data, query, config.controller.limit, scope.as_ref());

            if *json {
                let values: Vec<SelectionValue> = results.iter().map(ReferenceRecord::to_value).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if results.is_empty() {
                eprintln!("No suggestions for: {query}");
            } else {
                for rec in &results {
                    println!("{}", rec.list_label());
                }
            }
        }

        Commands::Session { detect, steps } => {
            let steps = session::parse_steps(steps)?;
            let sink = |field: &str, value: SelectionValue| {
                let payload = serde_json::to_string(&value).unwrap_or_default();
                println!("commit {field}: {payload}");
            };
            let emitter = SelectionEmitter::new(R::KIND, Arc::new(sink));

            let mut widget = SuggestWidget::new(emitter, provider)
                .with_config(config.controller.clone())
                .with_default_partition(partition);
            if *detect {
                widget = with_detection(widget, &config)?;
            }
            let handle = widget.spawn();
            if let Some(country) = &args.country {
                handle.select_country(country.clone()).await;
            }

            session::replay(&handle, &steps).await;
            handle.unmount().await;
        }

        Commands::Partitions | Commands::Resolve => {}
    }
    Ok(())
}

#[cfg(feature = "http")]
fn with_detection<R: ReferenceRecord>(
    widget: SuggestWidget<R, AnySource>,
    config: &SuggestConfig,
) -> Result<SuggestWidget<R, AnySource>> {
    use refsuggest_core::locale::LocaleResolver;

    let resolver = LocaleResolver::http(config.resolver.clone());
    Ok(widget.with_resolver(Arc::new(resolver)))
}

#[cfg(not(feature = "http"))]
fn with_detection<R: ReferenceRecord>(
    _widget: SuggestWidget<R, AnySource>,
    _config: &SuggestConfig,
) -> Result<SuggestWidget<R, AnySource>> {
    anyhow::bail!("--detect needs the 'http' feature")
}

#[cfg(feature = "http")]
async fn resolve(config: SuggestConfig) -> Result<()> {
    use refsuggest_core::locale::LocaleResolver;

    let resolver = LocaleResolver::http(config.resolver);
    match resolver.try_detect().await {
        Ok(locale) => {
            println!("Partition: {}", locale.partition);
            println!("Country code: {}", locale.country_code.as_deref().unwrap_or("-"));
            println!("Country name: {}", locale.country_name.as_deref().unwrap_or("-"));
        }
        Err(e) => {
            eprintln!("Geolocation failed: {e}");
            println!("Partition: {} (default)", resolver.default_partition());
        }
    }
    Ok(())
}

#[cfg(not(feature = "http"))]
async fn resolve(_config: SuggestConfig) -> Result<()> {
    anyhow::bail!("locale detection needs the 'http' feature")
}
