// crates/refsuggest-core/src/locale/resolver.rs
use super::{partition_for_country, Locale, PartitionKey};
use crate::error::{LookupError, Result};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipapi.co/json";
pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(3);

/// The fields we read from an IP-geolocation response.
///
/// Shaped after ipapi.co: `country` is the ISO2 code, `country_name` the
/// display name. Rate-limited responses carry `error: true` and a `reason`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoResponse {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Source of the caller's country.
pub trait GeoLocator: Send + Sync + 'static {
    fn locate(&self) -> impl Future<Output = Result<GeoResponse>> + Send;
}

/// [`GeoLocator`] backed by an HTTP GET against a geolocation service.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "http")]
impl HttpGeoLocator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(feature = "http")]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self) -> Result<GeoResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<GeoResponse>().await?)
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub default_partition: PartitionKey,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEO_ENDPOINT.to_owned(),
            timeout: DEFAULT_GEO_TIMEOUT,
            default_partition: PartitionKey::default(),
        }
    }
}

/// Maps the caller's detected country to a [`PartitionKey`].
///
/// Detection failures (network error, malformed response, timeout) are not
/// errors for [`LocaleResolver::resolve`]: it falls back to the configured
/// default partition and logs a warning.
pub struct LocaleResolver<G> {
    locator: G,
    config: ResolverConfig,
}

impl<G: GeoLocator> LocaleResolver<G> {
    pub fn new(locator: G, config: ResolverConfig) -> Self {
        Self { locator, config }
    }

    pub fn default_partition(&self) -> &PartitionKey {
        &self.config.default_partition
    }

    pub async fn resolve(&self) -> PartitionKey {
        self.resolve_locale().await.partition
    }

    pub async fn resolve_locale(&self) -> Locale {
        match self.try_detect().await {
            Ok(locale) => locale,
            Err(e) => {
                warn!(error = %e, default = %self.config.default_partition, "geolocation unavailable, using default partition");
                Locale::fallback(self.config.default_partition.clone())
            }
        }
    }

    pub async fn try_detect(&self) -> Result<Locale> {
        let response = tokio::time::timeout(self.config.timeout, self.locator.locate())
            .await
            .map_err(|_| LookupError::Timeout(self.config.timeout))??;

        if response.error {
            return Err(LookupError::InvalidData(format!(
                "geolocation service refused: {}",
                response.reason.as_deref().unwrap_or("unknown reason")
            )));
        }

        let country_code = non_empty(response.country);
        let country_name = non_empty(response.country_name);
        if country_code.is_none() && country_name.is_none() {
            return Err(LookupError::InvalidData(
                "geolocation response carries no country".into(),
            ));
        }

        let partition = country_code
            .as_deref()
            .and_then(partition_for_country)
            .unwrap_or_else(|| self.config.default_partition.clone());

        debug!(?country_code, ?country_name, %partition, "locale detected");
        Ok(Locale {
            partition,
            country_code,
            country_name,
        })
    }
}

#[cfg(feature = "http")]
impl LocaleResolver<HttpGeoLocator> {
    pub fn http(config: ResolverConfig) -> Self {
        let locator = HttpGeoLocator::new(config.endpoint.clone());
        Self::new(locator, config)
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<GeoResponse>);

    impl GeoLocator for Fixed {
        async fn locate(&self) -> Result<GeoResponse> {
            self.0
                .clone()
                .ok_or_else(|| LookupError::NotFound("offline".into()))
        }
    }

    struct Hanging;

    impl GeoLocator for Hanging {
        async fn locate(&self) -> Result<GeoResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(GeoResponse::default())
        }
    }

    fn response(code: &str, name: &str) -> GeoResponse {
        GeoResponse {
            country: Some(code.into()),
            country_name: Some(name.into()),
            ..GeoResponse::default()
        }
    }

    #[tokio::test]
    async fn maps_detected_country_through_table() {
        let resolver = LocaleResolver::new(Fixed(Some(response("DE", "Germany"))), ResolverConfig::default());
        let locale = resolver.resolve_locale().await;
        assert_eq!(locale.partition.as_str(), "europe");
        assert_eq!(locale.country_name.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn unmapped_country_falls_back_but_keeps_country() {
        let resolver = LocaleResolver::new(Fixed(Some(response("AQ", "Antarctica"))), ResolverConfig::default());
        let locale = resolver.resolve_locale().await;
        assert_eq!(locale.partition.as_str(), "us");
        assert_eq!(locale.country_code.as_deref(), Some("AQ"));
    }

    #[tokio::test]
    async fn failures_degrade_to_default() {
        let offline = LocaleResolver::new(Fixed(None), ResolverConfig::default());
        assert_eq!(offline.resolve().await.as_str(), "us");

        let limited = LocaleResolver::new(
            Fixed(Some(GeoResponse {
                error: true,
                reason: Some("RateLimited".into()),
                ..GeoResponse::default()
            })),
            ResolverConfig::default(),
        );
        assert!(matches!(limited.try_detect().await, Err(LookupError::InvalidData(_))));
        assert_eq!(limited.resolve_locale().await, Locale::fallback(PartitionKey::default()));

        let empty = LocaleResolver::new(Fixed(Some(GeoResponse::default())), ResolverConfig::default());
        assert!(empty.try_detect().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_degrades_to_default() {
        let config = ResolverConfig {
            timeout: Duration::from_millis(500),
            default_partition: PartitionKey::from("europe"),
            ..ResolverConfig::default()
        };
        let resolver = LocaleResolver::new(Hanging, config);
        assert!(matches!(resolver.try_detect().await, Err(LookupError::Timeout(_))));
        assert_eq!(resolver.resolve().await.as_str(), "europe");
    }

    #[test]
    fn parses_ipapi_shape() {
        let body = r#"{"ip":"1.2.3.4","country":"FR","country_name":"France","country_code":"FR","city":"Paris"}"#;
        let parsed: GeoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed, response("FR", "France"));
    }
}
