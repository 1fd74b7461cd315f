use crate::adapters::{coinapi, coinmarketcap, fear_greed, newsapi};
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::{ProviderId, ValidationError};

/// Upstream base URLs. Overridden in tests to point at local fakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub coinapi: String,
    pub coinmarketcap: String,
    pub newsapi: String,
    pub alternative_me: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            coinapi: String::from(coinapi::DEFAULT_BASE_URL),
            coinmarketcap: String::from(coinmarketcap::DEFAULT_BASE_URL),
            newsapi: String::from(newsapi::DEFAULT_BASE_URL),
            alternative_me: String::from(fear_greed::DEFAULT_BASE_URL),
        }
    }
}

/// Everything the aggregator needs, built once at startup and passed by value.
#[derive(Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub price_provider: ProviderId,
    pub coinapi_key: String,
    pub coinmarketcap_key: Option<String>,
    pub news_api_key: String,
    pub timeout_ms: u64,
    pub endpoints: UpstreamEndpoints,
}

impl AggregatorConfig {
    pub fn new(coinapi_key: impl Into<String>, news_api_key: impl Into<String>) -> Self {
        Self {
            price_provider: ProviderId::CoinApi,
            coinapi_key: coinapi_key.into(),
            coinmarketcap_key: None,
            news_api_key: news_api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: UpstreamEndpoints::default(),
        }
    }

    pub fn with_coinmarketcap(mut self, api_key: impl Into<String>) -> Self {
        self.price_provider = ProviderId::CoinMarketCap;
        self.coinmarketcap_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_endpoints(mut self, endpoints: UpstreamEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.price_provider {
            ProviderId::CoinApi => Ok(()),
            ProviderId::CoinMarketCap if self.coinmarketcap_key.is_some() => Ok(()),
            other => Err(ValidationError::InvalidProvider {
                value: other.as_str().to_owned(),
            }),
        }
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for AggregatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("price_provider", &self.price_provider)
            .field("coinapi_key", &redact(Some(&self.coinapi_key)))
            .field("coinmarketcap_key", &redact(self.coinmarketcap_key.as_ref()))
            .field("news_api_key", &redact(Some(&self.news_api_key)))
            .field("timeout_ms", &self.timeout_ms)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

fn redact(value: Option<&String>) -> &'static str {
    match value {
        Some(value) if !value.is_empty() => "<set>",
        _ => "<unset>",
    }
}
