use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::adapters::{fetch_json, trim_base_url, NumberOrString};
use crate::data_source::SentimentSource;
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{AggregatorError, ProviderId, SentimentClass, SentimentReading};

pub const DEFAULT_BASE_URL: &str = "https://api.alternative.me";

/// Alternative.me Fear & Greed Index adapter. The endpoint is keyless.
#[derive(Clone)]
pub struct FearGreedAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl FearGreedAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_current(&self) -> Result<SentimentReading, AggregatorError> {
        let request = HttpRequest::get(format!("{}/fng/", self.base_url))
            .with_query("limit", "1")
            .with_timeout_ms(self.timeout_ms);

        let payload: FearGreedResponse = fetch_json(
            self.http_client.as_ref(),
            ProviderId::AlternativeMe,
            request,
            None,
        )
        .await?;
        normalize_reading(payload)
    }
}

impl SentimentSource for FearGreedAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::AlternativeMe
    }

    fn current<'a>(&'a self) -> BoxFuture<'a, Result<SentimentReading, AggregatorError>> {
        Box::pin(self.fetch_current())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FearGreedResponse {
    #[serde(default)]
    data: Vec<FearGreedEntry>,
    #[serde(default)]
    metadata: Option<FearGreedMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct FearGreedEntry {
    value: NumberOrString,
    #[serde(default)]
    value_classification: Option<String>,
    #[serde(default)]
    timestamp: Option<NumberOrString>,
}

#[derive(Debug, Clone, Deserialize)]
struct FearGreedMetadata {
    #[serde(default)]
    error: Option<String>,
}

fn normalize_reading(payload: FearGreedResponse) -> Result<SentimentReading, AggregatorError> {
    if let Some(error) = payload.metadata.and_then(|metadata| metadata.error) {
        return Err(AggregatorError::upstream(format!(
            "alternative.me reported error: {error}"
        )));
    }

    let entry = payload
        .data
        .into_iter()
        .next()
        .ok_or_else(|| AggregatorError::not_found("alternative.me returned no readings"))?;

    let value = entry.value.as_i64().ok_or_else(|| {
        AggregatorError::upstream(format!(
            "alternative.me index value is not numeric: {:?}",
            entry.value
        ))
    })?;

    let classification = entry
        .value_classification
        .as_deref()
        .and_then(SentimentClass::from_label);
    let timestamp = entry
        .timestamp
        .as_ref()
        .and_then(NumberOrString::as_i64)
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok());

    SentimentReading::new(value, classification, timestamp)
        .map_err(|error| AggregatorError::upstream(format!("alternative.me {error}")))
}
