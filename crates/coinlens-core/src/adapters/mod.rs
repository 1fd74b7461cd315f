//! Upstream provider adapters.
//!
//! Each adapter owns its wire schema and a `normalize_*` function that turns
//! the payload into domain values. Transport and status handling is shared.

pub mod coinapi;
pub mod coinmarketcap;
pub mod fear_greed;
pub mod newsapi;

pub use coinapi::CoinApiAdapter;
pub use coinmarketcap::CoinMarketCapAdapter;
pub use fear_greed::FearGreedAdapter;
pub use newsapi::NewsApiAdapter;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{AggregatorError, ProviderId};

/// Sends `request` and maps transport failures, 429 and other non-2xx
/// statuses to the aggregator taxonomy. No retries.
pub(crate) async fn send(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
    secret_param: Option<&str>,
) -> Result<HttpResponse, AggregatorError> {
    send_accepting(client, provider, request, secret_param, &[]).await
}

/// Like [`send`], but hands back responses whose status is in `accepted` so
/// the adapter can read the error body itself.
pub(crate) async fn send_accepting(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
    secret_param: Option<&str>,
    accepted: &[u16],
) -> Result<HttpResponse, AggregatorError> {
    let url = request.redacted_url(secret_param);
    debug!(%provider, %url, "upstream request");

    let response = client.execute(request).await.map_err(|error| {
        warn!(%provider, %url, error = %error, "upstream transport failure");
        AggregatorError::upstream(format!("{provider} transport error: {}", error.message()))
    })?;

    if response.is_rate_limited() {
        warn!(%provider, %url, "upstream rate limited");
        return Err(AggregatorError::rate_limited(format!(
            "{provider} returned status 429"
        )));
    }

    if !response.is_success() && !accepted.contains(&response.status) {
        warn!(%provider, %url, status = response.status, "upstream returned error status");
        return Err(AggregatorError::upstream(format!(
            "{provider} returned status {}",
            response.status
        )));
    }

    Ok(response)
}

pub(crate) fn parse_json<T>(provider: ProviderId, body: &str) -> Result<T, AggregatorError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|error| {
        warn!(%provider, error = %error, "failed to parse upstream body");
        AggregatorError::upstream(format!("failed to parse {provider} response: {error}"))
    })
}

pub(crate) async fn fetch_json<T>(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
    secret_param: Option<&str>,
) -> Result<T, AggregatorError>
where
    T: DeserializeOwned,
{
    let response = send(client, provider, request, secret_param).await?;
    parse_json(provider, &response.body)
}

/// JSON value some upstreams encode as either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

pub(crate) fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_owned()
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingHttpClient;
    use super::*;
    use crate::http_client::HttpError;
    use crate::AggregatorErrorKind;

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let client = RecordingHttpClient::with_response(Ok(HttpResponse::with_status(429, "")));
        let err = send(&client, ProviderId::CoinApi, HttpRequest::get("https://x.test"), None)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), AggregatorErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn maps_transport_and_status_failures_to_upstream() {
        let client = RecordingHttpClient::with_response(Err(HttpError::new("connection refused")));
        let err = send(&client, ProviderId::NewsApi, HttpRequest::get("https://x.test"), None)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), AggregatorErrorKind::Upstream);
        assert!(err.message().contains("connection refused"));

        let client = RecordingHttpClient::with_response(Ok(HttpResponse::with_status(503, "")));
        let err = send(&client, ProviderId::NewsApi, HttpRequest::get("https://x.test"), None)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), AggregatorErrorKind::Upstream);
        assert!(err.message().contains("503"));
    }

    #[test]
    fn number_or_string_accepts_both_encodings() {
        let values: Vec<NumberOrString> =
            serde_json::from_str(r#"[42, "17", "x"]"#).expect("parses");
        let parsed: Vec<Option<i64>> = values.iter().map(NumberOrString::as_i64).collect();
        assert_eq!(parsed, [Some(42), Some(17), None]);
    }
}
