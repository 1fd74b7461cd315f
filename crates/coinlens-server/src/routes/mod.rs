//! HTTP routes.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /health` | liveness |
//! | `GET /api/price/:symbol` | [`market::price`] |
//! | `GET /api/history/:symbol` | [`market::history`] |
//! | `GET /api/bitcoin-yearly` | [`market::bitcoin_yearly`] |
//! | `GET /api/yearly/:symbol` | [`market::yearly`] |
//! | `GET /api/change/:symbol` | [`market::change`] |
//! | `GET /api/snapshot` | [`market::snapshot`] |
//! | `GET /api/news` | [`insights::news`] |
//! | `GET /api/sentiment` | [`insights::sentiment`] |

pub mod insights;
pub mod market;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use coinlens_core::{Aggregator, ProviderId};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::envelope::ApiEnvelope;

/// Builds the application router around a shared aggregator.
pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/price/:symbol", get(market::price))
        .route("/api/history/:symbol", get(market::history))
        .route("/api/bitcoin-yearly", get(market::bitcoin_yearly))
        .route("/api/yearly/:symbol", get(market::yearly))
        .route("/api/change/:symbol", get(market::change))
        .route("/api/snapshot", get(market::snapshot))
        .route("/api/news", get(insights::news))
        .route("/api/sentiment", get(insights::sentiment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(aggregator))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub price_provider: ProviderId,
}

async fn health(State(aggregator): State<Arc<Aggregator>>) -> ApiEnvelope<Health> {
    ApiEnvelope::success(Health {
        status: "ok",
        price_provider: aggregator.price_provider(),
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use coinlens_core::{
        AggregatorConfig, CalendarDay, HttpClient, HttpError, HttpRequest, HttpResponse,
        UpstreamEndpoints,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    /// Answers the first route whose pattern appears in the request URL.
    struct StubHttpClient {
        routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    }

    impl StubHttpClient {
        fn new() -> Self {
            Self { routes: Vec::new() }
        }

        fn json(mut self, pattern: &'static str, body: &str) -> Self {
            self.routes.push((pattern, Ok(HttpResponse::ok_json(body))));
            self
        }

        fn respond(
            mut self,
            pattern: &'static str,
            response: Result<HttpResponse, HttpError>,
        ) -> Self {
            self.routes.push((pattern, response));
            self
        }
    }

    impl HttpClient for StubHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self
                .routes
                .iter()
                .find(|(pattern, _)| request.url.contains(pattern))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
            Box::pin(async move { response })
        }
    }

    fn fixed_today() -> CalendarDay {
        CalendarDay::parse("2025-03-10").expect("valid day")
    }

    fn app(client: StubHttpClient) -> Router {
        let endpoints = UpstreamEndpoints {
            coinapi: String::from("https://coinapi.test"),
            coinmarketcap: String::from("https://cmc.test"),
            newsapi: String::from("https://news.test"),
            alternative_me: String::from("https://fng.test"),
        };
        let config = AggregatorConfig::new("coin", "news").with_endpoints(endpoints);
        let aggregator = Aggregator::from_config(config, Arc::new(client))
            .expect("valid config")
            .with_clock(fixed_today);
        router(aggregator)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[tokio::test]
    async fn health_reports_price_provider() {
        let (status, body) = get_json(app(StubHttpClient::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "data": {"status": "ok", "priceProvider": "coinapi"}})
        );
    }

    #[tokio::test]
    async fn change_route_rounds_at_the_boundary() {
        let client = StubHttpClient::new()
            .json(
                "/v1/exchangerate/BTC/USD/history",
                r#"[{"time_period_start":"2025-03-09T00:00:00.0000000Z","rate_close":64350.0}]"#,
            )
            .json("/v1/exchangerate/BTC/USD", r#"{"rate":65000.0}"#);

        let (status, body) = get_json(app(client), "/api/change/btc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": {
                    "currentValue": "65000.00",
                    "referenceValue": "64350.00",
                    "absoluteChange": "650.00",
                    "percentChange": "1.01",
                    "referenceDate": "2025-03-09"
                }
            })
        );
    }

    #[tokio::test]
    async fn empty_history_is_404_no_data_found() {
        let client = StubHttpClient::new().json("/history", "[]");

        let (status, body) = get_json(app(client), "/api/yearly/BTC").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "No data found"}));
    }

    #[tokio::test]
    async fn transport_failure_is_500_without_detail() {
        let client = StubHttpClient::new().respond(
            "/v1/exchangerate/BTC/USD",
            Err(HttpError::new("connection refused")),
        );

        let (status, body) = get_json(app(client), "/api/price/BTC").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": "Failed to fetch data"}));
    }

    #[tokio::test]
    async fn upstream_429_is_passed_through() {
        let client = StubHttpClient::new()
            .respond("fng.test", Ok(HttpResponse::with_status(429, "slow down")));

        let (status, body) = get_json(app(client), "/api/sentiment").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, json!({"success": false, "error": "Rate limit exceeded"}));
    }

    #[tokio::test]
    async fn invalid_symbol_is_400_with_reason() {
        let (status, body) = get_json(app(StubHttpClient::new()), "/api/price/B!TC").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("invalid character")));
    }

    #[tokio::test]
    async fn snapshot_defaults_and_fails_as_a_whole() {
        let client = StubHttpClient::new()
            .json("/BTC/USD", r#"{"rate":65000.0}"#)
            .json("/ETH/USD", r#"{"rate":null}"#)
            .json("/XRP/USD", r#"{"rate":0.5234}"#);

        let (status, body) = get_json(app(client), "/api/snapshot").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "No data found"}));

        let client = StubHttpClient::new()
            .json("/BTC/USD", r#"{"rate":65000.0}"#)
            .json("/XRP/USD", r#"{"rate":0.5234}"#);
        let (status, body) = get_json(app(client), "/api/snapshot?symbols=XRP,BTC").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "data": {"XRP": "0.52", "BTC": "65000.00"}})
        );
    }

    #[tokio::test]
    async fn history_rejects_unknown_granularity() {
        let (status, body) = get_json(
            app(StubHttpClient::new()),
            "/api/history/BTC?granularity=5MIN",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn responses_allow_any_origin() {
        let response = app(StubHttpClient::new())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://dashboard.test")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }
}
