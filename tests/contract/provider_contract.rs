#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use coinlens_core::{
    AggregatorErrorKind, AssetSymbol, CalendarDay, CoinApiAdapter, CoinMarketCapAdapter, DateWindow,
    FearGreedAdapter, Granularity, HistoryRequest, HistorySource, NewsApiAdapter, NewsRequest,
    NewsSource, PriceSource, ProviderId, SentimentSource, MAX_NEWS_ITEMS,
};
use rust_decimal::Decimal;
use support::{coinapi_day, coinapi_rate, news_article, RoutedHttpClient};

const CMC_BTC_ETH: &str = r#"{"status":{"error_code":0},"data":{
    "BTC":{"symbol":"BTC","quote":{"USD":{"price":65000.0}}},
    "ETH":{"symbol":"ETH","quote":{"USD":{"price":3200.0}}}}}"#;

struct PriceCase {
    id: ProviderId,
    source: Arc<dyn PriceSource>,
    client: Arc<RoutedHttpClient>,
}

/// Every price provider answering BTC and ETH but not XRP.
fn price_cases() -> Vec<PriceCase> {
    let coinapi_client = Arc::new(
        RoutedHttpClient::new()
            .json("/BTC/USD", &coinapi_rate("65000.0"))
            .json("/ETH/USD", &coinapi_rate("3200.0"))
            .json("/XRP/USD", r#"{"rate":null}"#),
    );
    let cmc_client = Arc::new(RoutedHttpClient::new().json("quotes/latest", CMC_BTC_ETH));

    vec![
        PriceCase {
            id: ProviderId::CoinApi,
            source: Arc::new(
                CoinApiAdapter::new(coinapi_client.clone(), "k")
                    .with_base_url(support::COINAPI_URL),
            ),
            client: coinapi_client,
        },
        PriceCase {
            id: ProviderId::CoinMarketCap,
            source: Arc::new(
                CoinMarketCapAdapter::new(cmc_client.clone(), "k").with_base_url(support::CMC_URL),
            ),
            client: cmc_client,
        },
    ]
}

fn symbols(list: &str) -> Vec<AssetSymbol> {
    AssetSymbol::parse_list(list).expect("valid list")
}

#[tokio::test]
async fn price_providers_report_their_identity() {
    for case in price_cases() {
        assert_eq!(case.source.id(), case.id);
        assert!(ProviderId::PRICE_PROVIDERS.contains(&case.id));
    }
}

#[tokio::test]
async fn price_providers_return_usd_prices() {
    for case in price_cases() {
        let btc = AssetSymbol::parse("BTC").expect("valid symbol");
        let price = case
            .source
            .latest_price(&btc)
            .await
            .unwrap_or_else(|error| panic!("{} failed: {error}", case.id));
        assert_eq!(price, Decimal::from(65_000), "{} price", case.id);
        assert!(!case.client.requests().is_empty());
    }
}

#[tokio::test]
async fn price_providers_report_missing_symbols_as_not_found() {
    for case in price_cases() {
        let xrp = AssetSymbol::parse("XRP").expect("valid symbol");
        let error = case
            .source
            .latest_price(&xrp)
            .await
            .expect_err("XRP has no price");
        assert_eq!(error.kind(), AggregatorErrorKind::NotFound, "{}", case.id);
    }
}

#[tokio::test]
async fn price_providers_omit_unpriced_symbols_from_batches() {
    for case in price_cases() {
        let quotes = case
            .source
            .latest_prices(&symbols("BTC,ETH,XRP"))
            .await
            .unwrap_or_else(|error| panic!("{} failed: {error}", case.id));
        let keys: Vec<&str> = quotes.keys().map(AssetSymbol::as_str).collect();
        assert_eq!(keys, ["BTC", "ETH"], "{}", case.id);
    }
}

#[tokio::test]
async fn price_providers_send_credentials_in_headers() {
    for case in price_cases() {
        let btc = AssetSymbol::parse("BTC").expect("valid symbol");
        case.source.latest_price(&btc).await.expect("price");

        let request = &case.client.requests()[0];
        let header = match case.id {
            ProviderId::CoinMarketCap => "x-cmc_pro_api_key",
            _ => "x-coinapi-key",
        };
        assert_eq!(request.headers.get(header).map(String::as_str), Some("k"));
        assert!(!request.url.contains("k="), "{} leaks key in url", case.id);
    }
}

#[tokio::test]
async fn history_source_returns_ascending_series_inside_window() {
    let rows = [
        coinapi_day("2025-01-05", "5.0"),
        coinapi_day("2025-01-04", "4.0"),
        coinapi_day("2025-01-02", "2.0"),
        coinapi_day("2024-12-31", "1.0"),
    ]
    .join(",");
    let client = Arc::new(RoutedHttpClient::new().json("/history", &format!("[{rows}]")));
    let source = CoinApiAdapter::new(client, "k").with_base_url(support::COINAPI_URL);

    let window = DateWindow::year_to_date(CalendarDay::parse("2025-01-05").expect("valid day"));
    let req = HistoryRequest::new(
        AssetSymbol::parse("BTC").expect("valid symbol"),
        window,
        Granularity::OneDay,
    );
    let series = source.history(&req).await.expect("series");

    assert_eq!(HistorySource::id(&source), ProviderId::CoinApi);
    let dates: Vec<String> = series.points.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, ["2025-01-02", "2025-01-04", "2025-01-05"]);
}

#[tokio::test]
async fn news_source_caps_results_at_request_limit() {
    let articles: Vec<String> = (0..7).map(news_article).collect();
    let body = format!(r#"{{"status":"ok","articles":[{}]}}"#, articles.join(","));
    let client = Arc::new(RoutedHttpClient::new().json("/v2/everything", &body));
    let source = NewsApiAdapter::new(client, "k").with_base_url(support::NEWS_URL);

    let items = source
        .headlines(&NewsRequest::new("bitcoin").expect("valid topic"))
        .await
        .expect("headlines");

    assert_eq!(source.id(), ProviderId::NewsApi);
    assert_eq!(items.len(), MAX_NEWS_ITEMS);
}

#[tokio::test]
async fn sentiment_source_returns_bounded_index() {
    let client = Arc::new(RoutedHttpClient::new().json(
        "/fng/",
        r#"{"data":[{"value":"0","value_classification":"Extreme Fear"}]}"#,
    ));
    let source = FearGreedAdapter::new(client).with_base_url(support::FNG_URL);

    let reading = source.current().await.expect("reading");
    assert_eq!(source.id(), ProviderId::AlternativeMe);
    assert!(reading.index_value <= 100);
    assert_eq!(reading.classification.as_str(), "Extreme Fear");
}
