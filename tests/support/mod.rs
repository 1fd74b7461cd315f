//! Shared fakes for the behavior tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use coinlens_core::{
    Aggregator, AggregatorConfig, CalendarDay, HttpClient, HttpError, HttpRequest, HttpResponse,
    UpstreamEndpoints,
};

pub const COINAPI_URL: &str = "https://coinapi.test";
pub const CMC_URL: &str = "https://cmc.test";
pub const NEWS_URL: &str = "https://news.test";
pub const FNG_URL: &str = "https://fng.test";

/// Fake transport that answers the first route whose pattern appears in the
/// request URL and records every request. Unmatched URLs get a 404.
#[derive(Default)]
pub struct RoutedHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, pattern: &str, body: &str) -> Self {
        self.respond(pattern, Ok(HttpResponse::ok_json(body)))
    }

    pub fn status(self, pattern: &str, status: u16) -> Self {
        self.respond(pattern, Ok(HttpResponse::with_status(status, "")))
    }

    pub fn failing(self, pattern: &str, message: &str) -> Self {
        self.respond(pattern, Err(HttpError::new(message)))
    }

    pub fn respond(mut self, pattern: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.push((pattern.to_owned(), response));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(request);
        Box::pin(async move { response })
    }
}

pub fn endpoints() -> UpstreamEndpoints {
    UpstreamEndpoints {
        coinapi: String::from(COINAPI_URL),
        coinmarketcap: String::from(CMC_URL),
        newsapi: String::from(NEWS_URL),
        alternative_me: String::from(FNG_URL),
    }
}

pub fn today() -> CalendarDay {
    CalendarDay::parse("2025-03-10").expect("valid day")
}

pub fn config() -> AggregatorConfig {
    AggregatorConfig::new("coinapi-secret", "news-secret").with_endpoints(endpoints())
}

pub fn aggregator(client: Arc<RoutedHttpClient>) -> Aggregator {
    aggregator_with(config(), client)
}

pub fn aggregator_with(config: AggregatorConfig, client: Arc<RoutedHttpClient>) -> Aggregator {
    Aggregator::from_config(config, client)
        .expect("valid config")
        .with_clock(today)
}

pub fn coinapi_rate(rate: &str) -> String {
    format!(r#"{{"asset_id_base":"BTC","asset_id_quote":"USD","rate":{rate}}}"#)
}

pub fn coinapi_day(date: &str, close: &str) -> String {
    format!(r#"{{"time_period_start":"{date}T00:00:00.0000000Z","rate_close":{close}}}"#)
}

pub fn news_article(n: usize) -> String {
    format!(
        r#"{{"source":{{"id":null,"name":"Wire {n}"}},"title":"Headline {n}","url":"https://news.test/a/{n}","publishedAt":"2025-03-10T{:02}:00:00Z"}}"#,
        23 - n
    )
}
