use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::adapters::{fetch_json, trim_base_url};
use crate::data_source::{NewsRequest, NewsSource};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{AggregatorError, NewsItem, ProviderId};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const API_KEY_PARAM: &str = "apiKey";
/// Placeholder NewsAPI substitutes for takedown-requested articles.
const REMOVED_MARKER: &str = "[Removed]";

/// NewsAPI `everything` adapter.
#[derive(Clone)]
pub struct NewsApiAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl NewsApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::query_param(API_KEY_PARAM, api_key),
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

    async fn fetch_headlines(&self, req: &NewsRequest) -> Result<Vec<NewsItem>, AggregatorError> {
        let request = HttpRequest::get(format!("{}/v2/everything", self.base_url))
            .with_query("q", &req.topic)
            .with_query("sortBy", "publishedAt")
            .with_query("language", "en")
            .with_query("pageSize", &req.limit.to_string())
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let payload: NewsApiResponse = fetch_json(
            self.http_client.as_ref(),
            ProviderId::NewsApi,
            request,
            Some(API_KEY_PARAM),
        )
        .await?;
        normalize_articles(payload, req.limit)
    }
}

impl NewsSource for NewsApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::NewsApi
    }

    fn headlines<'a>(
        &'a self,
        req: &'a NewsRequest,
    ) -> BoxFuture<'a, Result<Vec<NewsItem>, AggregatorError>> {
        Box::pin(self.fetch_headlines(req))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

/// Keeps upstream order (newest first) and drops articles missing a title,
/// source, url or parseable timestamp.
fn normalize_articles(
    payload: NewsApiResponse,
    limit: usize,
) -> Result<Vec<NewsItem>, AggregatorError> {
    if payload.status != "ok" {
        return Err(AggregatorError::upstream(format!(
            "newsapi status '{}' ({}): {}",
            payload.status,
            payload.code.unwrap_or_default(),
            payload.message.unwrap_or_default()
        )));
    }

    let total = payload.articles.len();
    let items: Vec<NewsItem> = payload
        .articles
        .into_iter()
        .filter_map(normalize_article)
        .take(limit)
        .collect();

    if items.len() < total.min(limit) {
        debug!(
            received = total,
            kept = items.len(),
            "dropped incomplete newsapi articles"
        );
    }
    Ok(items)
}

fn normalize_article(article: NewsApiArticle) -> Option<NewsItem> {
    let title = non_blank(article.title)?;
    if title == REMOVED_MARKER {
        return None;
    }

    let published_at = article
        .published_at
        .as_deref()
        .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())?;

    Some(NewsItem {
        title,
        source: non_blank(article.source.and_then(|source| source.name))?,
        url: non_blank(article.url)?,
        published_at,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
