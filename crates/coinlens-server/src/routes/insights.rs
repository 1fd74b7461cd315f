//! News and sentiment handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use coinlens_core::{Aggregator, NewsItem, SentimentReading};
use serde::Deserialize;

use crate::envelope::{ApiEnvelope, ApiResult};

pub const DEFAULT_NEWS_TOPIC: &str = "bitcoin";

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub topic: Option<String>,
}

pub async fn news(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<NewsParams>,
) -> ApiResult<Vec<NewsItem>> {
    let topic = params.topic.as_deref().unwrap_or(DEFAULT_NEWS_TOPIC);
    let items = aggregator.news(topic).await?;
    Ok(ApiEnvelope::success(items))
}

pub async fn sentiment(State(aggregator): State<Arc<Aggregator>>) -> ApiResult<SentimentReading> {
    let reading = aggregator.sentiment().await?;
    Ok(ApiEnvelope::success(reading))
}
