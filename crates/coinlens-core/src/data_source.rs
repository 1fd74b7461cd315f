//! Provider contracts and request types.
//!
//! Each upstream concern gets its own trait so the aggregator can mix
//! providers (CoinMarketCap prices with CoinAPI history, for example).
//!
//! | Trait | Request | Response |
//! |-------|---------|----------|
//! | [`PriceSource`] | [`AssetSymbol`] / slice | [`Decimal`] / [`PriceQuotes`] |
//! | [`HistorySource`] | [`HistoryRequest`] | [`PriceSeries`] |
//! | [`NewsSource`] | [`NewsRequest`] | `Vec<NewsItem>` |
//! | [`SentimentSource`] | none | [`SentimentReading`] |

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use rust_decimal::Decimal;

use crate::{
    AggregatorError, AssetSymbol, DateWindow, Granularity, NewsItem, PriceSeries, ProviderId,
    SentimentReading, ValidationError, MAX_NEWS_ITEMS,
};

/// Prices an adapter found, keyed by symbol. Symbols the upstream did not
/// price are absent rather than zero.
pub type PriceQuotes = BTreeMap<AssetSymbol, Decimal>;

/// Request payload for historical series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: AssetSymbol,
    pub window: DateWindow,
    pub granularity: Granularity,
}

impl HistoryRequest {
    pub fn new(symbol: AssetSymbol, window: DateWindow, granularity: Granularity) -> Self {
        Self {
            symbol,
            window,
            granularity,
        }
    }
}

/// Request payload for news searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub topic: String,
    pub limit: usize,
}

impl NewsRequest {
    pub fn new(topic: impl Into<String>) -> Result<Self, ValidationError> {
        let topic = topic.into();
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        Ok(Self {
            topic: topic.to_owned(),
            limit: MAX_NEWS_ITEMS,
        })
    }
}

/// Spot price provider.
pub trait PriceSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Latest USD price for one asset.
    ///
    /// # Errors
    ///
    /// `NotFound` when the upstream has no price field for the symbol,
    /// `Upstream`/`RateLimited` on transport or status failures.
    fn latest_price<'a>(
        &'a self,
        symbol: &'a AssetSymbol,
    ) -> BoxFuture<'a, Result<Decimal, AggregatorError>>;

    /// Latest USD prices for several assets. Missing symbols are omitted
    /// from the result; completeness is enforced by the caller.
    fn latest_prices<'a>(
        &'a self,
        symbols: &'a [AssetSymbol],
    ) -> BoxFuture<'a, Result<PriceQuotes, AggregatorError>>;
}

/// Historical series provider.
pub trait HistorySource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Series for the request window, ascending and free of rows without a
    /// closing price. May be empty.
    fn history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> BoxFuture<'a, Result<PriceSeries, AggregatorError>>;
}

/// Headline provider.
pub trait NewsSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// At most `req.limit` headlines, newest first. May be empty.
    fn headlines<'a>(
        &'a self,
        req: &'a NewsRequest,
    ) -> BoxFuture<'a, Result<Vec<NewsItem>, AggregatorError>>;
}

/// Market sentiment provider.
pub trait SentimentSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn current<'a>(&'a self) -> BoxFuture<'a, Result<SentimentReading, AggregatorError>>;
}
