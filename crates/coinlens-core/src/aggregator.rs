//! The aggregator: one method per supported metric.
//!
//! Each method is a stateless request/response cycle. Multi-fetch
//! operations run their upstream calls concurrently and fail on the first
//! error; nothing is retried.

use std::sync::Arc;

use futures::future::try_join;
use rust_decimal::Decimal;
use tracing::debug;

use crate::adapters::{CoinApiAdapter, CoinMarketCapAdapter, FearGreedAdapter, NewsApiAdapter};
use crate::data_source::{
    HistoryRequest, HistorySource, NewsRequest, NewsSource, PriceSource, SentimentSource,
};
use crate::http_client::HttpClient;
use crate::{
    AggregatorConfig, AggregatorError, AggregatorErrorKind, AssetSymbol, CalendarDay,
    ChangeResult, DateWindow, Granularity, MultiAssetSnapshot, NewsItem, PriceSeries, ProviderId,
    SentimentReading, SpotPrice, ValidationError, MAX_NEWS_ITEMS,
};

/// Normalizes and combines upstream data for the HTTP boundary.
#[derive(Clone)]
pub struct Aggregator {
    prices: Arc<dyn PriceSource>,
    history: Arc<dyn HistorySource>,
    news: Arc<dyn NewsSource>,
    sentiment: Arc<dyn SentimentSource>,
    today: fn() -> CalendarDay,
}

impl Aggregator {
    pub fn new(
        prices: Arc<dyn PriceSource>,
        history: Arc<dyn HistorySource>,
        news: Arc<dyn NewsSource>,
        sentiment: Arc<dyn SentimentSource>,
    ) -> Self {
        Self {
            prices,
            history,
            news,
            sentiment,
            today: CalendarDay::today_utc,
        }
    }

    /// Wires the production adapters described by `config` onto one shared
    /// transport.
    pub fn from_config(
        config: AggregatorConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let coinapi = Arc::new(
            CoinApiAdapter::new(http_client.clone(), config.coinapi_key)
                .with_base_url(config.endpoints.coinapi)
                .with_timeout_ms(config.timeout_ms),
        );

        let prices: Arc<dyn PriceSource> = match (config.price_provider, config.coinmarketcap_key)
        {
            (ProviderId::CoinMarketCap, Some(key)) => Arc::new(
                CoinMarketCapAdapter::new(http_client.clone(), key)
                    .with_base_url(config.endpoints.coinmarketcap)
                    .with_timeout_ms(config.timeout_ms),
            ),
            _ => coinapi.clone(),
        };

        let news = Arc::new(
            NewsApiAdapter::new(http_client.clone(), config.news_api_key)
                .with_base_url(config.endpoints.newsapi)
                .with_timeout_ms(config.timeout_ms),
        );
        let sentiment = Arc::new(
            FearGreedAdapter::new(http_client)
                .with_base_url(config.endpoints.alternative_me)
                .with_timeout_ms(config.timeout_ms),
        );

        Ok(Self::new(prices, coinapi, news, sentiment))
    }

    /// Replaces the UTC clock used for "today".
    pub fn with_clock(mut self, today: fn() -> CalendarDay) -> Self {
        self.today = today;
        self
    }

    pub fn price_provider(&self) -> ProviderId {
        self.prices.id()
    }

    pub fn today(&self) -> CalendarDay {
        (self.today)()
    }

    pub async fn current_price(&self, symbol: &AssetSymbol) -> Result<SpotPrice, AggregatorError> {
        let price = self.prices.latest_price(symbol).await?;
        debug!(%symbol, %price, provider = %self.prices.id(), "resolved current price");
        Ok(SpotPrice::new(symbol.clone(), price))
    }

    /// Ascending series for `window`; an empty result is `NotFound`.
    pub async fn historical_series(
        &self,
        symbol: &AssetSymbol,
        window: DateWindow,
        granularity: Granularity,
    ) -> Result<PriceSeries, AggregatorError> {
        let req = HistoryRequest::new(symbol.clone(), window, granularity);
        let series = self.history.history(&req).await?;

        if series.is_empty() {
            return Err(AggregatorError::not_found(format!(
                "no {granularity} history for {symbol} between {} and {}",
                window.start, window.end
            )));
        }

        debug!(%symbol, points = series.len(), "resolved historical series");
        Ok(series)
    }

    /// Daily closes from one year ago through today.
    pub async fn yearly_series(
        &self,
        symbol: &AssetSymbol,
    ) -> Result<PriceSeries, AggregatorError> {
        let window = DateWindow::trailing_year(self.today());
        self.historical_series(symbol, window, Granularity::OneDay)
            .await
    }

    /// Daily closes from January 1 of the current year through today.
    pub async fn year_to_date_series(
        &self,
        symbol: &AssetSymbol,
    ) -> Result<PriceSeries, AggregatorError> {
        let window = DateWindow::year_to_date(self.today());
        self.historical_series(symbol, window, Granularity::OneDay)
            .await
    }

    /// Current price against the close of the previous UTC calendar day.
    ///
    /// Both reads run concurrently. A missing or zero value on either side is
    /// `IncompleteData`; transport failures propagate unchanged.
    pub async fn daily_change(
        &self,
        symbol: &AssetSymbol,
    ) -> Result<ChangeResult, AggregatorError> {
        let reference_day = self.today().previous_day();
        let req = HistoryRequest::new(
            symbol.clone(),
            DateWindow::single_day(reference_day),
            Granularity::OneDay,
        );

        let current = async {
            absent_on_not_found(self.prices.latest_price(symbol).await)
        };
        let reference = async {
            let series = absent_on_not_found(self.history.history(&req).await)?;
            Ok::<_, AggregatorError>(series.and_then(|series| {
                series
                    .points
                    .iter()
                    .find(|point| point.date == reference_day)
                    .map(|point| point.price)
            }))
        };

        let (current, reference): (Option<Decimal>, Option<Decimal>) =
            try_join(Box::pin(current), Box::pin(reference)).await?;

        let change = ChangeResult::compute(current, reference)
            .map_err(|error| {
                AggregatorError::incomplete_data(format!("{symbol}: {}", error.message()))
            })?
            .with_reference_date(reference_day);
        debug!(
            %symbol,
            percent_change = %change.percent_change_display(),
            "computed daily change"
        );
        Ok(change)
    }

    /// All-or-nothing prices for `symbols`.
    pub async fn multi_asset_snapshot(
        &self,
        symbols: &[AssetSymbol],
    ) -> Result<MultiAssetSnapshot, AggregatorError> {
        if symbols.is_empty() {
            return Err(ValidationError::EmptySymbolList.into());
        }

        let quotes = self.prices.latest_prices(symbols).await?;
        MultiAssetSnapshot::complete(symbols, |symbol| quotes.get(symbol).copied()).map_err(
            |missing| {
                AggregatorError::not_found(format!(
                    "{} returned no price for {missing}",
                    self.prices.id()
                ))
            },
        )
    }

    /// Up to five newest headlines for `topic`.
    pub async fn news(&self, topic: &str) -> Result<Vec<NewsItem>, AggregatorError> {
        let req = NewsRequest::new(topic)?;
        let mut items = self.news.headlines(&req).await?;
        items.truncate(MAX_NEWS_ITEMS);

        if items.is_empty() {
            return Err(AggregatorError::not_found(format!(
                "no articles for topic '{}'",
                req.topic
            )));
        }
        Ok(items)
    }

    pub async fn sentiment(&self) -> Result<SentimentReading, AggregatorError> {
        self.sentiment.current().await
    }
}

fn absent_on_not_found<T>(
    result: Result<T, AggregatorError>,
) -> Result<Option<T>, AggregatorError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.kind() == AggregatorErrorKind::NotFound => {
            debug!(error = %error, "treating not-found upstream value as absent");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}
