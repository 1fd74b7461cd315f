use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{fetch_json, trim_base_url};
use crate::data_source::{HistoryRequest, HistorySource, PriceQuotes, PriceSource};
use crate::domain::money::price_from_f64;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{
    AggregatorError, AggregatorErrorKind, AssetSymbol, CalendarDay, Granularity, PricePoint,
    PriceSeries, ProviderId, QUOTE_CURRENCY,
};

pub const DEFAULT_BASE_URL: &str = "https://rest.coinapi.io";
const API_KEY_HEADER: &str = "X-CoinAPI-Key";
/// CoinAPI's documented maximum for `limit`.
const MAX_HISTORY_LIMIT: i64 = 100_000;

/// CoinAPI exchange-rate adapter. Serves spot prices and daily history.
#[derive(Clone)]
pub struct CoinApiAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl CoinApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::header(API_KEY_HEADER, api_key),
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

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{path}", self.base_url))
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_rate(&self, symbol: &AssetSymbol) -> Result<Decimal, AggregatorError> {
        let request = self.request(&format!(
            "/v1/exchangerate/{}/{QUOTE_CURRENCY}",
            symbol.as_str()
        ));
        let payload: CoinApiExchangeRate =
            fetch_json(self.http_client.as_ref(), ProviderId::CoinApi, request, None).await?;
        normalize_exchange_rate(symbol, payload)
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<PriceSeries, AggregatorError> {
        // time_end is exclusive upstream, so ask for the day after the window.
        let request = self
            .request(&format!(
                "/v1/exchangerate/{}/{QUOTE_CURRENCY}/history",
                req.symbol.as_str()
            ))
            .with_query("period_id", req.granularity.as_str())
            .with_query("time_start", &req.window.start.start_of_day_iso())
            .with_query("time_end", &req.window.end.next_day().start_of_day_iso())
            .with_query("limit", &history_limit(req).to_string());

        let rows: Vec<CoinApiHistoryRow> =
            fetch_json(self.http_client.as_ref(), ProviderId::CoinApi, request, None).await?;
        Ok(normalize_history(req, rows))
    }
}

impl PriceSource for CoinApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CoinApi
    }

    fn latest_price<'a>(
        &'a self,
        symbol: &'a AssetSymbol,
    ) -> BoxFuture<'a, Result<Decimal, AggregatorError>> {
        Box::pin(self.fetch_rate(symbol))
    }

    /// CoinAPI prices one pair per call, so symbols are fetched concurrently.
    /// A symbol without a rate is left out; any other failure fails the batch.
    fn latest_prices<'a>(
        &'a self,
        symbols: &'a [AssetSymbol],
    ) -> BoxFuture<'a, Result<PriceQuotes, AggregatorError>> {
        Box::pin(async move {
            let lookups = symbols.iter().map(|symbol| async move {
                match self.fetch_rate(symbol).await {
                    Ok(price) => Ok(Some((symbol.clone(), price))),
                    Err(error) if error.kind() == AggregatorErrorKind::NotFound => Ok(None),
                    Err(error) => Err(error),
                }
            });

            let found = try_join_all(lookups).await?;
            Ok(found.into_iter().flatten().collect())
        })
    }
}

impl HistorySource for CoinApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CoinApi
    }

    fn history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> BoxFuture<'a, Result<PriceSeries, AggregatorError>> {
        Box::pin(self.fetch_history(req))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CoinApiExchangeRate {
    #[serde(default)]
    rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct CoinApiHistoryRow {
    time_period_start: String,
    #[serde(default)]
    rate_close: Option<f64>,
}

fn normalize_exchange_rate(
    symbol: &AssetSymbol,
    payload: CoinApiExchangeRate,
) -> Result<Decimal, AggregatorError> {
    let rate = payload.rate.ok_or_else(|| {
        AggregatorError::not_found(format!("coinapi returned no rate for {symbol}"))
    })?;
    price_from_f64("rate", rate).map_err(|error| {
        AggregatorError::upstream(format!("coinapi rate for {symbol} is invalid: {error}"))
    })
}

/// Keeps rows with a usable close inside the window; ordering is fixed up by
/// [`PriceSeries::from_points`].
fn normalize_history(req: &HistoryRequest, rows: Vec<CoinApiHistoryRow>) -> PriceSeries {
    let total = rows.len();
    let points: Vec<PricePoint> = rows
        .into_iter()
        .filter_map(|row| {
            let close = row.rate_close.filter(|close| *close != 0.0)?;
            let date = CalendarDay::from_timestamp_prefix(&row.time_period_start).ok()?;
            if !req.window.contains(date) {
                return None;
            }
            let price = price_from_f64("rate_close", close).ok()?;
            PricePoint::new(date, price).ok()
        })
        .collect();

    if points.len() < total {
        debug!(
            symbol = %req.symbol,
            dropped = total - points.len(),
            "dropped coinapi history rows without a usable close"
        );
    }

    PriceSeries::from_points(req.symbol.clone(), req.granularity, req.window, points)
}

fn history_limit(req: &HistoryRequest) -> i64 {
    let days = (req.window.end.into_inner() - req.window.start.into_inner()).whole_days() + 1;
    let buckets = match req.granularity {
        Granularity::OneDay => days,
        Granularity::OneWeek => days / 7 + 1,
        Granularity::OneMonth => days / 28 + 1,
    };
    buckets.clamp(1, MAX_HISTORY_LIMIT)
}
