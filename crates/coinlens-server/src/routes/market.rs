//! Price, history, change and snapshot handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use coinlens_core::{
    Aggregator, AssetSymbol, CalendarDay, ChangeResult, DateWindow, Granularity,
    MultiAssetSnapshot, PriceSeries, SpotPrice,
};
use serde::Deserialize;

use crate::envelope::{ApiEnvelope, ApiResult};

pub const DEFAULT_SNAPSHOT_SYMBOLS: &str = "BTC,ETH,XRP";
const YEARLY_DEFAULT_SYMBOL: &str = "BTC";

pub async fn price(
    State(aggregator): State<Arc<Aggregator>>,
    Path(symbol): Path<String>,
) -> ApiResult<SpotPrice> {
    let symbol = AssetSymbol::parse(&symbol)?;
    let price = aggregator.current_price(&symbol).await?;
    Ok(ApiEnvelope::success(price))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub granularity: Option<String>,
}

pub async fn history(
    State(aggregator): State<Arc<Aggregator>>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<PriceSeries> {
    let symbol = AssetSymbol::parse(&symbol)?;
    let window = history_window(&params, aggregator.today())?;
    let granularity = match params.granularity.as_deref() {
        Some(value) => value.parse::<Granularity>()?,
        None => Granularity::default(),
    };

    let series = aggregator
        .historical_series(&symbol, window, granularity)
        .await?;
    Ok(ApiEnvelope::success(series))
}

/// Missing bounds default to the trailing year ending today.
fn history_window(
    params: &HistoryParams,
    today: CalendarDay,
) -> Result<DateWindow, coinlens_core::ValidationError> {
    let end = match params.end.as_deref() {
        Some(value) => CalendarDay::parse(value)?,
        None => today,
    };
    let start = match params.start.as_deref() {
        Some(value) => CalendarDay::parse(value)?,
        None => end.one_year_earlier(),
    };
    DateWindow::new(start, end)
}

pub async fn bitcoin_yearly(State(aggregator): State<Arc<Aggregator>>) -> ApiResult<PriceSeries> {
    let symbol = AssetSymbol::parse(YEARLY_DEFAULT_SYMBOL)?;
    let series = aggregator.year_to_date_series(&symbol).await?;
    Ok(ApiEnvelope::success(series))
}

pub async fn yearly(
    State(aggregator): State<Arc<Aggregator>>,
    Path(symbol): Path<String>,
) -> ApiResult<PriceSeries> {
    let symbol = AssetSymbol::parse(&symbol)?;
    let series = aggregator.yearly_series(&symbol).await?;
    Ok(ApiEnvelope::success(series))
}

pub async fn change(
    State(aggregator): State<Arc<Aggregator>>,
    Path(symbol): Path<String>,
) -> ApiResult<ChangeResult> {
    let symbol = AssetSymbol::parse(&symbol)?;
    let change = aggregator.daily_change(&symbol).await?;
    Ok(ApiEnvelope::success(change))
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotParams {
    pub symbols: Option<String>,
}

pub async fn snapshot(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<SnapshotParams>,
) -> ApiResult<MultiAssetSnapshot> {
    let symbols =
        AssetSymbol::parse_list(params.symbols.as_deref().unwrap_or(DEFAULT_SNAPSHOT_SYMBOLS))?;
    let snapshot = aggregator.multi_asset_snapshot(&symbols).await?;
    Ok(ApiEnvelope::success(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(input: &str) -> CalendarDay {
        CalendarDay::parse(input).expect("valid day")
    }

    #[test]
    fn history_window_defaults_to_trailing_year() {
        let window =
            history_window(&HistoryParams::default(), day("2024-02-29")).expect("valid window");
        assert_eq!(window.start.to_string(), "2023-02-28");
        assert_eq!(window.end.to_string(), "2024-02-29");
    }

    #[test]
    fn history_window_rejects_inverted_bounds() {
        let params = HistoryParams {
            start: Some(String::from("2025-02-01")),
            end: Some(String::from("2025-01-01")),
            granularity: None,
        };
        assert!(history_window(&params, day("2025-03-01")).is_err());
    }
}
