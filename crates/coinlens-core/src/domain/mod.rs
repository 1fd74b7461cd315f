//! # Domain Models
//!
//! Canonical records produced by normalizing upstream payloads.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AssetSymbol`] | Validated crypto ticker |
//! | [`CalendarDay`] | UTC date without time component |
//! | [`DateWindow`] | Inclusive day range for history queries |
//! | [`Granularity`] | Bucket size for history queries |
//! | [`SpotPrice`] | Latest price for one asset |
//! | [`PricePoint`] | Closing price for one day |
//! | [`PriceSeries`] | Ascending price history |
//! | [`NewsItem`] | Normalized headline |
//! | [`SentimentReading`] | Fear & Greed index value |
//! | [`MultiAssetSnapshot`] | All-or-nothing current prices |
//!
//! Every type validates its invariants at construction and none outlives a
//! single request.

mod calendar;
mod granularity;
pub mod money;
mod models;
mod symbol;

pub use calendar::{CalendarDay, DateWindow};
pub use granularity::Granularity;
pub use models::{
    MultiAssetSnapshot, NewsItem, PricePoint, PriceSeries, SentimentClass, SentimentReading,
    SpotPrice, MAX_NEWS_ITEMS, QUOTE_CURRENCY,
};
pub use symbol::AssetSymbol;
