use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

use crate::domain::money;
use crate::{AssetSymbol, CalendarDay, DateWindow, Granularity, ValidationError};

/// Quote currency for every price the aggregator returns.
pub const QUOTE_CURRENCY: &str = "USD";

/// Latest USD price for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPrice {
    pub symbol: AssetSymbol,
    #[serde(serialize_with = "money::serialize")]
    pub price: Decimal,
    pub currency: String,
}

impl SpotPrice {
    pub fn new(symbol: AssetSymbol, price: Decimal) -> Self {
        Self {
            symbol,
            price,
            currency: QUOTE_CURRENCY.to_owned(),
        }
    }
}

/// One closing price for a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: CalendarDay,
    #[serde(serialize_with = "money::serialize")]
    pub price: Decimal,
    pub currency: String,
}

impl PricePoint {
    pub fn new(date: CalendarDay, price: Decimal) -> Result<Self, ValidationError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::NegativeValue { field: "price" });
        }

        Ok(Self {
            date,
            price,
            currency: QUOTE_CURRENCY.to_owned(),
        })
    }
}

/// Chronologically ascending price history for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: AssetSymbol,
    pub granularity: Granularity,
    pub start: CalendarDay,
    pub end: CalendarDay,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series whose dates are strictly ascending regardless of the
    /// order the points arrived in. On duplicate days the first point wins.
    pub fn from_points(
        symbol: AssetSymbol,
        granularity: Granularity,
        window: DateWindow,
        mut points: Vec<PricePoint>,
    ) -> Self {
        let newest_first = points
            .first()
            .zip(points.last())
            .is_some_and(|(first, last)| first.date > last.date);
        if newest_first {
            points.reverse();
        }

        points.sort_by_key(|point| point.date);
        points.dedup_by_key(|point| point.date);

        Self {
            symbol,
            granularity,
            start: window.start,
            end: window.end,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Headline returned by the news endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
}

/// Upper bound on headlines per request.
pub const MAX_NEWS_ITEMS: usize = 5;

/// Fear & Greed classification bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentClass {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl SentimentClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeFear => "Extreme Fear",
            Self::Fear => "Fear",
            Self::Neutral => "Neutral",
            Self::Greed => "Greed",
            Self::ExtremeGreed => "Extreme Greed",
        }
    }

    /// Parses the upstream label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "extreme fear" => Some(Self::ExtremeFear),
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            "extreme greed" => Some(Self::ExtremeGreed),
            _ => None,
        }
    }

    /// Band for a raw index value, used when the label is missing.
    pub const fn from_index(value: u8) -> Self {
        match value {
            0..=24 => Self::ExtremeFear,
            25..=44 => Self::Fear,
            45..=55 => Self::Neutral,
            56..=75 => Self::Greed,
            _ => Self::ExtremeGreed,
        }
    }
}

impl Display for SentimentClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current market sentiment reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    pub index_value: u8,
    pub classification: SentimentClass,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
}

impl SentimentReading {
    pub fn new(
        index_value: i64,
        classification: Option<SentimentClass>,
        timestamp: Option<OffsetDateTime>,
    ) -> Result<Self, ValidationError> {
        let index_value = u8::try_from(index_value)
            .ok()
            .filter(|value| *value <= 100)
            .ok_or(ValidationError::SentimentOutOfRange { value: index_value })?;

        Ok(Self {
            index_value,
            classification: classification.unwrap_or(SentimentClass::from_index(index_value)),
            timestamp,
        })
    }
}

/// Current prices for a set of assets requested together.
///
/// Serializes as a JSON object in request order: `{"BTC": "65000.00", ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiAssetSnapshot {
    entries: Vec<(AssetSymbol, Decimal)>,
}

impl MultiAssetSnapshot {
    /// Succeeds only when every requested symbol has a price. The error
    /// names the first missing symbol.
    pub fn complete(
        requested: &[AssetSymbol],
        mut lookup: impl FnMut(&AssetSymbol) -> Option<Decimal>,
    ) -> Result<Self, AssetSymbol> {
        let mut entries = Vec::with_capacity(requested.len());
        for symbol in requested {
            match lookup(symbol) {
                Some(price) => entries.push((symbol.clone(), price)),
                None => return Err(symbol.clone()),
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MultiAssetSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (symbol, price) in &self.entries {
            map.serialize_entry(symbol.as_str(), &money::round_display(*price).to_string())?;
        }
        map.end()
    }
}
