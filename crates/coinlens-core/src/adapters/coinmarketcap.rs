use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{parse_json, send_accepting, trim_base_url};
use crate::data_source::{PriceQuotes, PriceSource};
use crate::domain::money::price_from_f64;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{AggregatorError, AssetSymbol, ProviderId, QUOTE_CURRENCY};

pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
/// Status and `status.error_code` CoinMarketCap uses for an unknown symbol.
const INVALID_VALUE: u16 = 400;

/// CoinMarketCap quotes adapter. Prices any number of symbols in one call.
#[derive(Clone)]
pub struct CoinMarketCapAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl CoinMarketCapAdapter {
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

    async fn fetch_quotes(&self, symbols: &[AssetSymbol]) -> Result<PriceQuotes, AggregatorError> {
        if symbols.is_empty() {
            return Ok(PriceQuotes::new());
        }

        let joined = symbols
            .iter()
            .map(AssetSymbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let request = HttpRequest::get(format!(
            "{}/v1/cryptocurrency/quotes/latest",
            self.base_url
        ))
        .with_query("symbol", &joined)
        .with_query("convert", QUOTE_CURRENCY)
        .with_auth(&self.auth)
        .with_timeout_ms(self.timeout_ms);

        let response = send_accepting(
            self.http_client.as_ref(),
            ProviderId::CoinMarketCap,
            request,
            None,
            &[INVALID_VALUE],
        )
        .await?;
        let payload: CmcQuotesResponse = parse_json(ProviderId::CoinMarketCap, &response.body)?;
        if response.status == INVALID_VALUE && !payload.has_error_code() {
            return Err(AggregatorError::upstream(format!(
                "coinmarketcap returned status {INVALID_VALUE}"
            )));
        }
        normalize_quotes(payload)
    }
}

impl PriceSource for CoinMarketCapAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CoinMarketCap
    }

    fn latest_price<'a>(
        &'a self,
        symbol: &'a AssetSymbol,
    ) -> BoxFuture<'a, Result<Decimal, AggregatorError>> {
        Box::pin(async move {
            let quotes = self.fetch_quotes(std::slice::from_ref(symbol)).await?;
            quotes.get(symbol).copied().ok_or_else(|| {
                AggregatorError::not_found(format!(
                    "coinmarketcap returned no USD price for {symbol}"
                ))
            })
        })
    }

    fn latest_prices<'a>(
        &'a self,
        symbols: &'a [AssetSymbol],
    ) -> BoxFuture<'a, Result<PriceQuotes, AggregatorError>> {
        Box::pin(self.fetch_quotes(symbols))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CmcQuotesResponse {
    #[serde(default)]
    status: Option<CmcStatus>,
    #[serde(default)]
    data: Option<HashMap<String, CmcAsset>>,
}

impl CmcQuotesResponse {
    fn has_error_code(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.error_code != 0)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CmcStatus {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CmcAsset {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct CmcQuote {
    #[serde(default)]
    price: Option<f64>,
}

/// Extracts `data[SYM].quote.USD.price` for every asset that has one. An
/// invalid-symbol error code is a miss, any other error code is upstream.
fn normalize_quotes(payload: CmcQuotesResponse) -> Result<PriceQuotes, AggregatorError> {
    if let Some(status) = payload.status.filter(|status| status.error_code != 0) {
        let message = format!(
            "coinmarketcap error {}: {}",
            status.error_code,
            status.error_message.unwrap_or_default()
        );
        if status.error_code == i64::from(INVALID_VALUE) {
            return Err(AggregatorError::not_found(message));
        }
        return Err(AggregatorError::upstream(message));
    }

    let mut quotes = PriceQuotes::new();
    for (key, asset) in payload.data.unwrap_or_default() {
        let name = asset.symbol.as_deref().unwrap_or(key.as_str());
        let Ok(symbol) = AssetSymbol::parse(name) else {
            debug!(symbol = name, "skipping coinmarketcap asset with unusable symbol");
            continue;
        };

        let price = asset
            .quote
            .get(QUOTE_CURRENCY)
            .and_then(|quote| quote.price)
            .and_then(|price| price_from_f64("price", price).ok());
        match price {
            Some(price) => {
                quotes.insert(symbol, price);
            }
            None => debug!(%symbol, "coinmarketcap asset has no usable USD price"),
        }
    }

    Ok(quotes)
}
