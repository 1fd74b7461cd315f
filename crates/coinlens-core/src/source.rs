use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upstream providers the aggregator knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    CoinApi,
    CoinMarketCap,
    NewsApi,
    AlternativeMe,
}

impl ProviderId {
    /// Providers able to serve spot prices.
    pub const PRICE_PROVIDERS: [Self; 2] = [Self::CoinApi, Self::CoinMarketCap];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoinApi => "coinapi",
            Self::CoinMarketCap => "coinmarketcap",
            Self::NewsApi => "newsapi",
            Self::AlternativeMe => "alternativeme",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a price provider name. News and sentiment providers are fixed and
/// therefore not selectable.
impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "coinapi" => Ok(Self::CoinApi),
            "coinmarketcap" | "cmc" => Ok(Self::CoinMarketCap),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
