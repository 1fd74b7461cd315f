//! Startup configuration.
//!
//! Every setting can come from a flag or its environment variable:
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--port` | `PORT` | `5000` |
//! | `--host` | `COINLENS_HOST` | `0.0.0.0` |
//! | `--coinapi-key` | `COINAPI_KEY` | required |
//! | `--news-api-key` | `NEWS_API_KEY` | required |
//! | `--cmc-api-key` | `CMC_API_KEY` | unset |
//! | `--price-provider` | `COINLENS_PRICE_PROVIDER` | `coinapi` |
//! | `--timeout-ms` | `COINLENS_TIMEOUT_MS` | `10000` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use coinlens_core::http_client::DEFAULT_TIMEOUT_MS;
use coinlens_core::{AggregatorConfig, ProviderId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing API key: set {env}")]
    MissingKey { env: &'static str },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Server settings, parsed once at startup.
#[derive(Clone, Parser)]
#[command(
    name = "coinlens-server",
    version,
    about = "Crypto market dashboard API"
)]
pub struct ServerConfig {
    /// Listen port.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Listen address.
    #[arg(long, env = "COINLENS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// CoinAPI key. History always comes from CoinAPI.
    #[arg(long, env = "COINAPI_KEY", hide_env_values = true)]
    pub coinapi_key: Option<String>,

    /// NewsAPI key.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// CoinMarketCap key, required when it is the price provider.
    #[arg(long, env = "CMC_API_KEY", hide_env_values = true)]
    pub cmc_api_key: Option<String>,

    /// Provider for spot prices and snapshots (coinapi, coinmarketcap).
    #[arg(long, env = "COINLENS_PRICE_PROVIDER", default_value = "coinapi")]
    pub price_provider: ProviderId,

    /// Per-request upstream timeout in milliseconds.
    #[arg(long, env = "COINLENS_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn into_aggregator_config(self) -> Result<AggregatorConfig, ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let coinapi_key = required(self.coinapi_key, "COINAPI_KEY")?;
        let news_api_key = required(self.news_api_key, "NEWS_API_KEY")?;
        let mut config =
            AggregatorConfig::new(coinapi_key, news_api_key).with_timeout_ms(self.timeout_ms);

        if self.price_provider == ProviderId::CoinMarketCap {
            config = config.with_coinmarketcap(required(self.cmc_api_key, "CMC_API_KEY")?);
        }

        Ok(config)
    }
}

fn required(value: Option<String>, env: &'static str) -> Result<String, ConfigError> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingKey { env })
}
