//! # Coinlens Core
//!
//! Upstream normalization and aggregation for the coinlens crypto dashboard API.
//!
//! ## Overview
//!
//! This crate turns four heterogeneous upstream APIs into one set of
//! canonical records:
//!
//! - **Provider adapters** for CoinAPI, CoinMarketCap, NewsAPI and the
//!   Alternative.me Fear & Greed Index
//! - **Canonical domain models** for prices, series, headlines and sentiment
//! - **Change computation** between a current reading and a reference close
//! - **An aggregator** exposing one async method per dashboard metric
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters and their wire schemas |
//! | [`aggregator`] | Per-metric orchestration |
//! | [`change`] | Absolute and percent change |
//! | [`config`] | Keys, provider choice, timeouts and base URLs |
//! | [`data_source`] | Provider traits and request types |
//! | [`domain`] | Domain models |
//! | [`error`] | Validation and aggregator errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`source`] | Provider identifiers |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP Server    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Aggregator     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Source Traits   │────▶│ HTTP Client      │
//! │ (Adapters)      │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Domain Models   │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`AggregatorError`], classified by kind:
//!
//! ```rust
//! use coinlens_core::{AggregatorError, AggregatorErrorKind};
//!
//! fn status_for(error: &AggregatorError) -> u16 {
//!     match error.kind() {
//!         AggregatorErrorKind::NotFound | AggregatorErrorKind::IncompleteData => 404,
//!         AggregatorErrorKind::InvalidRequest => 400,
//!         AggregatorErrorKind::RateLimited => 429,
//!         AggregatorErrorKind::Upstream => 500,
//!     }
//! }
//!
//! assert_eq!(status_for(&AggregatorError::not_found("empty")), 404);
//! ```
//!
//! ## Security
//!
//! - API keys are never logged; query-string keys are redacted in request logs
//! - All HTTP requests use TLS via rustls

pub mod adapters;
pub mod aggregator;
pub mod change;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod source;

// Adapter implementations
pub use adapters::{CoinApiAdapter, CoinMarketCapAdapter, FearGreedAdapter, NewsApiAdapter};

pub use aggregator::Aggregator;
pub use change::ChangeResult;
pub use config::{AggregatorConfig, UpstreamEndpoints};

// Provider traits and request types
pub use data_source::{
    HistoryRequest, HistorySource, NewsRequest, NewsSource, PriceQuotes, PriceSource,
    SentimentSource,
};

// Domain models
pub use domain::{
    AssetSymbol, CalendarDay, DateWindow, Granularity, MultiAssetSnapshot, NewsItem, PricePoint,
    PriceSeries, SentimentClass, SentimentReading, SpotPrice, MAX_NEWS_ITEMS, QUOTE_CURRENCY,
};

// Error types
pub use error::{AggregatorError, AggregatorErrorKind, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use source::ProviderId;
