use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid granularity '{value}', expected one of 1DAY, 7DAY, 1MTH")]
    InvalidGranularity { value: String },
    #[error("invalid provider '{value}', expected one of coinapi, coinmarketcap")]
    InvalidProvider { value: String },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date window start {start} is after end {end}")]
    InvertedWindow { start: String, end: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("sentiment index {value} is outside 0..=100")]
    SentimentOutOfRange { value: i64 },

    #[error("request must include at least one symbol")]
    EmptySymbolList,
    #[error("news topic cannot be empty")]
    EmptyTopic,
}

/// Failure classification shared by every aggregator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorErrorKind {
    /// Upstream answered but carried no usable data.
    NotFound,
    /// One of two required inputs was missing or zero.
    IncompleteData,
    /// Transport failure, non-2xx status, or an unparseable body.
    Upstream,
    /// Upstream answered with HTTP 429.
    RateLimited,
    /// Caller input failed validation before any upstream call.
    InvalidRequest,
}

/// Structured error returned by adapters and the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorError {
    kind: AggregatorErrorKind,
    message: String,
}

impl AggregatorError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AggregatorErrorKind::NotFound, message)
    }

    pub fn incomplete_data(message: impl Into<String>) -> Self {
        Self::new(AggregatorErrorKind::IncompleteData, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(AggregatorErrorKind::Upstream, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(AggregatorErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AggregatorErrorKind::InvalidRequest, message)
    }

    fn new(kind: AggregatorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> AggregatorErrorKind {
        self.kind
    }

    /// Operator-facing detail. Not meant for API callers.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            AggregatorErrorKind::NotFound => "aggregator.not_found",
            AggregatorErrorKind::IncompleteData => "aggregator.incomplete_data",
            AggregatorErrorKind::Upstream => "aggregator.upstream",
            AggregatorErrorKind::RateLimited => "aggregator.rate_limited",
            AggregatorErrorKind::InvalidRequest => "aggregator.invalid_request",
        }
    }
}

impl Display for AggregatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for AggregatorError {}

impl From<ValidationError> for AggregatorError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}
