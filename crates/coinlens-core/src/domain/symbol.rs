use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 10;

/// Normalized crypto asset ticker such as `BTC` or `ETH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// Parse a comma separated list (`"btc, eth,XRP"`), dropping duplicates
    /// while keeping first-seen order.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        let mut symbols: Vec<Self> = Vec::new();
        for part in input.split(',').filter(|part| !part.trim().is_empty()) {
            let symbol = Self::parse(part)?;
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }

        if symbols.is_empty() {
            return Err(ValidationError::EmptySymbolList);
        }
        Ok(symbols)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetSymbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AssetSymbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AssetSymbol> for String {
    fn from(value: AssetSymbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = AssetSymbol::parse(" btc ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BTC");
    }

    #[test]
    fn rejects_invalid_start() {
        let err = AssetSymbol::parse("1INCH").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidStart { .. }));
    }

    #[test]
    fn rejects_pair_separators() {
        let err = AssetSymbol::parse("BTC/USD").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::SymbolInvalidChar { ch: '/', index: 3 }
        ));
    }

    #[test]
    fn parse_list_dedupes_in_order() {
        let symbols = AssetSymbol::parse_list("eth,BTC, eth ,xrp,").expect("list should parse");
        let names: Vec<&str> = symbols.iter().map(AssetSymbol::as_str).collect();
        assert_eq!(names, ["ETH", "BTC", "XRP"]);
    }

    #[test]
    fn parse_list_rejects_empty_input() {
        let err = AssetSymbol::parse_list(" , ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbolList);
    }
}
