use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

const SHANGHAI_SUFFIX: &str = ".SS";
const SHENZHEN_SUFFIX: &str = ".SZ";

/// Two-letter exchange code used by the provider request format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCode {
    #[serde(rename = "sh")]
    Shanghai,
    #[serde(rename = "sz")]
    Shenzhen,
}

impl MarketCode {
    pub const ALL: [Self; 2] = [Self::Shanghai, Self::Shenzhen];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shanghai => "sh",
            Self::Shenzhen => "sz",
        }
    }
}

impl Display for MarketCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketCode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sh" => Ok(Self::Shanghai),
            "sz" => Ok(Self::Shenzhen),
            other => Err(ValidationError::InvalidMarket {
                value: other.to_owned(),
            }),
        }
    }
}

/// Display-form ticker identifier, possibly carrying an exchange suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Parse a display symbol. The stored form is kept byte-for-byte as
    /// supplied (minus surrounding whitespace); resolution depends on it.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = trimmed.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the display form onto the provider's market/code pair.
    ///
    /// `.SS` and `.SZ` suffixes select Shanghai and Shenzhen; anything else
    /// is taken verbatim as a Shanghai code. Total by construction:
    /// unrecognized formats fall through to the default branch.
    pub fn resolve(&self) -> ResolvedSymbol {
        if let Some(code) = self.0.strip_suffix(SHANGHAI_SUFFIX) {
            ResolvedSymbol::new(MarketCode::Shanghai, code)
        } else if let Some(code) = self.0.strip_suffix(SHENZHEN_SUFFIX) {
            ResolvedSymbol::new(MarketCode::Shenzhen, code)
        } else {
            ResolvedSymbol::new(MarketCode::Shanghai, &self.0)
        }
    }
}

impl Display for TickerSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for TickerSymbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

/// Provider-facing market/code pair produced by symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub market: MarketCode,
    pub code: String,
}

impl ResolvedSymbol {
    pub fn new(market: MarketCode, code: impl Into<String>) -> Self {
        Self {
            market,
            code: code.into(),
        }
    }

    /// Market-prefixed code, e.g. `sh600519`.
    pub fn qualified(&self) -> String {
        format!("{}{}", self.market.as_str(), self.code)
    }
}

impl Display for ResolvedSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.market.as_str(), self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shanghai_suffix_resolves_to_sh_with_suffix_stripped() {
        let symbol = TickerSymbol::parse("600000.SS").expect("symbol should parse");
        let resolved = symbol.resolve();
        assert_eq!(resolved.market, MarketCode::Shanghai);
        assert_eq!(resolved.code, "600000");
    }

    #[test]
    fn shenzhen_suffix_resolves_to_sz_with_suffix_stripped() {
        let symbol = TickerSymbol::parse("000858.SZ").expect("symbol should parse");
        let resolved = symbol.resolve();
        assert_eq!(resolved.market, MarketCode::Shenzhen);
        assert_eq!(resolved.code, "000858");
    }

    #[test]
    fn unsuffixed_symbol_defaults_to_shanghai_unchanged() {
        let symbol = TickerSymbol::parse("600519").expect("symbol should parse");
        let resolved = symbol.resolve();
        assert_eq!(resolved.market, MarketCode::Shanghai);
        assert_eq!(resolved.code, "600519");
        assert_eq!(resolved.qualified(), "sh600519");
    }

    #[test]
    fn unrecognized_suffix_falls_through_to_default() {
        let symbol = TickerSymbol::parse("600519.XX").expect("symbol should parse");
        let resolved = symbol.resolve();
        assert_eq!(resolved.market, MarketCode::Shanghai);
        assert_eq!(resolved.code, "600519.XX");
    }

    #[test]
    fn rejects_empty_symbol() {
        let err = TickerSymbol::parse("  ").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptySymbol));
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = TickerSymbol::parse("600519$").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { .. }));
    }

    #[test]
    fn parses_market_code() {
        let market = MarketCode::from_str("SZ").expect("must parse");
        assert_eq!(market, MarketCode::Shenzhen);
        assert!(matches!(
            MarketCode::from_str("bj"),
            Err(ValidationError::InvalidMarket { .. })
        ));
    }
}
