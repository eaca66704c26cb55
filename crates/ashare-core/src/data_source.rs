use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DateRange, ProviderId, ResolvedSymbol, ValidationError};

/// Price adjustment mode forwarded to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjustment {
    #[serde(rename = "none")]
    Unadjusted,
    /// Forward-adjusted (qfq).
    #[serde(rename = "qfq")]
    ForwardAdjusted,
    /// Backward-adjusted (hfq), the default for long-horizon comparisons.
    #[default]
    #[serde(rename = "hfq")]
    BackwardAdjusted,
}

impl Adjustment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unadjusted => "none",
            Self::ForwardAdjusted => "qfq",
            Self::BackwardAdjusted => "hfq",
        }
    }
}

impl Display for Adjustment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Adjustment {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::Unadjusted),
            "qfq" => Ok(Self::ForwardAdjusted),
            "hfq" => Ok(Self::BackwardAdjusted),
            other => Err(ValidationError::InvalidAdjustment {
                value: other.to_owned(),
            }),
        }
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured collaborator error surfaced at the per-ticker boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the daily-history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: ResolvedSymbol,
    pub range: DateRange,
    pub adjustment: Adjustment,
}

impl HistoryRequest {
    pub fn new(symbol: ResolvedSymbol, range: DateRange, adjustment: Adjustment) -> Self {
        Self {
            symbol,
            range,
            adjustment,
        }
    }
}

/// Provider-native tabular result: named columns, string cells.
///
/// Column labels are whatever the provider emits (the six expected labels
/// plus any extras); a table with no rows is the "no data" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }
}

/// External market-data collaborator contract.
pub trait MarketDataSource: Send + Sync {
    fn id(&self) -> ProviderId;
    fn daily_history(&self, req: &HistoryRequest) -> Result<RawTable, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_the_no_data_sentinel() {
        let table = RawTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn source_error_codes_are_dotted() {
        assert_eq!(SourceError::unavailable("down").code(), "source.unavailable");
        assert_eq!(
            SourceError::invalid_request("bad").code(),
            "source.invalid_request"
        );
        assert!(SourceError::rate_limited("slow").retryable());
        assert!(!SourceError::internal("bug").retryable());
    }

    #[test]
    fn parses_adjustment() {
        assert_eq!(
            Adjustment::from_str("hfq").expect("must parse"),
            Adjustment::BackwardAdjusted
        );
        assert_eq!(Adjustment::from_str("").expect("must parse"), Adjustment::Unadjusted);
        assert!(matches!(
            Adjustment::from_str("dividends"),
            Err(ValidationError::InvalidAdjustment { .. })
        ));
    }
}
