use thiserror::Error;
use tracing::{info, warn};

use crate::normalize::{normalize, Normalized, SchemaError};
use crate::{
    Adjustment, DateRange, HistoryRequest, MarketDataSource, PriceSeries, RequestPacer,
    SourceError, TickerSymbol,
};

/// Why a ticker was left out of the result set. A tagged skip outcome,
/// not a thrown failure: callers must handle the skip path explicitly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkipReason {
    #[error("provider returned no rows")]
    EmptyResult,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SkipReason {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyResult => "skip.empty_result",
            Self::Schema(_) => "skip.schema",
            Self::Source(_) => "skip.source",
        }
    }
}

/// One skipped ticker with its retained reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub symbol: TickerSymbol,
    pub reason: SkipReason,
}

/// Ordered mapping from display symbol to its normalized series,
/// containing only tickers whose fetch succeeded. Input order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(TickerSymbol, PriceSeries)>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == symbol)
            .map(|(_, series)| series)
    }

    pub fn insert(&mut self, symbol: TickerSymbol, series: PriceSeries) {
        self.entries.push((symbol, series));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TickerSymbol, &PriceSeries)> {
        self.entries.iter().map(|(symbol, series)| (symbol, series))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &TickerSymbol> {
        self.entries.iter().map(|(symbol, _)| symbol)
    }
}

/// Outcome of one batch run: successes plus every skip with its reason.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: ResultSet,
    pub skipped: Vec<SkippedTicker>,
}

impl BatchReport {
    pub fn skip_for(&self, symbol: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|skip| skip.symbol.as_str() == symbol)
            .map(|skip| &skip.reason)
    }
}

/// Sequential per-ticker fetch loop: resolve, pace, fetch, normalize.
///
/// Every per-ticker failure is contained at the ticker boundary; the batch
/// always runs to completion in the supplied order.
pub fn fetch_batch(
    source: &dyn MarketDataSource,
    symbols: &[TickerSymbol],
    range: &DateRange,
    adjustment: Adjustment,
    pacer: &dyn RequestPacer,
) -> BatchReport {
    let mut report = BatchReport::default();

    for symbol in symbols {
        pacer.pace();

        let request = HistoryRequest::new(symbol.resolve(), *range, adjustment);
        let raw = match source.daily_history(&request) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(symbol = %symbol, code = error.code(), "fetch failed: {error}");
                report.skipped.push(SkippedTicker {
                    symbol: symbol.clone(),
                    reason: SkipReason::Source(error),
                });
                continue;
            }
        };

        match normalize(symbol, &raw) {
            Ok(Normalized::Series(series)) => {
                info!(symbol = %symbol, rows = series.len(), "fetched series");
                report.results.insert(symbol.clone(), series);
            }
            Ok(Normalized::Empty) => {
                warn!(symbol = %symbol, "provider returned no rows");
                report.skipped.push(SkippedTicker {
                    symbol: symbol.clone(),
                    reason: SkipReason::EmptyResult,
                });
            }
            Err(error) => {
                warn!(symbol = %symbol, "schema error: {error}");
                report.skipped.push(SkippedTicker {
                    symbol: symbol.clone(),
                    reason: SkipReason::Schema(error),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_codes_are_dotted() {
        assert_eq!(SkipReason::EmptyResult.code(), "skip.empty_result");
        assert_eq!(
            SkipReason::Source(SourceError::unavailable("down")).code(),
            "skip.source"
        );
    }

    #[test]
    fn result_set_preserves_insertion_order() {
        use crate::{PriceBar, TradeDate};

        let mut results = ResultSet::default();
        for code in ["600519", "000858"] {
            let symbol = TickerSymbol::parse(code).expect("symbol");
            let date = TradeDate::parse_iso("2022-01-04").expect("date");
            let bar = PriceBar::new(date, 1.0, 2.0, 0.5, 1.5, 10).expect("bar");
            let series = PriceSeries::new(symbol.clone(), vec![bar]).expect("series");
            results.insert(symbol, series);
        }

        let order: Vec<&str> = results.symbols().map(TickerSymbol::as_str).collect();
        assert_eq!(order, vec!["600519", "000858"]);
        assert!(results.get("000858").is_some());
        assert!(results.get("000001").is_none());
    }
}
