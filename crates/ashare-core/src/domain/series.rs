use serde::{Deserialize, Serialize};

use crate::{TickerSymbol, TradeDate, ValidationError};

/// Canonical daily OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Ordered-by-date price series for one ticker.
///
/// Non-empty, strictly increasing dates. The constructor re-sorts rows that
/// arrive out of order and rejects duplicate dates; the series is immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: TickerSymbol,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: TickerSymbol, mut bars: Vec<PriceBar>) -> Result<Self, ValidationError> {
        if bars.is_empty() {
            return Err(ValidationError::EmptySeries);
        }

        if !bars.windows(2).all(|pair| pair[0].date < pair[1].date) {
            bars.sort_by_key(|bar| bar.date);
            if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
                return Err(ValidationError::DuplicateDate {
                    date: pair[0].date.format_iso(),
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &TickerSymbol {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        self.bars.first().expect("series is never empty")
    }

    pub fn last(&self) -> &PriceBar {
        self.bars.last().expect("series is never empty")
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
