use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PriceSeries;

/// Minimum observations for the full statistics bundle: sample standard
/// deviations use an N-1 denominator, and the return sequence must itself
/// contain at least two entries.
pub const MIN_OBSERVATIONS: usize = 3;

/// Per-ticker descriptive statistics derived from one price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean_close: f64,
    pub stddev_close: f64,
    pub period_return_pct: f64,
    pub mean_daily_return_pct: f64,
    pub daily_return_volatility_pct: f64,
}

/// Why statistics for a series are undefined. Distinct from a hard
/// failure: the series itself is valid data.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("series contains no observations")]
    EmptySeries,
    #[error("series has {len} observations, at least {min} required")]
    TooShort { len: usize, min: usize },
    #[error("zero close price makes returns undefined")]
    DegenerateSeries,
}

/// Daily simple returns: `(close[i] - close[i-1]) / close[i-1]` for i >= 1.
/// The first observation has no return, so the result has length n-1.
pub fn daily_returns(series: &PriceSeries) -> Result<Vec<f64>, AnalysisError> {
    let closes = series.closes();
    closes
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                Err(AnalysisError::DegenerateSeries)
            } else {
                Ok((pair[1] - pair[0]) / pair[0])
            }
        })
        .collect()
}

/// Percentage change from the first to the last observation.
pub fn period_return(series: &PriceSeries) -> Result<f64, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let first = series.first().close;
    if first == 0.0 {
        return Err(AnalysisError::DegenerateSeries);
    }
    Ok((series.last().close - first) / first * 100.0)
}

/// Compute the full statistics bundle for a non-empty series.
pub fn analyze(series: &PriceSeries) -> Result<SeriesStatistics, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    if series.len() < MIN_OBSERVATIONS {
        return Err(AnalysisError::TooShort {
            len: series.len(),
            min: MIN_OBSERVATIONS,
        });
    }

    let closes = series.closes();
    let returns = daily_returns(series)?;

    let mean_close = mean(&closes);
    let mean_return = mean(&returns);

    Ok(SeriesStatistics {
        mean_close,
        stddev_close: sample_stddev(&closes, mean_close),
        period_return_pct: period_return(series)?,
        mean_daily_return_pct: mean_return * 100.0,
        daily_return_volatility_pct: sample_stddev(&returns, mean_return) * 100.0,
    })
}

/// Arithmetic mean. Callers guarantee a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator). Callers guarantee at
/// least two values.
fn sample_stddev(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PriceBar, TickerSymbol, TradeDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let symbol = TickerSymbol::parse("600519").expect("symbol");
        let bars = closes
            .iter()
            .enumerate()
            .map(|(day, close)| {
                let date = TradeDate::from_calendar_date(2022, 1, day as u8 + 3)
                    .expect("date must be valid");
                PriceBar::new(date, *close, close + 1.0, (close - 1.0).max(0.0), *close, 100)
                    .expect("bar must be valid")
            })
            .collect();
        PriceSeries::new(symbol, bars).expect("series must build")
    }

    #[test]
    fn return_sequence_is_one_shorter_than_the_series() {
        let returns = daily_returns(&series(&[100.0, 102.0, 101.0, 105.0, 110.0]))
            .expect("returns must be defined");
        assert_eq!(returns.len(), 4);
        assert!((returns[0] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn period_return_matches_exact_formula() {
        let value = period_return(&series(&[100.0, 102.0, 101.0, 105.0, 110.0]))
            .expect("must be defined");
        assert_eq!(value, 10.0);
    }

    #[test]
    fn statistics_match_hand_computed_values() {
        let stats = analyze(&series(&[100.0, 102.0, 101.0, 105.0, 110.0]))
            .expect("must be defined");
        assert_eq!(stats.mean_close, 103.6);
        assert_eq!(stats.period_return_pct, 10.0);
        // sqrt(65.2 / 4)
        assert!((stats.stddev_close - 16.3_f64.sqrt()).abs() < 1e-9);
        assert!(stats.daily_return_volatility_pct > 0.0);
    }

    #[test]
    fn zero_base_close_is_degenerate_not_nan() {
        let err = analyze(&series(&[0.0, 1.0, 2.0])).expect_err("must be degenerate");
        assert_eq!(err, AnalysisError::DegenerateSeries);

        let err = period_return(&series(&[0.0, 1.0, 2.0])).expect_err("must be degenerate");
        assert_eq!(err, AnalysisError::DegenerateSeries);
    }

    #[test]
    fn zero_close_inside_the_series_is_degenerate_too() {
        let err = analyze(&series(&[1.0, 0.0, 2.0])).expect_err("must be degenerate");
        assert_eq!(err, AnalysisError::DegenerateSeries);
    }

    #[test]
    fn short_series_is_rejected() {
        let err = analyze(&series(&[100.0, 101.0])).expect_err("must be too short");
        assert_eq!(err, AnalysisError::TooShort { len: 2, min: MIN_OBSERVATIONS });
    }

    #[test]
    fn sample_stddev_uses_n_minus_one() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sample_stddev(&values, mean(&values)) - 2.5_f64.sqrt()).abs() < 1e-9);
    }
}
