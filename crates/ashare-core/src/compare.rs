use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ResultSet, TradeDate};

/// One rescaled observation handed to an external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub date: TradeDate,
    pub value: f64,
}

/// Series rescaled relative to a reference value (first close or max
/// volume) for cross-ticker comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|point| point.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|point| point.value)
    }
}

/// Why a ticker was left out of a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateKind {
    /// First close is zero; base-indexed prices are undefined.
    ZeroBaseClose,
    /// Every volume observation is zero; max-indexed volumes are undefined.
    ZeroMaxVolume,
}

impl DegenerateKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZeroBaseClose => "zero_base_close",
            Self::ZeroMaxVolume => "zero_max_volume",
        }
    }
}

/// A ticker excluded from one of the views, flagged distinctly from a
/// hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewExclusion {
    pub symbol: String,
    pub reason: DegenerateKind,
}

/// Normalized price and volume mappings for side-by-side rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonViews {
    pub price: BTreeMap<String, NormalizedSeries>,
    pub volume: BTreeMap<String, NormalizedSeries>,
    pub excluded: Vec<ViewExclusion>,
}

/// Build both comparison views from a result set.
///
/// Price: every close divided by the first close (base 1.0 at the series
/// start). Volume: every volume divided by the series max (peak 1.0).
/// Degenerate bases exclude the ticker from the affected view only.
pub fn build_views(results: &ResultSet) -> ComparisonViews {
    let mut views = ComparisonViews::default();

    for (symbol, series) in results.iter() {
        let bars = series.bars();
        let Some(first) = bars.first() else {
            continue;
        };

        if first.close == 0.0 {
            views.excluded.push(ViewExclusion {
                symbol: symbol.as_str().to_owned(),
                reason: DegenerateKind::ZeroBaseClose,
            });
        } else {
            let points = bars
                .iter()
                .map(|bar| NormalizedPoint {
                    date: bar.date,
                    value: bar.close / first.close,
                })
                .collect();
            views
                .price
                .insert(symbol.as_str().to_owned(), NormalizedSeries { points });
        }

        let max_volume = bars.iter().map(|bar| bar.volume).max().unwrap_or(0);
        if max_volume == 0 {
            views.excluded.push(ViewExclusion {
                symbol: symbol.as_str().to_owned(),
                reason: DegenerateKind::ZeroMaxVolume,
            });
        } else {
            let points = bars
                .iter()
                .map(|bar| NormalizedPoint {
                    date: bar.date,
                    value: bar.volume as f64 / max_volume as f64,
                })
                .collect();
            views
                .volume
                .insert(symbol.as_str().to_owned(), NormalizedSeries { points });
        }
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PriceBar, PriceSeries, TickerSymbol, TradeDate};

    fn series(code: &str, rows: &[(f64, u64)]) -> PriceSeries {
        let symbol = TickerSymbol::parse(code).expect("symbol");
        let bars = rows
            .iter()
            .enumerate()
            .map(|(day, (close, volume))| {
                let date = TradeDate::from_calendar_date(2022, 1, day as u8 + 3)
                    .expect("date must be valid");
                PriceBar::new(date, *close, close + 1.0, (close - 1.0).max(0.0), *close, *volume)
                    .expect("bar must be valid")
            })
            .collect();
        PriceSeries::new(symbol, bars).expect("series must build")
    }

    fn result_set(entries: Vec<PriceSeries>) -> ResultSet {
        let mut results = ResultSet::default();
        for series in entries {
            results.insert(series.symbol().clone(), series);
        }
        results
    }

    #[test]
    fn price_view_starts_at_exactly_one() {
        let results = result_set(vec![series("600519", &[(100.0, 10), (110.0, 20)])]);
        let views = build_views(&results);

        let normalized = views.price.get("600519").expect("ticker must be included");
        assert_eq!(normalized.first_value(), Some(1.0));
        assert_eq!(normalized.last_value(), Some(1.1));
    }

    #[test]
    fn volume_view_peaks_at_exactly_one() {
        let results = result_set(vec![series("600519", &[(10.0, 5), (11.0, 20), (12.0, 10)])]);
        let views = build_views(&results);

        let normalized = views.volume.get("600519").expect("ticker must be included");
        let max = normalized
            .points
            .iter()
            .map(|point| point.value)
            .fold(f64::MIN, f64::max);
        assert_eq!(max, 1.0);
        assert!(normalized
            .points
            .iter()
            .all(|point| (0.0..=1.0).contains(&point.value)));
    }

    #[test]
    fn zero_base_close_is_excluded_from_price_view_only() {
        let results = result_set(vec![series("600519", &[(0.0, 5), (1.0, 20)])]);
        let views = build_views(&results);

        assert!(views.price.is_empty());
        assert!(views.volume.contains_key("600519"));
        assert_eq!(
            views.excluded,
            vec![ViewExclusion {
                symbol: String::from("600519"),
                reason: DegenerateKind::ZeroBaseClose,
            }]
        );
    }

    #[test]
    fn zero_max_volume_is_excluded_from_volume_view_only() {
        let results = result_set(vec![series("000858", &[(10.0, 0), (11.0, 0)])]);
        let views = build_views(&results);

        assert!(views.price.contains_key("000858"));
        assert!(views.volume.is_empty());
        assert_eq!(views.excluded[0].reason, DegenerateKind::ZeroMaxVolume);
    }
}
