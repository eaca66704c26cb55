use ashare_core::{MarketDataSource, PriceSeries, RequestPacer};
use serde::Serialize;
use serde_json::json;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{empty_result_warning, run_fetch, CommandResult};

/// Per-ticker series summary for console reporting.
#[derive(Debug, Serialize)]
struct SeriesSummary {
    symbol: String,
    rows: usize,
    first_date: String,
    last_date: String,
    min_close: f64,
    max_close: f64,
}

impl SeriesSummary {
    fn from_series(symbol: &str, series: &PriceSeries) -> Self {
        let mut min_close = f64::INFINITY;
        let mut max_close = f64::NEG_INFINITY;
        for bar in series.bars() {
            min_close = min_close.min(bar.close);
            max_close = max_close.max(bar.close);
        }

        Self {
            symbol: symbol.to_owned(),
            rows: series.len(),
            first_date: series.first().date.format_iso(),
            last_date: series.last().date.format_iso(),
            min_close,
            max_close,
        }
    }
}

pub fn run(
    args: &FetchArgs,
    source: &dyn MarketDataSource,
    pacer: &dyn RequestPacer,
) -> Result<CommandResult, CliError> {
    let (report, errors) = run_fetch(args, source, pacer)?;

    let summaries: Vec<SeriesSummary> = report
        .results
        .iter()
        .map(|(symbol, series)| SeriesSummary::from_series(symbol.as_str(), series))
        .collect();

    let data = json!({
        "fetched": report.results.len(),
        "skipped": report.skipped.len(),
        "series": summaries,
    });

    let mut result = CommandResult::ok(data).with_errors(errors);
    if let Some(warning) = empty_result_warning(&report) {
        result = result.with_warning(warning);
    }
    Ok(result)
}
