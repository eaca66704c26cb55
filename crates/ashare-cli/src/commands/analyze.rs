use ashare_core::{analyze, MarketDataSource, RequestPacer, SeriesStatistics};
use serde::Serialize;
use serde_json::json;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{empty_result_warning, run_fetch, CommandResult};

/// Statistics bundle for one ticker; `undefined_reason` is set instead of
/// `statistics` when the series is degenerate or too short.
#[derive(Debug, Serialize)]
struct TickerAnalysis {
    symbol: String,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<SeriesStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undefined_reason: Option<String>,
}

pub fn run(
    args: &FetchArgs,
    source: &dyn MarketDataSource,
    pacer: &dyn RequestPacer,
) -> Result<CommandResult, CliError> {
    let (report, errors) = run_fetch(args, source, pacer)?;

    let analyses: Vec<TickerAnalysis> = report
        .results
        .iter()
        .map(|(symbol, series)| match analyze(series) {
            Ok(statistics) => TickerAnalysis {
                symbol: symbol.as_str().to_owned(),
                rows: series.len(),
                statistics: Some(statistics),
                undefined_reason: None,
            },
            Err(reason) => TickerAnalysis {
                symbol: symbol.as_str().to_owned(),
                rows: series.len(),
                statistics: None,
                undefined_reason: Some(reason.to_string()),
            },
        })
        .collect();

    let data = json!({
        "fetched": report.results.len(),
        "skipped": report.skipped.len(),
        "analyses": analyses,
    });

    let mut result = CommandResult::ok(data).with_errors(errors);
    if let Some(warning) = empty_result_warning(&report) {
        result = result.with_warning(warning);
    }
    Ok(result)
}
