use ashare_core::{build_views, MarketDataSource, RequestPacer};
use serde_json::json;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{empty_result_warning, run_fetch, CommandResult};

pub fn run(
    args: &FetchArgs,
    source: &dyn MarketDataSource,
    pacer: &dyn RequestPacer,
) -> Result<CommandResult, CliError> {
    let (report, errors) = run_fetch(args, source, pacer)?;

    let views = build_views(&report.results);
    let data = json!({
        "fetched": report.results.len(),
        "skipped": report.skipped.len(),
        "views": &views,
    });

    let mut result = CommandResult::ok(data).with_errors(errors);
    for exclusion in &views.excluded {
        result = result.with_warning(format!(
            "{} excluded from view: {}",
            exclusion.symbol,
            exclusion.reason.as_str()
        ));
    }
    if let Some(warning) = empty_result_warning(&report) {
        result = result.with_warning(warning);
    }
    Ok(result)
}
