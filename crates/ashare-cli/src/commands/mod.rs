mod analyze;
mod compare;
mod history;

use std::time::{Duration, Instant};

use ashare_core::{
    fetch_batch, BatchReport, DateRange, EastmoneyAdapter, Envelope, EnvelopeError, EnvelopeMeta,
    IntervalPacer, MarketDataSource, NoopPacer, PacingPolicy, ReplayAdapter, RequestPacer,
    TickerSymbol,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command, FetchArgs, SourceSelector};
use crate::error::CliError;

const SCHEMA_VERSION: &str = "v1.0.0";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let source = build_source(cli.source);
    let pacer = build_pacer(cli);
    let started = Instant::now();

    let result = match &cli.command {
        Command::History(args) => history::run(args, source.as_ref(), pacer.as_ref())?,
        Command::Analyze(args) => analyze::run(args, source.as_ref(), pacer.as_ref())?,
        Command::Compare(args) => compare::run(args, source.as_ref(), pacer.as_ref())?,
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        SCHEMA_VERSION,
        source.id(),
        elapsed_ms,
    )?;

    for warning in result.warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, result.data, result.errors).map_err(CliError::from)
}

fn build_source(selector: SourceSelector) -> Box<dyn MarketDataSource> {
    match selector {
        SourceSelector::Auto | SourceSelector::Eastmoney => Box::new(EastmoneyAdapter),
        SourceSelector::Replay => Box::new(ReplayAdapter::new()),
    }
}

fn build_pacer(cli: &Cli) -> Box<dyn RequestPacer> {
    if cli.no_delay {
        return Box::new(NoopPacer);
    }
    Box::new(IntervalPacer::new(PacingPolicy::with_min_interval(
        Duration::from_millis(cli.delay_ms),
    )))
}

/// Parse the shared fetch arguments and run the batch. Invalid symbols or
/// an invalid date range are systemic failures and abort the run; every
/// per-ticker failure is contained in the report.
fn run_fetch(
    args: &FetchArgs,
    source: &dyn MarketDataSource,
    pacer: &dyn RequestPacer,
) -> Result<(BatchReport, Vec<EnvelopeError>), CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|symbol| TickerSymbol::parse(symbol))
        .collect::<Result<Vec<_>, _>>()?;
    let range = DateRange::parse_compact(&args.start, &args.end)?;

    let report = fetch_batch(
        source,
        &symbols,
        &range,
        args.adjust.to_adjustment(),
        pacer,
    );

    let errors = report
        .skipped
        .iter()
        .map(|skip| {
            EnvelopeError::new(skip.reason.code(), skip.reason.to_string())
                .map(|error| error.with_symbol(skip.symbol.as_str()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((report, errors))
}

fn empty_result_warning(report: &BatchReport) -> Option<String> {
    report
        .results
        .is_empty()
        .then(|| String::from("no ticker produced any data"))
}
