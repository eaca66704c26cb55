//! CLI argument definitions for ashare.
//!
//! Three commands drive the same fetch pipeline and differ only in what
//! they derive from it:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Fetch daily series and summarize each ticker |
//! | `analyze` | Fetch and compute per-ticker descriptive statistics |
//! | `compare` | Fetch and build normalized comparison views |

use clap::{Args, Parser, Subcommand, ValueEnum};

use ashare_core::Adjustment;

/// Daily A-share history fetch and analysis CLI.
///
/// Fetches per-ticker daily OHLCV history, normalizes the provider schema,
/// and reports statistics and normalized comparison series.
#[derive(Debug, Parser)]
#[command(
    name = "ashare",
    author,
    version,
    about = "A-share daily history fetch and analysis CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat skipped tickers as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Data source selection.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Auto)]
    pub source: SourceSelector,

    /// Inter-request delay in milliseconds.
    #[arg(long, global = true, default_value_t = 1_000)]
    pub delay_ms: u64,

    /// Disable the inter-request delay (replay and test runs).
    #[arg(long, global = true, default_value_t = false)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Data source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Use the default provider.
    Auto,
    /// Use the Eastmoney-style provider directly.
    Eastmoney,
    /// Use the offline replay provider.
    Replay,
}

/// Price adjustment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdjustSelector {
    /// Unadjusted prices.
    None,
    /// Forward-adjusted prices.
    Qfq,
    /// Backward-adjusted prices.
    Hfq,
}

impl AdjustSelector {
    pub const fn to_adjustment(self) -> Adjustment {
        match self {
            Self::None => Adjustment::Unadjusted,
            Self::Qfq => Adjustment::ForwardAdjusted,
            Self::Hfq => Adjustment::BackwardAdjusted,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch daily history and summarize each ticker's series.
    ///
    /// # Examples
    ///
    ///   ashare history 600519 000858 000001 --start 20220101 --end 20230101
    History(FetchArgs),

    /// Fetch daily history and compute per-ticker statistics.
    ///
    /// Reports mean/stddev of closes, period return, and the mean and
    /// volatility of daily returns. Degenerate series are flagged, not
    /// crashed on.
    ///
    /// # Examples
    ///
    ///   ashare analyze 600519 --start 20220101 --end 20230101 --pretty
    Analyze(FetchArgs),

    /// Fetch daily history and build normalized comparison views.
    ///
    /// Price series are rebased to 1.0 at the first observation; volume
    /// series are rescaled so each ticker peaks at 1.0.
    ///
    /// # Examples
    ///
    ///   ashare compare 600519 000858.SZ --start 20220101 --end 20230101
    Compare(FetchArgs),
}

/// Shared arguments for the fetch pipeline.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// One or more display symbols (e.g. 600519, 000858.SZ, 600000.SS).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Inclusive start date in YYYYMMDD form.
    #[arg(long)]
    pub start: String,

    /// Inclusive end date in YYYYMMDD form.
    #[arg(long)]
    pub end: String,

    /// Price adjustment mode.
    #[arg(long, value_enum, default_value_t = AdjustSelector::Hfq)]
    pub adjust: AdjustSelector,
}
