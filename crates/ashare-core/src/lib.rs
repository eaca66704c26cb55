//! Core contracts for ashare.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Symbol resolution to the provider's market/code format
//! - The market-data source trait and structured source errors
//! - Raw-table normalization into the canonical OHLCV schema
//! - Descriptive statistics and cross-series comparison views
//! - The sequential, fail-soft batch loop with injectable pacing

pub mod adapters;
pub mod analysis;
pub mod batch;
pub mod compare;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod pacing;
pub mod source;

pub use adapters::{EastmoneyAdapter, ReplayAdapter};
pub use analysis::{
    analyze, daily_returns, period_return, AnalysisError, SeriesStatistics, MIN_OBSERVATIONS,
};
pub use batch::{fetch_batch, BatchReport, ResultSet, SkipReason, SkippedTicker};
pub use compare::{
    build_views, ComparisonViews, DegenerateKind, NormalizedPoint, NormalizedSeries, ViewExclusion,
};
pub use data_source::{
    Adjustment, HistoryRequest, MarketDataSource, RawTable, SourceError, SourceErrorKind,
};
pub use domain::{DateRange, MarketCode, PriceBar, PriceSeries, ResolvedSymbol, TickerSymbol, TradeDate};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use normalize::{canonical_column_name, normalize, Normalized, SchemaError};
pub use pacing::{IntervalPacer, NoopPacer, PacingPolicy, RequestPacer};
pub use source::ProviderId;
