use thiserror::Error;

use crate::{PriceBar, PriceSeries, RawTable, TickerSymbol, TradeDate, ValidationError};

/// Fixed provider-native → canonical column rename table.
const COLUMN_MAP: [(&str, &str); 6] = [
    ("日期", "date"),
    ("开盘", "open"),
    ("收盘", "close"),
    ("最高", "high"),
    ("最低", "low"),
    ("成交量", "volume"),
];

/// Canonical name for a column label, accepting both the provider-native
/// label and the canonical name itself (renaming is idempotent).
pub fn canonical_column_name(label: &str) -> Option<&'static str> {
    COLUMN_MAP
        .iter()
        .find(|(provider, canonical)| label == *provider || label == *canonical)
        .map(|(_, canonical)| *canonical)
}

/// Per-ticker normalization failure. Hard for the offending ticker only;
/// the batch loop contains it and moves on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("missing expected column '{provider_label}' ({canonical})")]
    MissingColumn {
        provider_label: &'static str,
        canonical: &'static str,
    },
    #[error("row {row} has no value for '{column}'")]
    MissingCell { row: usize, column: &'static str },
    #[error("row {row} has unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("row {row} has unparseable number '{value}' for '{column}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error(transparent)]
    InvalidRecord(#[from] ValidationError),
}

/// Outcome of normalizing a raw provider table.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Series(PriceSeries),
    /// The provider returned no rows; a skip signal, not an error.
    Empty,
}

/// Rename the six fixed provider columns to the canonical schema, parse
/// cells, and assemble a chronologically ordered [`PriceSeries`].
///
/// Extra provider columns are ignored. Rows arriving out of order are
/// re-sorted by date.
pub fn normalize(symbol: &TickerSymbol, raw: &RawTable) -> Result<Normalized, SchemaError> {
    if raw.is_empty() {
        return Ok(Normalized::Empty);
    }

    let columns = CanonicalColumns::locate(raw)?;
    let mut bars = Vec::with_capacity(raw.len());

    for (row_index, row) in raw.rows().iter().enumerate() {
        bars.push(columns.parse_row(row_index, row)?);
    }

    let series = PriceSeries::new(symbol.clone(), bars)?;
    Ok(Normalized::Series(series))
}

/// Indices of the six canonical columns within one raw table.
struct CanonicalColumns {
    date: usize,
    open: usize,
    close: usize,
    high: usize,
    low: usize,
    volume: usize,
}

impl CanonicalColumns {
    fn locate(raw: &RawTable) -> Result<Self, SchemaError> {
        let find = |provider_label: &'static str, canonical: &'static str| {
            raw.columns()
                .iter()
                .position(|label| canonical_column_name(label) == Some(canonical))
                .ok_or(SchemaError::MissingColumn {
                    provider_label,
                    canonical,
                })
        };

        Ok(Self {
            date: find("日期", "date")?,
            open: find("开盘", "open")?,
            close: find("收盘", "close")?,
            high: find("最高", "high")?,
            low: find("最低", "low")?,
            volume: find("成交量", "volume")?,
        })
    }

    fn parse_row(&self, row_index: usize, row: &[String]) -> Result<PriceBar, SchemaError> {
        let cell = |index: usize, column: &'static str| {
            row.get(index)
                .map(String::as_str)
                .ok_or(SchemaError::MissingCell {
                    row: row_index,
                    column,
                })
        };

        let date_cell = cell(self.date, "date")?;
        let date = TradeDate::parse_iso(date_cell).map_err(|_| SchemaError::InvalidDate {
            row: row_index,
            value: date_cell.to_owned(),
        })?;

        let open = parse_price(cell(self.open, "open")?, row_index, "open")?;
        let close = parse_price(cell(self.close, "close")?, row_index, "close")?;
        let high = parse_price(cell(self.high, "high")?, row_index, "high")?;
        let low = parse_price(cell(self.low, "low")?, row_index, "low")?;
        let volume = parse_volume(cell(self.volume, "volume")?, row_index)?;

        Ok(PriceBar::new(date, open, high, low, close, volume)?)
    }
}

fn parse_price(value: &str, row: usize, column: &'static str) -> Result<f64, SchemaError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| SchemaError::InvalidNumber {
            row,
            column,
            value: value.to_owned(),
        })
}

fn parse_volume(value: &str, row: usize) -> Result<u64, SchemaError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| SchemaError::InvalidNumber {
            row,
            column: "volume",
            value: value.to_owned(),
        })
}
