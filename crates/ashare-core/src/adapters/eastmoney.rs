use time::Weekday;

use crate::data_source::{HistoryRequest, MarketDataSource, RawTable, SourceError};
use crate::{ProviderId, TradeDate};

/// Deterministic Eastmoney-style adapter producing seeded daily history.
///
/// Emits the provider-native table shape: the six expected Chinese column
/// labels plus a turnover column, one row per weekday in the requested
/// range, values seeded by the bare code so repeated runs are identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct EastmoneyAdapter;

impl MarketDataSource for EastmoneyAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Eastmoney
    }

    fn daily_history(&self, req: &HistoryRequest) -> Result<RawTable, SourceError> {
        if req.symbol.code.is_empty() {
            return Err(SourceError::invalid_request(
                "history request requires a non-empty symbol code",
            ));
        }

        let seed = code_seed(&req.symbol.code);
        let columns: Vec<String> = ["日期", "开盘", "收盘", "最高", "最低", "成交量", "成交额"]
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut rows = Vec::new();
        let mut day = Some(req.range.start());
        let mut index: u64 = 0;

        while let Some(date) = day {
            if date > req.range.end() {
                break;
            }
            if is_trading_day(date) {
                rows.push(synth_row(date, seed, index));
                index += 1;
            }
            day = date.next_day();
        }

        Ok(RawTable::new(columns, rows))
    }
}

fn synth_row(date: TradeDate, seed: u64, index: u64) -> Vec<String> {
    let base = 40.0 + ((seed.wrapping_add(index * 7)) % 2_500) as f64 / 10.0;
    let open = base;
    let close = base + 0.30;
    let high = base + 1.20;
    let low = base - 0.80;
    let volume = 100_000 + (index % 240) * 2_500 + seed % 50_000;

    vec![
        date.format_iso(),
        format!("{open:.2}"),
        format!("{close:.2}"),
        format!("{high:.2}"),
        format!("{low:.2}"),
        volume.to_string(),
        format!("{:.2}", close * volume as f64),
    ]
}

fn is_trading_day(date: TradeDate) -> bool {
    !matches!(
        date.into_inner().weekday(),
        Weekday::Saturday | Weekday::Sunday
    )
}

fn code_seed(code: &str) -> u64 {
    code.bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
