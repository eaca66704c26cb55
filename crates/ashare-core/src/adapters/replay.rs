use std::collections::HashMap;

use crate::data_source::{HistoryRequest, MarketDataSource, RawTable, SourceError};
use crate::{MarketCode, ProviderId};

/// Adapter replaying preloaded provider tables, keyed by the qualified
/// market/code pair. Unknown symbols replay the empty "no data" sentinel;
/// scripted failures exercise the collaborator-failure path.
#[derive(Debug, Clone, Default)]
pub struct ReplayAdapter {
    tables: HashMap<String, RawTable>,
    failures: HashMap<String, SourceError>,
}

impl ReplayAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, market: MarketCode, code: &str, table: RawTable) -> Self {
        self.tables.insert(key(market, code), table);
        self
    }

    pub fn with_failure(mut self, market: MarketCode, code: &str, error: SourceError) -> Self {
        self.failures.insert(key(market, code), error);
        self
    }
}

impl MarketDataSource for ReplayAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Replay
    }

    fn daily_history(&self, req: &HistoryRequest) -> Result<RawTable, SourceError> {
        let key = req.symbol.qualified();

        if let Some(error) = self.failures.get(&key) {
            return Err(error.clone());
        }

        Ok(self
            .tables
            .get(&key)
            .cloned()
            .unwrap_or_else(RawTable::empty))
    }
}

fn key(market: MarketCode, code: &str) -> String {
    format!("{}{}", market.as_str(), code)
}
