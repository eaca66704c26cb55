mod date;
mod series;
mod symbol;

pub use date::{DateRange, TradeDate};
pub use series::{PriceBar, PriceSeries};
pub use symbol::{MarketCode, ResolvedSymbol, TickerSymbol};
