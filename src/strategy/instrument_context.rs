use crate::types::instrument::Symbol;

/// Identity and inventory cap shared by every strategy variant.
#[derive(Debug, Clone)]
pub struct InstrumentContext {
    pub symbol: Symbol,
    pub max_limit: i64,
}

impl InstrumentContext {
    pub fn new(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            symbol: symbol.into(),
            max_limit,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn max_limit(&self) -> i64 {
        self.max_limit
    }
}

pub trait WithContext {
    fn ctx(&self) -> &InstrumentContext;
}
