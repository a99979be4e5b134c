use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    strategy::{
        instrument_context::{InstrumentContext, WithContext},
        strategy::Strategy,
    },
    types::{
        instrument::Symbol, no_order_reason::NoOrderReason, order::Order, position::Position,
    },
};

/// Holds a limit, never trades. Stands in for instruments nobody has a model for.
#[derive(Debug, Clone)]
pub struct PassthroughStrategy {
    ctx: InstrumentContext,
}

impl PassthroughStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
        }
    }
}

impl WithContext for PassthroughStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for PassthroughStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        _book: &OrderBook,
        _position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        Err(NoOrderReason::Passthrough)
    }
}
