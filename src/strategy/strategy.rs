use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    strategy::instrument_context::WithContext,
    types::{no_order_reason::NoOrderReason, order::Order, position::Position},
};

pub trait Strategy: WithContext {
    /// Decides this tick's orders for the strategy's own instrument.
    ///
    /// `book` is the instrument's own book from `snapshot`; `position` is its
    /// current net inventory. Rolling state is updated in place, so calls
    /// must be made once per tick, in tick order.
    fn compute_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason>;
}
