use crate::{
    market::order_book::OrderBook,
    strategy::instrument_context::WithContext,
    types::{
        no_order_reason::NoOrderReason, order::Order, position::Position, price::Price,
    },
};

pub trait StrategyHelpers: WithContext {
    fn best_bid_ask(book: &OrderBook) -> Result<(Price, Price), NoOrderReason> {
        book.top_of_book().ok_or(NoOrderReason::MissingTopOfBook)
    }

    fn can_buy(&self, position: Position) -> bool {
        position.net() < self.ctx().max_limit()
    }

    fn can_sell(&self, position: Position) -> bool {
        position.net() > -self.ctx().max_limit()
    }

    /// `cap` shrunk linearly by inventory usage, truncated toward zero.
    fn inventory_scaled(&self, cap: i64, position: Position) -> i64 {
        (cap as f64 * position.headroom(self.ctx().max_limit())) as i64
    }

    /// Buy of `min(desired, remaining buy capacity)`; `None` when that is not positive.
    fn capped_buy(&self, price: Price, desired: i64, position: Position) -> Option<Order> {
        let size = desired.min(position.buy_capacity(self.ctx().max_limit()));
        (size > 0).then(|| Order::buy(self.ctx().symbol().clone(), price, size))
    }

    /// Sell of `min(desired, remaining sell capacity)`; `None` when that is not positive.
    fn capped_sell(&self, price: Price, desired: i64, position: Position) -> Option<Order> {
        let size = desired.min(position.sell_capacity(self.ctx().max_limit()));
        (size > 0).then(|| Order::sell(self.ctx().symbol().clone(), price, size))
    }
}

impl<T: WithContext> StrategyHelpers for T {}
