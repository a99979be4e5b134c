use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    strategy::{
        instrument_context::{InstrumentContext, WithContext},
        strategy::Strategy,
        strategy_helpers::StrategyHelpers,
    },
    types::{
        instrument::Symbol, no_order_reason::NoOrderReason, order::Order, position::Position,
    },
};

/// Joins both sides of the touch while the market is tight.
#[derive(Debug, Clone)]
pub struct LiquidityProviderStrategy {
    ctx: InstrumentContext,
    pub order_size: i64,
    /// Widest spread (inclusive) we are willing to join.
    pub spread_threshold: i64,
}

impl LiquidityProviderStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            order_size: 10,
            spread_threshold: 4,
        }
    }
}

impl WithContext for LiquidityProviderStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for LiquidityProviderStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let spread = best_ask - best_bid;
        if spread > self.spread_threshold {
            return Err(NoOrderReason::SpreadOutOfRange { spread });
        }

        let orders: Vec<Order> = self
            .capped_buy(best_bid, self.order_size, position)
            .into_iter()
            .chain(self.capped_sell(best_ask, self.order_size, position))
            .collect();

        if orders.is_empty() {
            return Err(NoOrderReason::NoCapacity);
        }

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;

    #[test]
    fn joins_a_tight_market() {
        let mut strategy = LiquidityProviderStrategy::for_instrument("PRODUCT", 50);
        let book = OrderBook::from_levels([(99, 5)], [(103, -5)]);

        let orders = strategy
            .compute_orders(&MarketSnapshot::default(), &book, Position::new(45))
            .unwrap();

        assert_eq!(
            orders,
            vec![
                Order::new(Symbol::new("PRODUCT"), Price::new(99), 5),
                Order::new(Symbol::new("PRODUCT"), Price::new(103), -10),
            ]
        );
    }

    #[test]
    fn stays_out_of_a_wide_market() {
        let mut strategy = LiquidityProviderStrategy::for_instrument("PRODUCT", 50);
        let book = OrderBook::from_levels([(99, 5)], [(104, -5)]);

        let result = strategy.compute_orders(&MarketSnapshot::default(), &book, Position::FLAT);
        assert_eq!(result, Err(NoOrderReason::SpreadOutOfRange { spread: 5 }));
    }

    #[test]
    fn long_at_limit_only_offers() {
        let mut strategy = LiquidityProviderStrategy::for_instrument("PRODUCT", 50);
        let book = OrderBook::from_levels([(99, 5)], [(101, -5)]);

        let orders = strategy
            .compute_orders(&MarketSnapshot::default(), &book, Position::new(50))
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, -10);
    }
}
