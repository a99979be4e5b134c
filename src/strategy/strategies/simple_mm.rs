use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    strategy::{
        Strategy,
        instrument_context::{InstrumentContext, WithContext},
        strategy_helpers::StrategyHelpers,
    },
    types::{
        instrument::Symbol, no_order_reason::NoOrderReason, order::Order, position::Position,
        price::Price,
    },
};

/// Two-sided market maker:
/// - wide spread: quote one tick inside the touch on both sides
/// - tight spread: quote one unit either side of mid
/// - size shrinks linearly with inventory usage
#[derive(Debug, Clone)]
pub struct SimpleMarketMakerStrategy {
    ctx: InstrumentContext,
    pub tick: i64,
    /// Spread (exclusive) above which we step inside the touch.
    pub required_spread: i64,
    /// Size quoted when flat.
    pub volume_cap: i64,
}

impl SimpleMarketMakerStrategy {
    pub fn new(
        symbol: impl Into<Symbol>,
        max_limit: i64,
        required_spread: i64,
        volume_cap: i64,
    ) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            tick: 1,
            required_spread,
            volume_cap,
        }
    }

    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self::new(symbol, max_limit, 2, 15)
    }
}

impl WithContext for SimpleMarketMakerStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for SimpleMarketMakerStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let mid = 0.5 * (best_bid.as_f64() + best_ask.as_f64());
        let spread = best_ask - best_bid;

        let (bid_price, ask_price) = if spread > self.required_spread {
            (best_bid + self.tick, best_ask - self.tick)
        } else {
            (Price::from_f64(mid - 1.0), Price::from_f64(mid + 1.0))
        };

        let size = self.inventory_scaled(self.volume_cap, position);
        if size <= 0 {
            return Err(NoOrderReason::NoCapacity);
        }

        let mut orders = Vec::with_capacity(2);
        if self.can_buy(position) {
            orders.extend(self.capped_buy(bid_price, size, position));
        }
        if self.can_sell(position) {
            orders.extend(self.capped_sell(ask_price, size, position));
        }

        if orders.is_empty() {
            return Err(NoOrderReason::NoCapacity);
        }

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(
        strategy: &mut SimpleMarketMakerStrategy,
        bid: i64,
        ask: i64,
        position: i64,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let book = OrderBook::from_levels([(bid, 10)], [(ask, -10)]);
        strategy.compute_orders(&MarketSnapshot::default(), &book, Position::new(position))
    }

    #[test]
    fn wide_spread_quotes_inside_the_touch() {
        let mut strategy = SimpleMarketMakerStrategy::for_instrument("SUDOWOODO", 50);
        let orders = quote(&mut strategy, 9998, 10002, 0).unwrap();

        assert_eq!(
            orders,
            vec![
                Order::new(Symbol::new("SUDOWOODO"), Price::new(9999), 15),
                Order::new(Symbol::new("SUDOWOODO"), Price::new(10001), -15),
            ]
        );
    }

    #[test]
    fn tight_spread_quotes_around_mid() {
        let mut strategy = SimpleMarketMakerStrategy::for_instrument("SUDOWOODO", 50);
        let orders = quote(&mut strategy, 9999, 10000, 0).unwrap();

        // mid 9999.5 -> 9998.5 / 10000.5, truncated
        assert_eq!(orders[0].price, Price::new(9998));
        assert_eq!(orders[1].price, Price::new(10000));
    }

    #[test]
    fn size_shrinks_with_inventory() {
        let mut strategy = SimpleMarketMakerStrategy::for_instrument("SUDOWOODO", 50);

        let orders = quote(&mut strategy, 9998, 10002, 25).unwrap();
        assert_eq!(orders[0].quantity, 7);
        assert_eq!(orders[1].quantity, -7);

        let orders = quote(&mut strategy, 9998, 10002, -45).unwrap();
        assert_eq!(orders[0].quantity, 1);
        assert_eq!(orders[1].quantity, -1);
    }

    #[test]
    fn at_the_limit_nothing_is_quoted() {
        let mut strategy = SimpleMarketMakerStrategy::for_instrument("SUDOWOODO", 50);
        assert_eq!(quote(&mut strategy, 9998, 10002, 50), Err(NoOrderReason::NoCapacity));
        assert_eq!(quote(&mut strategy, 9998, 10002, -50), Err(NoOrderReason::NoCapacity));
    }

    #[test]
    fn one_sided_book_is_a_no_op() {
        let mut strategy = SimpleMarketMakerStrategy::for_instrument("SUDOWOODO", 50);
        let book = OrderBook::from_levels([(9998, 10)], []);
        let result = strategy.compute_orders(&MarketSnapshot::default(), &book, Position::FLAT);
        assert_eq!(result, Err(NoOrderReason::MissingTopOfBook));
    }
}
