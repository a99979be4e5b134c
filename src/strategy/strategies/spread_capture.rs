use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    strategy::{
        instrument_context::{InstrumentContext, WithContext},
        strategy::Strategy,
        strategy_helpers::StrategyHelpers,
    },
    types::{
        instrument::Symbol, no_order_reason::NoOrderReason, order::Order, position::Position,
        price::Price,
    },
};

/// Takes the touch when it trades through a quarter-spread band around mid.
/// Stateless; sizes by the volume resting at the touch.
#[derive(Debug, Clone)]
pub struct SpreadCaptureStrategy {
    ctx: InstrumentContext,
    /// Band half-width as a fraction of the spread.
    pub band_fraction: f64,
}

impl SpreadCaptureStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            band_fraction: 0.25,
        }
    }
}

impl WithContext for SpreadCaptureStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for SpreadCaptureStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let spread = (best_ask - best_bid) as f64;
        let mid = (best_bid.as_f64() + best_ask.as_f64()) / 2.0;
        let buy_below = Price::from_f64(mid - self.band_fraction * spread);
        let sell_above = Price::from_f64(mid + self.band_fraction * spread);

        let mut orders = Vec::with_capacity(2);
        if best_ask <= buy_below {
            let volume = book.best_ask_volume().unwrap_or(0);
            orders.extend(self.capped_buy(best_ask, volume, position));
        }
        if best_bid >= sell_above {
            let volume = book.best_bid_volume().unwrap_or(0);
            orders.extend(self.capped_sell(best_bid, volume, position));
        }

        if orders.is_empty() {
            return Err(NoOrderReason::SpreadOutOfRange {
                spread: best_ask - best_bid,
            });
        }

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_book_is_left_alone() {
        let mut strategy = SpreadCaptureStrategy::for_instrument("PRODUCT", 20);
        let book = OrderBook::from_levels([(98, 5)], [(102, -5)]);

        let result = strategy.compute_orders(&MarketSnapshot::default(), &book, Position::FLAT);
        assert_eq!(result, Err(NoOrderReason::SpreadOutOfRange { spread: 4 }));
    }

    #[test]
    fn crossed_book_is_taken_on_both_sides() {
        let mut strategy = SpreadCaptureStrategy::for_instrument("PRODUCT", 20);
        // bid 104 over ask 96: mid 100, spread -8, band 102 / 98
        let book = OrderBook::from_levels([(104, 30)], [(96, -6)]);

        let orders = strategy
            .compute_orders(&MarketSnapshot::default(), &book, Position::new(15))
            .unwrap();

        assert_eq!(
            orders,
            vec![
                Order::new(Symbol::new("PRODUCT"), Price::new(96), 5),
                Order::new(Symbol::new("PRODUCT"), Price::new(104), -30),
            ]
        );
    }
}
