use std::collections::BTreeMap;

use tracing::trace;

use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    signals::rolling_window::RollingWindow,
    strategy::{
        instrument_context::{InstrumentContext, WithContext},
        strategy::Strategy,
        strategy_helpers::StrategyHelpers,
    },
    types::{
        instrument::Symbol, no_order_reason::NoOrderReason, order::Order, position::Position,
    },
};

/// Index vs. weighted-basket replication:
/// - fair value = weight-normalised mid of the components that are two-sided
/// - index rich: sell the index, buy every component in proportion to its weight
/// - index cheap: the mirror image
/// - mispricing threshold turns adaptive once enough fair values are recorded
///
/// Component legs are sized from the index's limit only; the components' own
/// limits are not consulted.
#[derive(Debug, Clone)]
pub struct IndexArbStrategy {
    ctx: InstrumentContext,
    basket: BTreeMap<Symbol, f64>,
    mids: RollingWindow,
    fair_values: RollingWindow,

    /// Fair-value observations (exclusive) after which the threshold adapts.
    pub adaptive_after: usize,
    pub fixed_threshold: f64,
    pub min_threshold: f64,
    pub threshold_stdev_multiplier: f64,

    /// Upper bound on the index leg size.
    pub max_base_quantity: i64,
}

impl IndexArbStrategy {
    pub fn for_instrument(
        symbol: impl Into<Symbol>,
        max_limit: i64,
        basket: BTreeMap<Symbol, f64>,
    ) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            basket,
            mids: RollingWindow::new(100),
            fair_values: RollingWindow::new(50),
            adaptive_after: 20,
            fixed_threshold: 2.0,
            min_threshold: 1.0,
            threshold_stdev_multiplier: 2.0,
            max_base_quantity: 15,
        }
    }

    pub fn mid_history(&self) -> &RollingWindow {
        &self.mids
    }

    pub fn fair_value_history(&self) -> &RollingWindow {
        &self.fair_values
    }

    /// Weighted mid over components with two-sided books; `None` when no
    /// component is usable.
    pub fn fair_value(&self, snapshot: &MarketSnapshot) -> Option<f64> {
        let (value, total_weight) = self
            .basket
            .iter()
            .filter_map(|(component, weight)| {
                snapshot
                    .mid_price(component.as_str())
                    .map(|mid| (weight * mid, *weight))
            })
            .fold((0.0, 0.0), |(value, total), (weighted, weight)| {
                (value + weighted, total + weight)
            });

        (total_weight > 0.0).then(|| value / total_weight)
    }

    pub fn threshold(&self) -> f64 {
        if self.fair_values.len() > self.adaptive_after {
            let stdev = self.fair_values.stdev().unwrap_or(0.0);
            self.min_threshold.max(stdev * self.threshold_stdev_multiplier)
        } else {
            self.fixed_threshold
        }
    }

    pub fn base_quantity(&self) -> i64 {
        self.max_base_quantity.min(self.ctx().max_limit() / 3)
    }

    fn leg_size(weight: f64, base_quantity: i64) -> i64 {
        ((weight * base_quantity as f64) as i64).max(1)
    }
}

impl WithContext for IndexArbStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for IndexArbStrategy {
    fn compute_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let fair_value = self
            .fair_value(snapshot)
            .ok_or(NoOrderReason::UndefinedFairValue)?;
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let mid = (best_bid.as_f64() + best_ask.as_f64()) / 2.0;
        self.mids.push(mid);
        self.fair_values.push(fair_value);

        let mispricing = mid - fair_value;
        let threshold = self.threshold();
        let base_quantity = self.base_quantity();

        trace!(
            symbol = %self.ctx().symbol(),
            mid,
            fair_value,
            mispricing,
            threshold,
            "index fair value updated"
        );

        if let Some(missing) = self
            .basket
            .keys()
            .find(|component| !snapshot.contains(component.as_str()))
        {
            return Err(NoOrderReason::IncompleteBasket {
                missing: missing.clone(),
            });
        }

        if mispricing > threshold && self.can_sell(position) {
            // Index rich → SELL index, BUY the replica
            let index_leg = self
                .capped_sell(best_ask, base_quantity, position)
                .ok_or(NoOrderReason::NoCapacity)?;

            let mut orders = vec![index_leg];
            for (component, weight) in &self.basket {
                let ask = snapshot
                    .book(component.as_str())
                    .and_then(OrderBook::best_ask);
                if let Some(ask) = ask {
                    let size = Self::leg_size(*weight, base_quantity);
                    orders.push(Order::buy(component.clone(), ask, size));
                }
            }
            Ok(orders)
        } else if mispricing < -threshold && self.can_buy(position) {
            // Index cheap → BUY index, SELL the replica
            let index_leg = self
                .capped_buy(best_bid, base_quantity, position)
                .ok_or(NoOrderReason::NoCapacity)?;

            let mut orders = vec![index_leg];
            for (component, weight) in &self.basket {
                let bid = snapshot
                    .book(component.as_str())
                    .and_then(OrderBook::best_bid);
                if let Some(bid) = bid {
                    let size = Self::leg_size(*weight, base_quantity);
                    orders.push(Order::sell(component.clone(), bid, size));
                }
            }
            Ok(orders)
        } else {
            Err(NoOrderReason::BelowEntryThreshold {
                signal: mispricing,
                threshold,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;
    use approx::assert_relative_eq;

    fn two_sided(mid: i64) -> OrderBook {
        OrderBook::from_levels([(mid - 1, 10)], [(mid + 1, -10)])
    }

    fn ash() -> IndexArbStrategy {
        let basket = BTreeMap::from([
            (Symbol::new("LUXRAY"), 0.6),
            (Symbol::new("JOLTEON"), 0.3),
            (Symbol::new("SHINX"), 0.1),
        ]);
        IndexArbStrategy::for_instrument("ASH", 60, basket)
    }

    fn market(index_book: OrderBook, component_mid: i64) -> MarketSnapshot {
        MarketSnapshot::new(0)
            .with_book("ASH", index_book)
            .with_book("LUXRAY", two_sided(component_mid))
            .with_book("JOLTEON", two_sided(component_mid))
            .with_book("SHINX", two_sided(component_mid))
    }

    fn tick(
        strategy: &mut IndexArbStrategy,
        snapshot: &MarketSnapshot,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let book = snapshot.book("ASH").cloned().unwrap_or_default();
        let position = snapshot.position("ASH");
        strategy.compute_orders(snapshot, &book, position)
    }

    #[test]
    fn fair_value_renormalizes_over_two_sided_components() {
        let strategy = ash();
        let snapshot = MarketSnapshot::new(0)
            .with_book("LUXRAY", two_sided(100))
            .with_book("JOLTEON", two_sided(200))
            .with_book("SHINX", OrderBook::from_levels([(50, 1)], []));

        // (0.6 * 100 + 0.3 * 200) / 0.9
        assert_relative_eq!(
            strategy.fair_value(&snapshot).unwrap(),
            120.0 / 0.9,
            max_relative = 1e-12
        );
    }

    #[test]
    fn undefined_fair_value_records_nothing() {
        let mut strategy = ash();
        let snapshot = MarketSnapshot::new(0).with_book("ASH", two_sided(100));

        assert_eq!(tick(&mut strategy, &snapshot), Err(NoOrderReason::UndefinedFairValue));
        assert!(strategy.mid_history().is_empty());
        assert!(strategy.fair_value_history().is_empty());
    }

    #[test]
    fn one_sided_index_book_records_nothing() {
        let mut strategy = ash();
        for _ in 0..2 {
            let _ = tick(&mut strategy, &market(two_sided(100), 100));
        }
        assert_eq!(strategy.mid_history().len(), 2);

        let snapshot = market(OrderBook::from_levels([(99, 10)], []), 100);
        assert_eq!(tick(&mut strategy, &snapshot), Err(NoOrderReason::MissingTopOfBook));
        assert_eq!(strategy.mid_history().len(), 2);
        assert_eq!(strategy.fair_value_history().len(), 2);
    }

    #[test]
    fn absent_component_blocks_trading_but_not_history() {
        let mut strategy = ash();
        let snapshot = MarketSnapshot::new(0)
            .with_book("ASH", two_sided(150))
            .with_book("LUXRAY", two_sided(100))
            .with_book("JOLTEON", two_sided(100));

        assert_eq!(
            tick(&mut strategy, &snapshot),
            Err(NoOrderReason::IncompleteBasket {
                missing: Symbol::new("SHINX")
            })
        );
        assert_eq!(strategy.fair_value_history().len(), 1);
    }

    #[test]
    fn rich_index_sells_and_buys_the_replica() {
        let mut strategy = ash();
        let orders = tick(&mut strategy, &market(two_sided(110), 100)).unwrap();

        assert_eq!(
            orders,
            vec![
                Order::new(Symbol::new("ASH"), Price::new(111), -15),
                Order::new(Symbol::new("JOLTEON"), Price::new(101), 4),
                Order::new(Symbol::new("LUXRAY"), Price::new(101), 9),
                Order::new(Symbol::new("SHINX"), Price::new(101), 1),
            ]
        );
    }

    #[test]
    fn cheap_index_buys_and_sells_the_replica() {
        let mut strategy = ash();
        let orders = tick(&mut strategy, &market(two_sided(90), 100)).unwrap();

        assert_eq!(
            orders,
            vec![
                Order::new(Symbol::new("ASH"), Price::new(89), 15),
                Order::new(Symbol::new("JOLTEON"), Price::new(99), -4),
                Order::new(Symbol::new("LUXRAY"), Price::new(99), -9),
                Order::new(Symbol::new("SHINX"), Price::new(99), -1),
            ]
        );
    }

    #[test]
    fn one_sided_component_contributes_no_leg() {
        let mut strategy = ash();
        let snapshot = market(two_sided(110), 100)
            .with_book("SHINX", OrderBook::from_levels([(99, 10)], []));

        let orders = tick(&mut strategy, &snapshot).unwrap();
        assert_eq!(orders.len(), 3);
        assert!(orders.iter().all(|order| order.symbol.as_str() != "SHINX"));
    }

    #[test]
    fn threshold_adapts_after_twenty_one_fair_values() {
        let mut strategy = ash();
        let narrow = OrderBook::from_levels([(100, 10)], [(103, -10)]);

        // mispricing of 1.5 sits inside the fixed band of 2.0
        assert!(matches!(
            tick(&mut strategy, &market(narrow.clone(), 100)),
            Err(NoOrderReason::BelowEntryThreshold { threshold, .. }) if threshold == 2.0
        ));

        for _ in 0..19 {
            let _ = tick(&mut strategy, &market(two_sided(100), 100));
        }
        assert_eq!(strategy.fair_value_history().len(), 20);

        // constant fair value -> adaptive band bottoms out at 1.0
        let orders = tick(&mut strategy, &market(narrow, 100)).unwrap();
        assert_eq!(orders[0], Order::new(Symbol::new("ASH"), Price::new(103), -15));
    }

    #[test]
    fn base_quantity_follows_the_index_limit() {
        let small = IndexArbStrategy::for_instrument("MISTY", 30, BTreeMap::new());
        assert_eq!(small.base_quantity(), 10);
        assert_eq!(ash().base_quantity(), 15);
    }

    #[test]
    fn component_legs_ignore_component_positions() {
        let mut strategy = ash();
        let snapshot = market(two_sided(110), 100).with_position("LUXRAY", 250);

        let orders = tick(&mut strategy, &snapshot).unwrap();
        let luxray = orders
            .iter()
            .find(|order| order.symbol.as_str() == "LUXRAY")
            .unwrap();
        assert_eq!(luxray.quantity, 9);
    }

    #[test]
    fn index_leg_is_bounded_by_capacity() {
        let mut strategy = ash();
        let snapshot = market(two_sided(110), 100).with_position("ASH", -50);

        let orders = tick(&mut strategy, &snapshot).unwrap();
        assert_eq!(orders[0].quantity, -10);
    }
}
