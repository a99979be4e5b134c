use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    market::market_snapshot::MarketSnapshot,
    types::{instrument::Symbol, order::Order},
};

/// How a tick is routed. The caller decides; [`DispatchMode::infer`] covers
/// the legacy shape-based rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    /// Only the designated instrument is evaluated and its limit is reported
    /// alongside the orders.
    SingleInstrument(Symbol),
    MultiInstrument,
}

impl DispatchMode {
    /// Single-instrument when the snapshot carries exactly one book and it
    /// belongs to the legacy product.
    pub fn infer(snapshot: &MarketSnapshot, legacy_product: &Symbol) -> Self {
        let mut instruments = snapshot.instruments();
        match (instruments.next(), instruments.next()) {
            (Some(only), None) if only == legacy_product => Self::SingleInstrument(only.clone()),
            _ => Self::MultiInstrument,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TickResult {
    SingleInstrument {
        symbol: Symbol,
        orders: Vec<Order>,
        position_limit: i64,
    },
    MultiInstrument {
        orders: BTreeMap<Symbol, Vec<Order>>,
    },
}

impl TickResult {
    pub fn orders_for(&self, symbol: &str) -> &[Order] {
        match self {
            TickResult::SingleInstrument {
                symbol: only,
                orders,
                ..
            } if only.as_str() == symbol => orders.as_slice(),
            TickResult::SingleInstrument { .. } => &[],
            TickResult::MultiInstrument { orders } => {
                orders.get(symbol).map(Vec::as_slice).unwrap_or(&[])
            }
        }
    }

    pub fn all_orders(&self) -> impl Iterator<Item = &Order> {
        let (single, multi) = match self {
            TickResult::SingleInstrument { orders, .. } => (Some(orders), None),
            TickResult::MultiInstrument { orders } => (None, Some(orders)),
        };

        single
            .into_iter()
            .flatten()
            .chain(multi.into_iter().flat_map(|orders| orders.values().flatten()))
    }

    /// True when no order was produced for any instrument.
    pub fn is_empty(&self) -> bool {
        self.all_orders().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{market::order_book::OrderBook, types::price::Price};

    fn book() -> OrderBook {
        OrderBook::from_levels([(9998, 5)], [(10002, -5)])
    }

    #[test]
    fn lone_legacy_product_is_single_instrument() {
        let legacy = Symbol::new("PRODUCT");
        let snapshot = MarketSnapshot::new(0).with_book("PRODUCT", book());

        assert_eq!(
            DispatchMode::infer(&snapshot, &legacy),
            DispatchMode::SingleInstrument(legacy.clone())
        );
    }

    #[test]
    fn anything_else_is_multi_instrument() {
        let legacy = Symbol::new("PRODUCT");

        let other = MarketSnapshot::new(0).with_book("SUDOWOODO", book());
        assert_eq!(DispatchMode::infer(&other, &legacy), DispatchMode::MultiInstrument);

        let both = MarketSnapshot::new(0)
            .with_book("PRODUCT", book())
            .with_book("SUDOWOODO", book());
        assert_eq!(DispatchMode::infer(&both, &legacy), DispatchMode::MultiInstrument);

        assert_eq!(
            DispatchMode::infer(&MarketSnapshot::default(), &legacy),
            DispatchMode::MultiInstrument
        );
    }

    #[test]
    fn orders_are_looked_up_by_instrument() {
        let buy = Order::new(Symbol::new("ASH"), Price::new(89), 15);
        let sell = Order::new(Symbol::new("LUXRAY"), Price::new(99), -9);
        let result = TickResult::MultiInstrument {
            orders: BTreeMap::from([
                (Symbol::new("ASH"), vec![buy.clone(), sell.clone()]),
                (Symbol::new("MISTY"), vec![]),
            ]),
        };

        assert_eq!(result.orders_for("ASH"), &[buy, sell][..]);
        assert!(result.orders_for("MISTY").is_empty());
        assert!(result.orders_for("LUXRAY").is_empty());
        assert_eq!(result.all_orders().count(), 2);
        assert!(!result.is_empty());
    }

    #[test]
    fn serializes_with_a_mode_tag() {
        let result = TickResult::SingleInstrument {
            symbol: Symbol::new("PRODUCT"),
            orders: vec![Order::new(Symbol::new("PRODUCT"), Price::new(9999), 15)],
            position_limit: 20,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "mode": "single-instrument",
                "symbol": "PRODUCT",
                "orders": [{"symbol": "PRODUCT", "price": 9999, "quantity": 15}],
                "position_limit": 20,
            })
        );
        assert!(
            TickResult::MultiInstrument {
                orders: BTreeMap::new()
            }
            .is_empty()
        );
    }
}
