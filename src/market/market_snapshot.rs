use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::market::order_book::OrderBook;
use crate::types::{instrument::Symbol, position::Position};

/// Everything the strategies may read for one tick: a book per instrument
/// plus the caller's current positions.
///
/// Built fresh by the engine each tick and never mutated by a strategy, so
/// pair and basket strategies see the same books within a tick.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    order_depth: BTreeMap<Symbol, OrderBook>,
    #[serde(default)]
    positions: BTreeMap<Symbol, Position>,
}

impl MarketSnapshot {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn with_book(mut self, symbol: impl Into<Symbol>, book: OrderBook) -> Self {
        self.insert_book(symbol, book);
        self
    }

    pub fn with_position(mut self, symbol: impl Into<Symbol>, net: i64) -> Self {
        self.set_position(symbol, Position::new(net));
        self
    }

    pub fn insert_book(&mut self, symbol: impl Into<Symbol>, book: OrderBook) {
        self.order_depth.insert(symbol.into(), book);
    }

    pub fn set_position(&mut self, symbol: impl Into<Symbol>, position: Position) {
        self.positions.insert(symbol.into(), position);
    }

    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.order_depth.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.order_depth.contains_key(symbol)
    }

    /// Net position, flat when the engine did not report one.
    pub fn position(&self, symbol: &str) -> Position {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    pub fn books(&self) -> impl Iterator<Item = (&Symbol, &OrderBook)> {
        self.order_depth.iter()
    }

    pub fn instruments(&self) -> impl Iterator<Item = &Symbol> {
        self.order_depth.keys()
    }

    pub fn len(&self) -> usize {
        self.order_depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_depth.is_empty()
    }

    /// Mid price of `symbol` when its book is two-sided.
    pub fn mid_price(&self, symbol: &str) -> Option<f64> {
        self.book(symbol)?.mid_price()
    }
}

impl fmt::Debug for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketSnapshot")
            .field("timestamp", &self.timestamp)
            .field("instruments", &self.order_depth.keys().collect::<Vec<_>>())
            .field("positions", &self.positions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_position_defaults_to_flat() {
        let snapshot = MarketSnapshot::new(1)
            .with_book("ABRA", OrderBook::from_levels([(99, 1)], [(101, -1)]))
            .with_position("DROWZEE", -4);

        assert_eq!(snapshot.position("ABRA"), Position::FLAT);
        assert_eq!(snapshot.position("DROWZEE"), Position::new(-4));
        assert_eq!(snapshot.mid_price("ABRA"), Some(100.0));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn parses_engine_json() {
        let raw = r#"{
            "timestamp": 300,
            "order_depth": {
                "SUDOWOODO": {"buy_orders": {"9998": 5}, "sell_orders": {"10002": -5}},
                "ASH": {"buy_orders": {}, "sell_orders": {"700": -2}}
            },
            "positions": {"SUDOWOODO": 12}
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(raw).unwrap();

        assert_eq!(snapshot.timestamp, 300);
        assert!(snapshot.contains("ASH"));
        assert!(!snapshot.book("ASH").unwrap().is_two_sided());
        assert_eq!(snapshot.position("SUDOWOODO"), Position::new(12));
    }
}
