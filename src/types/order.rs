use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{instrument::Symbol, price::Price};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Limit order handed to the matching engine.
///
/// The sign of `quantity` is the only side indicator: positive buys,
/// negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: i64,
}

impl Order {
    pub fn new(symbol: Symbol, price: Price, quantity: i64) -> Self {
        Self {
            symbol,
            price,
            quantity,
        }
    }

    pub fn buy(symbol: Symbol, price: Price, size: i64) -> Self {
        Self::new(symbol, price, size.abs())
    }

    pub fn sell(symbol: Symbol, price: Price, size: i64) -> Self {
        Self::new(symbol, price, -size.abs())
    }

    pub fn side(&self) -> Side {
        if self.quantity >= 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn size(&self) -> i64 {
        self.quantity.abs()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.side(),
            self.size(),
            self.symbol,
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_carries_side() {
        let symbol = Symbol::new("ABRA");
        let buy = Order::buy(symbol.clone(), Price::new(100), 7);
        let sell = Order::sell(symbol, Price::new(101), 7);

        assert_eq!(buy.quantity, 7);
        assert_eq!(buy.side(), Side::Buy);
        assert_eq!(sell.quantity, -7);
        assert_eq!(sell.side(), Side::Sell);
        assert_eq!(sell.size(), 7);
    }
}
