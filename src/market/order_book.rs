use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::price::Price;

/// Resting liquidity for one instrument on the current tick.
///
/// Volumes are signed as the engine supplies them (asks are usually
/// negative); the accessors report magnitudes.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    buy_orders: BTreeMap<i64, i64>,
    #[serde(default)]
    sell_orders: BTreeMap<i64, i64>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from `(price, volume)` levels; zero-volume levels are dropped.
    pub fn from_levels(
        bids: impl IntoIterator<Item = (i64, i64)>,
        asks: impl IntoIterator<Item = (i64, i64)>,
    ) -> Self {
        let mut book = Self::new();
        for (price, volume) in bids {
            book.insert_bid(price, volume);
        }
        for (price, volume) in asks {
            book.insert_ask(price, volume);
        }
        book
    }

    pub fn insert_bid(&mut self, price: i64, volume: i64) {
        if volume != 0 {
            self.buy_orders.insert(price, volume);
        }
    }

    pub fn insert_ask(&mut self, price: i64, volume: i64) {
        if volume != 0 {
            self.sell_orders.insert(price, volume);
        }
    }

    pub fn buy_orders(&self) -> &BTreeMap<i64, i64> {
        &self.buy_orders
    }

    pub fn sell_orders(&self) -> &BTreeMap<i64, i64> {
        &self.sell_orders
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.buy_orders.keys().next_back().copied().map(Price::new)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.sell_orders.keys().next().copied().map(Price::new)
    }

    pub fn best_bid_volume(&self) -> Option<i64> {
        self.buy_orders.values().next_back().map(|volume| volume.abs())
    }

    pub fn best_ask_volume(&self) -> Option<i64> {
        self.sell_orders.values().next().map(|volume| volume.abs())
    }

    /// Best-bid volume exactly as the engine sent it.
    pub fn best_bid_signed_volume(&self) -> Option<i64> {
        self.buy_orders.values().next_back().copied()
    }

    /// Best-ask volume exactly as the engine sent it, usually negative.
    pub fn best_ask_signed_volume(&self) -> Option<i64> {
        self.sell_orders.values().next().copied()
    }

    pub fn is_two_sided(&self) -> bool {
        !self.buy_orders.is_empty() && !self.sell_orders.is_empty()
    }

    pub fn top_of_book(&self) -> Option<(Price, Price)> {
        Some((self.best_bid()?, self.best_ask()?))
    }

    pub fn mid_price(&self) -> Option<f64> {
        let (bid, ask) = self.top_of_book()?;
        Some((bid.as_f64() + ask.as_f64()) / 2.0)
    }

    /// Best ask minus best bid. Not assumed positive; source books may cross.
    pub fn spread(&self) -> Option<i64> {
        let (bid, ask) = self.top_of_book()?;
        Some(ask - bid)
    }
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid())
            .field("mid_price", &self.mid_price())
            .field("best_ask", &self.best_ask())
            .field("bid_levels", &self.buy_orders.len())
            .field("ask_levels", &self.sell_orders.len())
            .finish()
    }
}
