use std::collections::BTreeMap;

use anyhow::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    market::{market_snapshot::MarketSnapshot, market_source::SnapshotSource, order_book::OrderBook},
    types::instrument::Symbol,
};

/// Seeded random-walk market over a fixed set of instruments.
///
/// Positions stay flat; fills are not simulated. Every so often a side of a
/// book goes missing so the degenerate paths get exercised too.
pub struct SyntheticMarket {
    rng: StdRng,
    mids: BTreeMap<Symbol, f64>,
    remaining: usize,
    timestamp: u64,

    pub timestamp_step: u64,
    pub max_step: f64,
    pub max_half_spread: i64,
    pub max_volume: i64,
    pub one_sided_probability: f64,
}

impl SyntheticMarket {
    pub const STARTING_MID: f64 = 10_000.0;

    pub fn new(symbols: impl IntoIterator<Item = Symbol>, seed: u64, ticks: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mids: symbols
                .into_iter()
                .map(|symbol| (symbol, Self::STARTING_MID))
                .collect(),
            remaining: ticks,
            timestamp: 0,
            timestamp_step: 100,
            max_step: 3.0,
            max_half_spread: 3,
            max_volume: 20,
            one_sided_probability: 0.02,
        }
    }
}

impl SnapshotSource for SyntheticMarket {
    fn next_snapshot(&mut self) -> Result<Option<MarketSnapshot>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let max_half_spread = self.max_half_spread.max(1);
        let max_volume = self.max_volume.max(1);
        let one_sided = self.one_sided_probability.clamp(0.0, 1.0);

        let mut snapshot = MarketSnapshot::new(self.timestamp);
        for (symbol, mid) in self.mids.iter_mut() {
            let step = self.max_step.abs();
            *mid += self.rng.random_range(-step..=step);

            let anchor = mid.round() as i64;
            let half_spread = self.rng.random_range(1..=max_half_spread);

            let mut book = OrderBook::new();
            if !self.rng.random_bool(one_sided) {
                book.insert_bid(anchor - half_spread, self.rng.random_range(1..=max_volume));
            }
            if !self.rng.random_bool(one_sided) {
                book.insert_ask(anchor + half_spread, -self.rng.random_range(1..=max_volume));
            }
            snapshot.insert_book(symbol.clone(), book);
        }

        self.timestamp += self.timestamp_step;
        Ok(Some(snapshot))
    }
}
