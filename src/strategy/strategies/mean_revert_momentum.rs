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

/// Fades momentum extremes:
/// - momentum = mid - rolling mean of mid
/// - buy when momentum falls below -band, sell when it rises above +band
/// - join the touch, or improve it by a tick when the signed top-of-book
///   imbalance leans our way
/// - size grows with |momentum| / stdev, capped
#[derive(Debug, Clone)]
pub struct MeanRevertMomentumStrategy {
    ctx: InstrumentContext,
    prices: RollingWindow,

    /// Observations required before trading.
    pub min_history: usize,

    /// Entry band as a multiple of the rolling stdev.
    pub band_multiplier: f64,

    /// Size at confidence 1.0.
    pub base_volume: i64,

    pub max_confidence: f64,
}

impl MeanRevertMomentumStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            prices: RollingWindow::new(50),
            min_history: 10,
            band_multiplier: 0.8,
            base_volume: 12,
            max_confidence: 2.0,
        }
    }

    pub fn history(&self) -> &RollingWindow {
        &self.prices
    }
}

impl WithContext for MeanRevertMomentumStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for MeanRevertMomentumStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let mid = (best_bid.as_f64() + best_ask.as_f64()) / 2.0;
        self.prices.push(mid);

        // signed as sent: with negative asks this is bid + |ask|
        let imbalance =
            book.best_bid_signed_volume().unwrap_or(0) - book.best_ask_signed_volume().unwrap_or(0);

        let warming_up = NoOrderReason::WarmingUp {
            have: self.prices.len(),
            need: self.min_history,
        };
        if self.prices.len() < self.min_history {
            return Err(warming_up);
        }
        let stats = self.prices.stats().ok_or(warming_up)?;

        let momentum = mid - stats.mean;
        let band = self.band_multiplier * stats.stdev;

        let confidence = if stats.stdev > 0.0 {
            (momentum.abs() / stats.stdev).min(self.max_confidence)
        } else {
            1.0
        };
        let quantity = (self.base_volume as f64 * confidence) as i64;

        if momentum < -band && self.can_buy(position) {
            // Stretched down → BUY, stepping ahead when bids outweigh asks
            let price = if imbalance > 0 { best_bid + 1 } else { best_bid };
            self.capped_buy(price, quantity, position)
                .map(|order| vec![order])
                .ok_or(NoOrderReason::NoCapacity)
        } else if momentum > band && self.can_sell(position) {
            // Stretched up → SELL
            let price = if imbalance < 0 { best_ask - 1 } else { best_ask };
            self.capped_sell(price, quantity, position)
                .map(|order| vec![order])
                .ok_or(NoOrderReason::NoCapacity)
        } else {
            Err(NoOrderReason::BelowEntryThreshold {
                signal: momentum,
                threshold: band,
            })
        }
    }
}
