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

/// Z-score reversion with a trend-aware entry band:
/// - z = (mid - rolling mean) / rolling stdev
/// - band widens with the short-horizon slope, so strong trends need a larger stretch
/// - trade against the stretch; step inside the touch when the slope already agrees
#[derive(Debug, Clone)]
pub struct TrendRevertStrategy {
    ctx: InstrumentContext,
    history: RollingWindow,

    /// Observations required before trading.
    pub min_history: usize,

    /// Number of most recent mids the slope is measured over.
    pub trend_lookback: usize,

    pub base_threshold: f64,

    /// Added to the band per unit of |slope| / stdev.
    pub trend_adjustment: f64,

    /// Size quoted when flat.
    pub max_quantity: i64,
}

impl TrendRevertStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            history: RollingWindow::new(80),
            min_history: 20,
            trend_lookback: 10,
            base_threshold: 1.2,
            trend_adjustment: 0.3,
            max_quantity: 15,
        }
    }

    pub fn history(&self) -> &RollingWindow {
        &self.history
    }

    /// Average per-tick change across the lookback.
    fn trend(&self) -> f64 {
        let recent: Vec<f64> = self.history.recent(self.trend_lookback).collect();
        match (recent.first(), recent.last()) {
            (Some(first), Some(last)) => (last - first) / recent.len() as f64,
            _ => 0.0,
        }
    }
}

impl WithContext for TrendRevertStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for TrendRevertStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let mid = (best_bid.as_f64() + best_ask.as_f64()) / 2.0;
        self.history.push(mid);

        let warming_up = NoOrderReason::WarmingUp {
            have: self.history.len(),
            need: self.min_history,
        };
        if self.history.len() < self.min_history {
            return Err(warming_up);
        }
        let stats = self.history.stats().ok_or(warming_up)?;

        let z = stats.z_score(mid);
        let trend = self.trend();
        let strength = if stats.stdev > 0.0 {
            trend.abs() / stats.stdev
        } else {
            0.0
        };
        let threshold = self.base_threshold + self.trend_adjustment * strength;

        let quantity = self.inventory_scaled(self.max_quantity, position);

        if z < -threshold && self.can_buy(position) {
            let price = if trend > 0.0 { best_bid + 1 } else { best_bid };
            self.capped_buy(price, quantity, position)
                .map(|order| vec![order])
                .ok_or(NoOrderReason::NoCapacity)
        } else if z > threshold && self.can_sell(position) {
            let price = if trend < 0.0 { best_ask - 1 } else { best_ask };
            self.capped_sell(price, quantity, position)
                .map(|order| vec![order])
                .ok_or(NoOrderReason::NoCapacity)
        } else {
            Err(NoOrderReason::BelowEntryThreshold {
                signal: z,
                threshold,
            })
        }
    }
}
