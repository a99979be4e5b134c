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

/// Statistical pairs leg:
/// - spread = own mid - hedge_ratio * partner mid
/// - hedge ratio re-estimated every tick from recent spread variance, clamped
/// - sell the leg when the spread is rich, buy when cheap, fixed size
/// - partially unwind an open position once the spread has reverted
///
/// Unlike the single-instrument strategies, nothing is recorded unless both
/// books are two-sided.
#[derive(Debug, Clone)]
pub struct CointegratedPairStrategy {
    ctx: InstrumentContext,
    partner: Symbol,
    spreads: RollingWindow,
    hedge_ratio: f64,

    /// Spread observations needed before re-estimating the ratio or trading.
    pub min_history: usize,

    /// Trailing observations used to re-estimate the hedge ratio.
    pub hedge_lookback: usize,
    pub min_hedge_ratio: f64,
    pub max_hedge_ratio: f64,

    pub entry_z: f64,
    pub exit_z: f64,
    pub entry_size: i64,
    pub exit_size: i64,

    /// |position| above which the reverted-spread unwind applies.
    pub open_position_threshold: i64,
}

impl CointegratedPairStrategy {
    pub fn for_instrument(
        symbol: impl Into<Symbol>,
        max_limit: i64,
        partner: impl Into<Symbol>,
    ) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            partner: partner.into(),
            spreads: RollingWindow::new(100),
            hedge_ratio: 1.0,
            min_history: 30,
            hedge_lookback: 30,
            min_hedge_ratio: 0.5,
            max_hedge_ratio: 2.0,
            entry_z: 1.5,
            exit_z: 0.3,
            entry_size: 12,
            exit_size: 8,
            open_position_threshold: 5,
        }
    }

    pub fn partner(&self) -> &Symbol {
        &self.partner
    }

    pub fn hedge_ratio(&self) -> f64 {
        self.hedge_ratio
    }

    pub fn spread_history(&self) -> &RollingWindow {
        &self.spreads
    }

    /// `1 / (1 + variance)` of the trailing spreads, clamped; unchanged while
    /// fewer than `hedge_lookback` observations exist.
    fn estimate_hedge_ratio(&self) -> f64 {
        if self.spreads.len() < self.hedge_lookback {
            return self.hedge_ratio;
        }

        match self.spreads.recent_stats(self.hedge_lookback) {
            Some(stats) => (1.0 / (1.0 + stats.variance()))
                .clamp(self.min_hedge_ratio, self.max_hedge_ratio),
            None => self.hedge_ratio,
        }
    }
}

impl WithContext for CointegratedPairStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for CointegratedPairStrategy {
    fn compute_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let missing_partner = || NoOrderReason::MissingPartnerBook {
            partner: self.partner.clone(),
        };

        let partner_book = snapshot.book(self.partner.as_str()).ok_or_else(missing_partner)?;
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;
        let partner_mid = partner_book.mid_price().ok_or_else(missing_partner)?;

        let own_mid = (best_bid.as_f64() + best_ask.as_f64()) / 2.0;
        let spread = own_mid - self.hedge_ratio * partner_mid;
        self.spreads.push(spread);

        if self.spreads.len() < self.min_history {
            return Err(NoOrderReason::WarmingUp {
                have: self.spreads.len(),
                need: self.min_history,
            });
        }

        self.hedge_ratio = self.estimate_hedge_ratio();

        let z = self
            .spreads
            .z_score(spread)
            .ok_or(NoOrderReason::WarmingUp {
                have: self.spreads.len(),
                need: self.min_history,
            })?;

        trace!(
            symbol = %self.ctx().symbol(),
            partner = %self.partner,
            spread,
            z,
            hedge_ratio = self.hedge_ratio,
            "pair spread updated"
        );

        let net = position.net();
        let order = if z > self.entry_z && self.can_sell(position) {
            // Spread rich → SELL this leg
            self.capped_sell(best_ask, self.entry_size, position)
        } else if z < -self.entry_z && self.can_buy(position) {
            // Spread cheap → BUY this leg
            self.capped_buy(best_bid, self.entry_size, position)
        } else if z.abs() < self.exit_z && net.abs() > self.open_position_threshold {
            // Reverted → partial unwind toward flat
            if net > 0 {
                self.capped_sell(best_ask, self.exit_size.min(net), position)
            } else {
                self.capped_buy(best_bid, self.exit_size.min(-net), position)
            }
        } else {
            return Err(NoOrderReason::BelowEntryThreshold {
                signal: z,
                threshold: self.entry_z,
            });
        };

        order.map(|order| vec![order]).ok_or(NoOrderReason::NoCapacity)
    }
}
