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

/// Bollinger-band taker:
/// - ignore (and do not record) ticks whose spread is below `min_spread`
/// - once the window is full, lift an ask below the lower band and hit a bid
///   above the upper band, sized by the resting volume
#[derive(Debug, Clone)]
pub struct BollingerReversionStrategy {
    ctx: InstrumentContext,
    mids: RollingWindow,
    pub band_width: f64,
    pub min_spread: i64,
}

impl BollingerReversionStrategy {
    pub fn for_instrument(symbol: impl Into<Symbol>, max_limit: i64) -> Self {
        Self {
            ctx: InstrumentContext::new(symbol, max_limit),
            mids: RollingWindow::new(20),
            band_width: 1.5,
            min_spread: 2,
        }
    }

    pub fn history(&self) -> &RollingWindow {
        &self.mids
    }
}

impl WithContext for BollingerReversionStrategy {
    fn ctx(&self) -> &InstrumentContext {
        &self.ctx
    }
}

impl Strategy for BollingerReversionStrategy {
    fn compute_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        let (best_bid, best_ask) = Self::best_bid_ask(book)?;

        let spread = best_ask - best_bid;
        if spread < self.min_spread {
            return Err(NoOrderReason::SpreadOutOfRange { spread });
        }

        self.mids.push((best_bid.as_f64() + best_ask.as_f64()) / 2.0);

        let warming_up = NoOrderReason::WarmingUp {
            have: self.mids.len(),
            need: self.mids.capacity(),
        };
        if !self.mids.is_full() {
            return Err(warming_up);
        }
        let stats = self.mids.stats().ok_or(warming_up)?;

        let upper = stats.mean + self.band_width * stats.stdev;
        let lower = stats.mean - self.band_width * stats.stdev;

        let mut orders = Vec::with_capacity(2);
        if best_ask.as_f64() < lower && self.can_buy(position) {
            let volume = book.best_ask_volume().unwrap_or(0);
            orders.extend(self.capped_buy(best_ask, volume, position));
        }
        if best_bid.as_f64() > upper && self.can_sell(position) {
            let volume = book.best_bid_volume().unwrap_or(0);
            orders.extend(self.capped_sell(best_bid, volume, position));
        }

        if orders.is_empty() {
            return Err(NoOrderReason::BelowEntryThreshold {
                signal: (best_bid.as_f64() + best_ask.as_f64()) / 2.0 - stats.mean,
                threshold: self.band_width * stats.stdev,
            });
        }

        Ok(orders)
    }
}
