use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    dispatch::types::{DispatchMode, TickResult},
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    risk::position_audit::PositionLimitAudit,
    scenario::scenario::Scenario,
    strategy::{
        StrategyAlgorithm, Strategy, instrument_context::WithContext,
        strategies::passthrough::PassthroughStrategy,
    },
    types::{
        instrument::Symbol,
        order::Order,
        trading_rules::{DEFAULT_LIMIT, DeskConfig},
    },
};

/// Routes every instrument in a snapshot to the strategy that owns it.
///
/// Each registered strategy keeps its rolling state across ticks, so one
/// dispatcher serves one run. Instruments nobody registered are handled by a
/// throwaway passthrough that never trades.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    strategies: BTreeMap<Symbol, StrategyAlgorithm>,
    default_limit: i64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl Dispatcher {
    pub fn new(default_limit: i64) -> Self {
        Self {
            strategies: BTreeMap::new(),
            default_limit,
        }
    }

    pub fn from_config(config: &DeskConfig) -> Result<Self> {
        Scenario::dispatcher(config)
    }

    /// Dispatcher over the built-in instrument roster.
    pub fn default_roster() -> Result<Self> {
        Self::from_config(DeskConfig::builtin()?)
    }

    /// Registers `strategy` under its own symbol, replacing any previous owner.
    pub fn register(&mut self, strategy: impl Into<StrategyAlgorithm>) {
        let strategy = strategy.into();
        let symbol = strategy.ctx().symbol().clone();
        if let Some(previous) = self.strategies.insert(symbol.clone(), strategy) {
            warn!(%symbol, replaced = %previous.kind(), "strategy replaced");
        }
    }

    pub fn strategy(&self, symbol: &str) -> Option<&StrategyAlgorithm> {
        self.strategies.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }

    pub fn position_limit(&self, symbol: &str) -> i64 {
        self.strategies
            .get(symbol)
            .map_or(self.default_limit, StrategyAlgorithm::max_limit)
    }

    pub fn position_limits(&self) -> BTreeMap<Symbol, i64> {
        self.strategies
            .iter()
            .map(|(symbol, strategy)| (symbol.clone(), strategy.max_limit()))
            .collect()
    }

    pub fn on_tick(&mut self, mode: &DispatchMode, snapshot: &MarketSnapshot) -> TickResult {
        match mode {
            DispatchMode::SingleInstrument(symbol) => {
                let position_limit = self.position_limit(symbol.as_str());
                let orders = match snapshot.book(symbol.as_str()) {
                    Some(book) => self.run(symbol, book, snapshot),
                    None => {
                        debug!(%symbol, "instrument absent from snapshot");
                        Vec::new()
                    }
                };

                TickResult::SingleInstrument {
                    symbol: symbol.clone(),
                    orders,
                    position_limit,
                }
            }
            DispatchMode::MultiInstrument => {
                let orders = snapshot
                    .books()
                    .map(|(symbol, book)| (symbol.clone(), self.run(symbol, book, snapshot)))
                    .collect();

                TickResult::MultiInstrument { orders }
            }
        }
    }

    fn run(&mut self, symbol: &Symbol, book: &OrderBook, snapshot: &MarketSnapshot) -> Vec<Order> {
        let position = snapshot.position(symbol.as_str());
        let default_limit = self.default_limit;

        let result = match self.strategies.get_mut(symbol) {
            Some(strategy) => strategy.compute_orders(snapshot, book, position),
            None => PassthroughStrategy::for_instrument(symbol.clone(), default_limit)
                .compute_orders(snapshot, book, position),
        };

        let mut orders = match result {
            Ok(orders) => orders,
            Err(reason) => {
                debug!(%symbol, ?reason, "no orders");
                return Vec::new();
            }
        };
        orders.retain(|order| order.quantity != 0);

        let limit_for = |instrument: &str| self.position_limit(instrument);
        if let Err(breaches) = PositionLimitAudit::evaluate(snapshot, &orders, limit_for) {
            for breach in breaches {
                warn!(
                    strategy = %symbol,
                    symbol = %breach.symbol,
                    side = %breach.side,
                    projected = breach.projected,
                    limit = breach.limit,
                    "orders could take position beyond limit"
                );
            }
        }

        debug!(%symbol, orders = orders.len(), "orders computed");
        orders
    }
}
