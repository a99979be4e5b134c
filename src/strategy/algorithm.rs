use crate::{
    market::{market_snapshot::MarketSnapshot, order_book::OrderBook},
    scenario::strategies::StrategyKind,
    strategy::{
        instrument_context::{InstrumentContext, WithContext},
        strategies::{
            bollinger_reversion::BollingerReversionStrategy,
            cointegrated_pair::CointegratedPairStrategy, index_arb::IndexArbStrategy,
            liquidity_provider::LiquidityProviderStrategy,
            mean_revert_momentum::MeanRevertMomentumStrategy, passthrough::PassthroughStrategy,
            simple_mm::SimpleMarketMakerStrategy, spread_capture::SpreadCaptureStrategy,
            trend_revert::TrendRevertStrategy,
        },
        strategy::Strategy,
    },
    types::{no_order_reason::NoOrderReason, order::Order, position::Position},
};

/// Closed set of per-instrument algorithms. Each variant owns its rolling
/// state for the lifetime of the run.
#[derive(Debug, Clone)]
pub enum StrategyAlgorithm {
    MarketMaking(SimpleMarketMakerStrategy),
    MeanRevertMomentum(MeanRevertMomentumStrategy),
    TrendRevert(TrendRevertStrategy),
    CointegratedPair(CointegratedPairStrategy),
    IndexArb(IndexArbStrategy),
    Passthrough(PassthroughStrategy),
    SpreadCapture(SpreadCaptureStrategy),
    LiquidityProvider(LiquidityProviderStrategy),
    BollingerReversion(BollingerReversionStrategy),
}

macro_rules! with_variant {
    ($algorithm:expr, $strategy:ident => $body:expr) => {
        match $algorithm {
            StrategyAlgorithm::MarketMaking($strategy) => $body,
            StrategyAlgorithm::MeanRevertMomentum($strategy) => $body,
            StrategyAlgorithm::TrendRevert($strategy) => $body,
            StrategyAlgorithm::CointegratedPair($strategy) => $body,
            StrategyAlgorithm::IndexArb($strategy) => $body,
            StrategyAlgorithm::Passthrough($strategy) => $body,
            StrategyAlgorithm::SpreadCapture($strategy) => $body,
            StrategyAlgorithm::LiquidityProvider($strategy) => $body,
            StrategyAlgorithm::BollingerReversion($strategy) => $body,
        }
    };
}

impl StrategyAlgorithm {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::MarketMaking(_) => StrategyKind::MarketMaking,
            Self::MeanRevertMomentum(_) => StrategyKind::MeanRevertMomentum,
            Self::TrendRevert(_) => StrategyKind::TrendRevert,
            Self::CointegratedPair(_) => StrategyKind::CointegratedPair,
            Self::IndexArb(_) => StrategyKind::IndexArb,
            Self::Passthrough(_) => StrategyKind::Passthrough,
            Self::SpreadCapture(_) => StrategyKind::SpreadCapture,
            Self::LiquidityProvider(_) => StrategyKind::LiquidityProvider,
            Self::BollingerReversion(_) => StrategyKind::BollingerReversion,
        }
    }

    pub fn max_limit(&self) -> i64 {
        self.ctx().max_limit()
    }
}

impl WithContext for StrategyAlgorithm {
    fn ctx(&self) -> &InstrumentContext {
        with_variant!(self, strategy => strategy.ctx())
    }
}

impl Strategy for StrategyAlgorithm {
    fn compute_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBook,
        position: Position,
    ) -> Result<Vec<Order>, NoOrderReason> {
        with_variant!(self, strategy => strategy.compute_orders(snapshot, book, position))
    }
}

macro_rules! impl_from_strategy {
    ($($variant:ident($strategy:ty)),* $(,)?) => {
        $(
            impl From<$strategy> for StrategyAlgorithm {
                fn from(strategy: $strategy) -> Self {
                    StrategyAlgorithm::$variant(strategy)
                }
            }
        )*
    };
}

impl_from_strategy!(
    MarketMaking(SimpleMarketMakerStrategy),
    MeanRevertMomentum(MeanRevertMomentumStrategy),
    TrendRevert(TrendRevertStrategy),
    CointegratedPair(CointegratedPairStrategy),
    IndexArb(IndexArbStrategy),
    Passthrough(PassthroughStrategy),
    SpreadCapture(SpreadCaptureStrategy),
    LiquidityProvider(LiquidityProviderStrategy),
    BollingerReversion(BollingerReversionStrategy),
);
