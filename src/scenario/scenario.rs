use anyhow::{Result, anyhow};

use crate::{
    dispatch::dispatcher::Dispatcher,
    scenario::strategies::StrategyKind,
    strategy::{
        StrategyAlgorithm,
        strategies::{
            bollinger_reversion::BollingerReversionStrategy,
            cointegrated_pair::CointegratedPairStrategy, index_arb::IndexArbStrategy,
            liquidity_provider::LiquidityProviderStrategy,
            mean_revert_momentum::MeanRevertMomentumStrategy, passthrough::PassthroughStrategy,
            simple_mm::SimpleMarketMakerStrategy, spread_capture::SpreadCaptureStrategy,
            trend_revert::TrendRevertStrategy,
        },
    },
    types::{
        instrument::Symbol,
        trading_rules::{DeskConfig, TradingRules},
    },
};

pub struct Scenario;

impl Scenario {
    pub fn strategy(symbol: &Symbol, rules: &TradingRules) -> Result<StrategyAlgorithm> {
        tracing::debug!(
            %symbol,
            strategy = %rules.strategy,
            max_limit = rules.max_limit,
            "creating strategy"
        );

        let symbol = symbol.clone();
        let limit = rules.max_limit;

        let strategy = match rules.strategy {
            StrategyKind::MarketMaking => {
                SimpleMarketMakerStrategy::for_instrument(symbol, limit).into()
            }
            StrategyKind::MeanRevertMomentum => {
                MeanRevertMomentumStrategy::for_instrument(symbol, limit).into()
            }
            StrategyKind::TrendRevert => TrendRevertStrategy::for_instrument(symbol, limit).into(),
            StrategyKind::CointegratedPair => {
                let partner = rules
                    .partner
                    .clone()
                    .ok_or_else(|| anyhow!("cointegrated-pair {symbol} has no partner"))?;
                CointegratedPairStrategy::for_instrument(symbol, limit, partner).into()
            }
            StrategyKind::IndexArb => {
                IndexArbStrategy::for_instrument(symbol, limit, rules.basket.clone()).into()
            }
            StrategyKind::Passthrough => PassthroughStrategy::for_instrument(symbol, limit).into(),
            StrategyKind::SpreadCapture => {
                SpreadCaptureStrategy::for_instrument(symbol, limit).into()
            }
            StrategyKind::LiquidityProvider => {
                LiquidityProviderStrategy::for_instrument(symbol, limit).into()
            }
            StrategyKind::BollingerReversion => {
                BollingerReversionStrategy::for_instrument(symbol, limit).into()
            }
        };

        Ok(strategy)
    }

    /// One freshly-initialised strategy per configured instrument.
    pub fn dispatcher(config: &DeskConfig) -> Result<Dispatcher> {
        tracing::info!(
            instruments = config.instruments.len(),
            default_limit = config.default_limit,
            legacy_product = %config.legacy_product,
            "creating dispatcher"
        );

        let mut dispatcher = Dispatcher::new(config.default_limit);
        for (symbol, rules) in &config.instruments {
            dispatcher.register(Self::strategy(symbol, rules)?);
        }

        Ok(dispatcher)
    }
}
