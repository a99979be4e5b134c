pub mod bollinger_reversion;
pub mod cointegrated_pair;
pub mod index_arb;
pub mod liquidity_provider;
pub mod mean_revert_momentum;
pub mod passthrough;
pub mod simple_mm;
pub mod spread_capture;
pub mod trend_revert;
