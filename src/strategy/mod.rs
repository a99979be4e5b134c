pub mod algorithm;
pub mod instrument_context;
pub mod strategies;
pub mod strategy;
pub mod strategy_helpers;

pub use algorithm::StrategyAlgorithm;
pub use strategy::Strategy;
