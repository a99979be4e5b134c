use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::Deserialize;

/// Deserialised through `FromStr`, so roster files accept the short aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrategyKind {
    MarketMaking,
    MeanRevertMomentum,
    TrendRevert,
    CointegratedPair,
    IndexArb,
    Passthrough,
    SpreadCapture,
    LiquidityProvider,
    BollingerReversion,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::MarketMaking => "market-making",
            Self::MeanRevertMomentum => "mean-revert-momentum",
            Self::TrendRevert => "trend-revert",
            Self::CointegratedPair => "cointegrated-pair",
            Self::IndexArb => "index-arb",
            Self::Passthrough => "passthrough",
            Self::SpreadCapture => "spread-capture",
            Self::LiquidityProvider => "liquidity-provider",
            Self::BollingerReversion => "bollinger-reversion",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "market-making" | "mm" => Ok(Self::MarketMaking),
            "mean-revert-momentum" => Ok(Self::MeanRevertMomentum),
            "trend-revert" => Ok(Self::TrendRevert),
            "cointegrated-pair" | "pair" => Ok(Self::CointegratedPair),
            "index-arb" => Ok(Self::IndexArb),
            "passthrough" | "noop" => Ok(Self::Passthrough),
            "spread-capture" => Ok(Self::SpreadCapture),
            "liquidity-provider" => Ok(Self::LiquidityProvider),
            "bollinger-reversion" => Ok(Self::BollingerReversion),
            other => Err(anyhow!("unknown strategy kind: {other}")),
        }
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in [
            StrategyKind::MarketMaking,
            StrategyKind::CointegratedPair,
            StrategyKind::BollingerReversion,
        ] {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn roster_accepts_aliases() {
        let kinds: Vec<StrategyKind> =
            serde_yaml::from_str("[mm, pair, noop, index-arb]").unwrap();

        assert_eq!(
            kinds,
            vec![
                StrategyKind::MarketMaking,
                StrategyKind::CointegratedPair,
                StrategyKind::Passthrough,
                StrategyKind::IndexArb,
            ]
        );
        assert!(serde_yaml::from_str::<StrategyKind>("martingale").is_err());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let error = "martingale".parse::<StrategyKind>().unwrap_err();
        assert!(error.to_string().contains("martingale"));
    }
}
