use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::scenario::strategies::StrategyKind;
use crate::types::instrument::Symbol;

/// Per-instrument strategy assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingRules {
    /// Which algorithm trades this instrument.
    pub strategy: StrategyKind,

    /// Absolute inventory cap; orders are sized so `|position| <= max_limit`.
    pub max_limit: i64,

    /// Second leg of a cointegrated pair.
    #[serde(default)]
    pub partner: Option<Symbol>,

    /// Index-arb replication weights, component -> weight.
    #[serde(default)]
    pub basket: BTreeMap<Symbol, f64>,
}

impl TradingRules {
    pub fn new(strategy: StrategyKind, max_limit: i64) -> Self {
        Self {
            strategy,
            max_limit,
            partner: None,
            basket: BTreeMap::new(),
        }
    }

    pub fn with_partner(mut self, partner: impl Into<Symbol>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<Symbol>, weight: f64) -> Self {
        self.basket.insert(component.into(), weight);
        self
    }

    fn validate(&self, symbol: &Symbol) -> Result<()> {
        if self.max_limit <= 0 {
            bail!("max_limit must be > 0");
        }

        match self.strategy {
            StrategyKind::CointegratedPair => match &self.partner {
                None => bail!("cointegrated-pair requires a partner"),
                Some(partner) if partner == symbol => bail!("cannot pair {symbol} with itself"),
                Some(_) => {}
            },
            StrategyKind::IndexArb => {
                if self.basket.is_empty() {
                    bail!("index-arb requires a non-empty basket");
                }
                if self.basket.contains_key(symbol) {
                    bail!("basket for {symbol} must not contain the index itself");
                }
                for (component, weight) in &self.basket {
                    if !weight.is_finite() || *weight <= 0.0 {
                        bail!("basket weight for {component} must be > 0, got {weight}");
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Position limit for instruments the roster does not name.
pub const DEFAULT_LIMIT: i64 = 50;

/// Instrument roster for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Limit reported for instruments with no registered strategy.
    #[serde(default = "DeskConfig::default_limit")]
    pub default_limit: i64,

    /// Instrument served by the single-product interface.
    #[serde(default = "DeskConfig::default_legacy_product")]
    pub legacy_product: Symbol,

    pub instruments: BTreeMap<Symbol, TradingRules>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit(),
            legacy_product: Self::default_legacy_product(),
            instruments: BTreeMap::new(),
        }
    }
}

static BUILTIN: OnceCell<DeskConfig> = OnceCell::new();

impl DeskConfig {
    const BUILTIN_ROSTER: &'static str = include_str!("../../strategies.yml");

    fn default_limit() -> i64 {
        DEFAULT_LIMIT
    }

    fn default_legacy_product() -> Symbol {
        Symbol::new("PRODUCT")
    }

    /// Reads and validates a YAML roster from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read strategy roster {}", path.display()))?;

        Self::parse(&raw).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: DeskConfig =
            serde_yaml::from_str(raw).context("failed to parse strategy roster")?;

        config
            .validate()
            .context("strategy roster validation failed")?;

        Ok(config)
    }

    /// The roster shipped with the crate, parsed once.
    pub fn builtin() -> Result<&'static DeskConfig> {
        BUILTIN.get_or_try_init(|| {
            Self::parse(Self::BUILTIN_ROSTER).context("built-in strategy roster is invalid")
        })
    }

    pub fn rules(&self, symbol: &str) -> Option<&TradingRules> {
        self.instruments.get(symbol)
    }

    fn validate(&self) -> Result<()> {
        if self.default_limit <= 0 {
            bail!("default_limit must be > 0");
        }
        if self.instruments.is_empty() {
            bail!("instruments must not be empty");
        }
        for (symbol, rules) in &self.instruments {
            rules
                .validate(symbol)
                .with_context(|| format!("invalid rules for instrument {symbol}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_matches_reference_table() {
        let config = DeskConfig::builtin().unwrap();

        assert_eq!(config.default_limit, 50);
        assert_eq!(config.legacy_product, Symbol::new("PRODUCT"));
        assert_eq!(config.instruments.len(), 9);

        let jolteon = config.rules("JOLTEON").unwrap();
        assert_eq!(jolteon.strategy, StrategyKind::CointegratedPair);
        assert_eq!(jolteon.max_limit, 350);
        assert_eq!(jolteon.partner, Some(Symbol::new("LUXRAY")));

        let ash = config.rules("ASH").unwrap();
        assert_eq!(ash.strategy, StrategyKind::IndexArb);
        assert_eq!(ash.basket.len(), 3);
        assert_eq!(ash.basket.get("SHINX"), Some(&0.1));
    }

    #[test]
    fn short_strategy_names_load() {
        let raw = r#"
instruments:
  SUDOWOODO: { strategy: mm, max_limit: 50 }
  SHINX: { strategy: pair, max_limit: 60, partner: JOLTEON }
"#;
        let config = DeskConfig::parse(raw).unwrap();
        assert_eq!(config.rules("SUDOWOODO").unwrap().strategy, StrategyKind::MarketMaking);
        assert_eq!(config.rules("SHINX").unwrap().strategy, StrategyKind::CointegratedPair);
    }

    #[test]
    fn rejects_pair_without_partner() {
        let raw = r#"
instruments:
  SHINX:
    strategy: cointegrated-pair
    max_limit: 60
"#;
        let error = DeskConfig::parse(raw).unwrap_err();
        assert!(format!("{error:#}").contains("requires a partner"));
    }

    #[test]
    fn rejects_self_referencing_basket() {
        let raw = r#"
instruments:
  ASH:
    strategy: index-arb
    max_limit: 60
    basket: { ASH: 1.0 }
"#;
        assert!(DeskConfig::parse(raw).is_err());
    }

    #[test]
    fn rejects_non_positive_limit() {
        let raw = r#"
instruments:
  ABRA: { strategy: trend-revert, max_limit: 0 }
"#;
        assert!(DeskConfig::parse(raw).is_err());
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let raw = r#"
instruments:
  ABRA: { strategy: trend-revert, max_limit: 40 }
"#;
        let config = DeskConfig::parse(raw).unwrap();
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.rules("ABRA").unwrap().max_limit, 40);
    }
}
