use std::collections::BTreeMap;

use crate::{
    market::market_snapshot::MarketSnapshot,
    types::{
        instrument::Symbol,
        order::{Order, Side},
    },
};

/// Worst-case position on one side of an instrument, assuming every order
/// in the batch fills, that would sit beyond the instrument's limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitBreach {
    pub symbol: Symbol,
    pub side: Side,
    pub projected: i64,
    pub limit: i64,
}

/// Advisory check run over every batch of orders a strategy emits. It never
/// alters the orders; breaches are reported to the caller.
pub struct PositionLimitAudit;

impl PositionLimitAudit {
    pub fn evaluate(
        snapshot: &MarketSnapshot,
        orders: &[Order],
        limit_for: impl Fn(&str) -> i64,
    ) -> Result<(), Vec<LimitBreach>> {
        // symbol -> (sum of buys, sum of sells)
        let mut flow: BTreeMap<&Symbol, (i64, i64)> = BTreeMap::new();
        for order in orders {
            let (buys, sells) = flow.entry(&order.symbol).or_default();
            match order.side() {
                Side::Buy => *buys += order.quantity,
                Side::Sell => *sells += order.quantity,
            }
        }

        let mut breaches = Vec::new();

        for (symbol, (buys, sells)) in flow {
            let position = snapshot.position(symbol.as_str());
            let limit = limit_for(symbol.as_str());

            let worst_long = position.after(buys).net();
            if worst_long > limit {
                breaches.push(LimitBreach {
                    symbol: symbol.clone(),
                    side: Side::Buy,
                    projected: worst_long,
                    limit,
                });
            }

            let worst_short = position.after(sells).net();
            if worst_short < -limit {
                breaches.push(LimitBreach {
                    symbol: symbol.clone(),
                    side: Side::Sell,
                    projected: worst_short,
                    limit,
                });
            }
        }

        if breaches.is_empty() {
            Ok(())
        } else {
            Err(breaches)
        }
    }
}
