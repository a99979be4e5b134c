use crate::types::instrument::Symbol;

/// Why a strategy produced nothing this tick. None of these are faults; the
/// dispatcher turns every one of them into an empty order list.
#[derive(Debug, Clone, PartialEq)]
pub enum NoOrderReason {
    /// Own book is missing a side.
    MissingTopOfBook,
    /// Pair partner absent from the snapshot or one-sided.
    MissingPartnerBook { partner: Symbol },
    /// Rolling window not yet deep enough to trade on.
    WarmingUp { have: usize, need: usize },
    /// No basket component had a two-sided book.
    UndefinedFairValue,
    /// At least one basket component is absent from the snapshot.
    IncompleteBasket { missing: Symbol },
    BelowEntryThreshold { signal: f64, threshold: f64 },
    SpreadOutOfRange { spread: i64 },
    /// Signal fired but the position limit leaves no room on that side.
    NoCapacity,
    /// Strategy never trades.
    Passthrough,
}
