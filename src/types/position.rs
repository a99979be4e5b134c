use std::fmt;

use serde::{Deserialize, Serialize};

/// Net signed inventory in one instrument. Positive = long, negative = short.
///
/// Owned by the matching engine; strategies only read it to bound the size
/// of what they propose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(i64);

impl Position {
    pub const FLAT: Position = Position(0);

    pub fn new(net: i64) -> Self {
        Self(net)
    }

    pub fn net(self) -> i64 {
        self.0
    }

    pub fn is_flat(self) -> bool {
        self.0 == 0
    }

    /// Units that can still be bought before reaching `+max_limit`.
    pub fn buy_capacity(self, max_limit: i64) -> i64 {
        max_limit - self.0
    }

    /// Units that can still be sold before reaching `-max_limit`.
    pub fn sell_capacity(self, max_limit: i64) -> i64 {
        self.0 + max_limit
    }

    /// `1 - |net| / max_limit`; shrinks toward zero as the book fills up and
    /// goes negative past the limit.
    pub fn headroom(self, max_limit: i64) -> f64 {
        if max_limit <= 0 {
            return 0.0;
        }
        1.0 - self.0.abs() as f64 / max_limit as f64
    }

    /// Position once `quantity` (signed) has filled in full.
    pub fn after(self, quantity: i64) -> Position {
        Position(self.0 + quantity)
    }
}

impl From<i64> for Position {
    fn from(net: i64) -> Self {
        Position(net)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}
