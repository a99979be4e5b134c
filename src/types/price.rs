use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Integer price level, in the engine's tick units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn new(value: i64) -> Self {
        Price(value)
    }

    /// Truncates toward zero, the way the engine floors fractional quotes.
    pub fn from_f64(value: f64) -> Self {
        Price(value.trunc() as i64)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Price::new(value)
    }
}

impl Add<i64> for Price {
    type Output = Price;

    fn add(self, rhs: i64) -> Price {
        Price(self.0 + rhs)
    }
}

impl Sub<i64> for Price {
    type Output = Price;

    fn sub(self, rhs: i64) -> Price {
        Price(self.0 - rhs)
    }
}

impl Sub for Price {
    type Output = i64;

    fn sub(self, rhs: Price) -> i64 {
        self.0 - rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_truncates() {
        assert_eq!(Price::from_f64(9999.5), Price::new(9999));
        assert_eq!(Price::from_f64(10001.0), Price::new(10001));
    }

    #[test]
    fn arithmetic() {
        let bid = Price::new(9998);
        assert_eq!(bid + 1, Price::new(9999));
        assert_eq!(Price::new(10002) - bid, 4);
    }
}
