use std::collections::VecDeque;

/// Fixed-capacity FIFO of the most recent observations.
///
/// Derived statistics need at least two points and return `None` below
/// that; callers treat `None` as "not enough data yet".
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value`, evicting the oldest observation when full.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// The last `n` observations, oldest first (fewer if not yet available).
    pub fn recent(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        let start = self.values.len().saturating_sub(n);
        self.values.range(start..).copied()
    }

    pub fn mean(&self) -> Option<f64> {
        sample_stats(self.iter()).map(|stats| stats.mean)
    }

    pub fn stdev(&self) -> Option<f64> {
        sample_stats(self.iter()).map(|stats| stats.stdev)
    }

    pub fn stats(&self) -> Option<SampleStats> {
        sample_stats(self.iter())
    }

    /// Statistics over the last `n` observations only.
    pub fn recent_stats(&self, n: usize) -> Option<SampleStats> {
        sample_stats(self.recent(n))
    }

    /// `(value - mean) / stdev` over the whole window; zero when the window
    /// has no dispersion.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        self.stats().map(|stats| stats.z_score(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    /// Sample (n - 1) standard deviation.
    pub stdev: f64,
}

impl SampleStats {
    pub fn variance(&self) -> f64 {
        self.stdev * self.stdev
    }

    pub fn z_score(&self, value: f64) -> f64 {
        if self.stdev > 0.0 && self.stdev.is_finite() {
            let z = (value - self.mean) / self.stdev;
            if z.is_finite() {
                return z;
            }
        }
        0.0
    }
}

/// Mean and sample standard deviation, `None` below two observations.
pub fn sample_stats(values: impl IntoIterator<Item = f64>) -> Option<SampleStats> {
    let values: Vec<f64> = values.into_iter().collect();
    let count = values.len();
    if count < 2 {
        return None;
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);

    Some(SampleStats {
        count,
        mean,
        stdev: variance.sqrt(),
    })
}
