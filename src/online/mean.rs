use crate::{
    debug_assert_finite,
    error::{check_len, StatError},
};

/// A running weighted mean
///
/// Uses the one-pass recurrences from Pébay, "Formulas for robust, one-pass parallel computation of
/// covariances and arbitrary-order statistical moments" (SAND2008-6212), so the error stays bounded
/// regardless of how many samples have been folded in.
///
/// Two means built over disjoint data can be merged with [`combine`](Mean::combine); the merge is
/// commutative and associative up to rounding, so partial means may be reduced in any order.
///
/// Weights may be negative. The mean is defined as long as the running total weight never reaches zero.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Mean {
    mean: f64,
    weight: f64,
}

impl Mean {
    /// Construct an empty `Mean`
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a `Mean` over the unit-weighted values in `x`
    pub fn from_slice(x: &[f64]) -> Self {
        let mut m = Self::new();
        m.increment_batch(x);
        m
    }

    /// Construct a `Mean` directly from a mean and the total weight it summarizes
    pub fn with_weight(mean: f64, weight: f64) -> Self {
        Self { mean, weight }
    }

    /// Add a sample with unit weight
    pub fn increment(&mut self, y: f64) {
        self.increment_weighted(y, 1.0);
    }

    /// Add a sample with the given weight. A zero weight leaves the mean unchanged.
    pub fn increment_weighted(&mut self, y: f64, weight: f64) {
        debug_assert_finite!(weight);
        if weight == 0.0 {
            return;
        }
        self.weight += weight;
        if self.weight == 0.0 {
            log::warn!("total weight reached zero after increment; mean is undefined");
        }
        self.mean += (y - self.mean) * weight / self.weight;
    }

    /// Add a batch of unit-weighted samples
    ///
    /// The batch mean is computed on its own first and then merged, which is more stable than folding
    /// each sample into a long-lived running mean.
    pub fn increment_batch(&mut self, x: &[f64]) {
        if x.is_empty() {
            return;
        }
        let n = x.len() as f64;
        let mu = x.iter().fold(0.0, |mu, y| mu + y / n);
        self.merge(mu, n);
    }

    /// Add a batch of weighted samples
    ///
    /// The batch mean is computed on its own and merged, unless the batch's own running weight would
    /// reach zero (possible with negative weights). Such a batch has no mean of its own, so its samples
    /// are folded in one at a time instead.
    ///
    /// **Returns** [`StatError::InvalidArgument`] without modifying the mean if `x` and `weights` differ
    /// in length
    pub fn increment_batch_weighted(
        &mut self,
        x: &[f64],
        weights: &[f64],
    ) -> Result<(), StatError> {
        check_len("weights", x.len(), weights.len())?;

        let mut batch = Self::new();
        for (&y, &w) in x.iter().zip(weights) {
            if w != 0.0 && batch.weight + w == 0.0 {
                x.iter()
                    .zip(weights)
                    .for_each(|(&y, &w)| self.increment_weighted(y, w));
                return Ok(());
            }
            batch.increment_weighted(y, w);
        }
        if batch.weight != 0.0 {
            self.merge(batch.mean, batch.weight);
        }
        Ok(())
    }

    /// Merge `other` into this mean, as if every sample it summarizes had been added here
    pub fn combine(&mut self, other: &Mean) {
        if self.weight == 0.0 && other.weight == 0.0 {
            *self = Self::new();
            return;
        }
        self.merge(other.mean, other.weight);
    }

    /// Merge two means into a new one
    pub fn combined(a: &Mean, b: &Mean) -> Mean {
        let mut m = *a;
        m.combine(b);
        m
    }

    fn merge(&mut self, mean: f64, weight: f64) {
        if self.weight == 0.0 {
            *self = Self::with_weight(mean, weight);
            return;
        }
        let total = self.weight + weight;
        if total == 0.0 {
            log::warn!("total weight reached zero after merge; mean is undefined");
        }
        log::trace!(
            "merging mean {mean} (weight {weight}) into {} (weight {})",
            self.mean,
            self.weight
        );
        self.mean += weight / total * (mean - self.mean);
        self.weight = total;
    }

    /// Current mean
    ///
    /// The value is meaningless when [`total_weight`](Mean::total_weight) is zero: an empty mean reports 0.
    /// Use [`try_result`](Mean::try_result) to have that case reported as an error.
    pub fn result(&self) -> f64 {
        self.mean
    }

    /// Current mean, or [`StatError::UndefinedResult`] if the total weight is zero
    pub fn try_result(&self) -> Result<f64, StatError> {
        (self.weight != 0.0)
            .then_some(self.mean)
            .ok_or(StatError::UndefinedResult)
    }

    /// Sum of the weights processed so far
    pub fn total_weight(&self) -> f64 {
        self.weight
    }

    /// Whether the total weight is zero
    pub fn is_empty(&self) -> bool {
        self.weight == 0.0
    }
}

impl FromIterator<f64> for Mean {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

impl Extend<f64> for Mean {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|y| self.increment(y));
    }
}

/// Extends with `(value, weight)` pairs
impl Extend<(f64, f64)> for Mean {
    fn extend<I: IntoIterator<Item = (f64, f64)>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|(y, w)| self.increment_weighted(y, w));
    }
}
