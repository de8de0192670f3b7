use rand::distributions::Distribution;

use crate::error::StatError;

mod exponential;
mod normal;
mod posterior;

pub use exponential::Exponential;
pub use normal::Normal;
pub use posterior::{Posterior, PosteriorConfig};

/// Trait for probabilistic models
///
/// ### Type parameters
/// - `T`: The type returned by sampling the distribution
/// - `O`: The type of the observation, contains information relevant to updating the model
pub trait ProbModel<T, O>: Distribution<T> {
    /// Initialize the model in a default state
    fn init() -> Self;

    /// Update the model given a new observation
    fn update(&mut self, observation: O) -> Result<(), StatError>;
}

/// A distribution family whose parameters can be updated from a fixed-size sufficient statistic
///
/// The statistic buffer is always owned by the caller and may be reused between calls, so implementations
/// must overwrite every element rather than accumulate into it.
///
/// Implementations guarantee that running [`suff_stat`](ConjugateUpdate::suff_stat) followed by
/// [`conjugate_update`](ConjugateUpdate::conjugate_update) once per batch, carrying `prior_strength`
/// forward, yields the same parameters as a single update over the concatenation of all batches.
pub trait ConjugateUpdate {
    /// Length of the sufficient statistic, and of the `prior_strength` slice
    fn num_suff_stat(&self) -> usize;

    /// Compute the sufficient statistic of `samples` into `stat`
    ///
    /// `weights` defaults to all ones when `None`. Zero-weight samples have no effect.
    ///
    /// **Returns** the effective sample count (the sum of the weights), or [`StatError::InvalidArgument`]
    /// if `weights` and `samples` differ in length or `stat.len() != self.num_suff_stat()`
    fn suff_stat(
        &self,
        samples: &[f64],
        weights: Option<&[f64]>,
        stat: &mut [f64],
    ) -> Result<f64, StatError>;

    /// Fold `n` observations summarized by `stat` into the current parameters
    ///
    /// The current parameters are treated as the result of `prior_strength[i]` pseudo-observations.
    /// Each entry of `prior_strength` is incremented by `n` so that a following call treats the updated
    /// parameters as its prior. An update with `n == 0` changes nothing.
    fn conjugate_update(
        &mut self,
        stat: &[f64],
        n: f64,
        prior_strength: &mut [f64],
    ) -> Result<(), StatError>;

    /// Merge the statistic `other` of `other_n` observations into `stat` of `n` observations
    ///
    /// The result equals the statistic computed directly over the union of both sample sets.
    ///
    /// **Returns** the combined effective count
    fn combine_suff_stat(
        &self,
        stat: &mut [f64],
        n: f64,
        other: &[f64],
        other_n: f64,
    ) -> Result<f64, StatError>;
}
