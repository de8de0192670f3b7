use rand::{distributions::Distribution, Rng};

use super::{ConjugateUpdate, ProbModel};
use crate::error::{check_len, StatError};

/// Configuration for a [`Posterior`]
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorConfig {
    /// Number of pseudo-observations the initial parameters are worth, applied to every parameter
    pub prior_strength: f64,
}

impl Default for PosteriorConfig {
    fn default() -> Self {
        Self {
            prior_strength: 0.0,
        }
    }
}

/// A distribution updated in place from streamed observations
///
/// Holds the distribution together with its per-parameter prior strength and a sufficient statistic
/// buffer that is allocated once and reused for every update.
#[derive(Debug, Clone)]
pub struct Posterior<D: ConjugateUpdate> {
    dist: D,
    prior_strength: Vec<f64>,
    stat: Vec<f64>,
    observed: f64,
}

impl<D: ConjugateUpdate> Posterior<D> {
    /// Initialize a new `Posterior` around `dist`
    pub fn new(dist: D, config: PosteriorConfig) -> Self {
        let k = dist.num_suff_stat();
        Self {
            dist,
            prior_strength: vec![config.prior_strength; k],
            stat: vec![0.0; k],
            observed: 0.0,
        }
    }

    /// Initialize a new `Posterior` with a separate prior strength for each parameter
    ///
    /// **Returns** [`StatError::InvalidArgument`] if `prior_strength` does not have one entry per
    /// sufficient statistic component
    pub fn with_prior_strength(dist: D, prior_strength: Vec<f64>) -> Result<Self, StatError> {
        let k = dist.num_suff_stat();
        check_len("prior_strength", k, prior_strength.len())?;
        Ok(Self {
            dist,
            prior_strength,
            stat: vec![0.0; k],
            observed: 0.0,
        })
    }

    /// Fold a batch of samples, optionally weighted, into the distribution
    pub fn observe_batch(
        &mut self,
        samples: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<(), StatError> {
        let n = self.dist.suff_stat(samples, weights, &mut self.stat)?;
        self.dist
            .conjugate_update(&self.stat, n, &mut self.prior_strength)?;
        self.observed += n;
        Ok(())
    }

    /// Fold a single weighted sample into the distribution
    pub fn observe_weighted(&mut self, sample: f64, weight: f64) -> Result<(), StatError> {
        self.observe_batch(&[sample], Some(&[weight][..]))
    }

    /// The distribution with its current parameters
    pub fn dist(&self) -> &D {
        &self.dist
    }

    /// Consume the posterior, keeping only the distribution
    pub fn into_dist(self) -> D {
        self.dist
    }

    /// Pseudo-observation count behind each parameter, including everything observed so far
    pub fn prior_strength(&self) -> &[f64] {
        &self.prior_strength
    }

    /// Total weight of the real observations folded in so far, excluding the initial prior strength
    pub fn effective_count(&self) -> f64 {
        self.observed
    }
}

impl<D> Distribution<f64> for Posterior<D>
where
    D: ConjugateUpdate + Distribution<f64>,
{
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }
}

impl<D> ProbModel<f64, f64> for Posterior<D>
where
    D: ConjugateUpdate + Distribution<f64> + Default,
{
    fn init() -> Self {
        Self::new(D::default(), PosteriorConfig::default())
    }

    fn update(&mut self, observation: f64) -> Result<(), StatError> {
        self.observe_batch(&[observation], None)
    }
}
