use rand::{distributions::Distribution, Rng};
use rand_distr::Exp1;

use super::ConjugateUpdate;
use crate::error::{check_len, StatError};

/// Exponential distribution with rate λ
///
/// The sufficient statistic is `[Σ wᵢxᵢ]`. A conjugate update pools the implied total waiting time of the
/// prior pseudo-observations with that of the new samples: λ = (p + n) / (p / λ + Σ wᵢxᵢ)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    pub rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl Default for Exponential {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Distribution<f64> for Exponential {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x: f64 = rng.sample(Exp1);
        x / self.rate
    }
}

impl ConjugateUpdate for Exponential {
    fn num_suff_stat(&self) -> usize {
        1
    }

    fn suff_stat(
        &self,
        samples: &[f64],
        weights: Option<&[f64]>,
        stat: &mut [f64],
    ) -> Result<f64, StatError> {
        check_len("stat", self.num_suff_stat(), stat.len())?;

        let (sum, n) = match weights {
            Some(weights) => {
                check_len("weights", samples.len(), weights.len())?;
                samples
                    .iter()
                    .zip(weights)
                    .filter(|&(_, &w)| w != 0.0)
                    .fold((0.0, 0.0), |(sum, n): (f64, f64), (&x, &w)| {
                        (sum + w * x, n + w)
                    })
            }
            None => (samples.iter().sum::<f64>(), samples.len() as f64),
        };

        stat[0] = sum;
        Ok(n)
    }

    fn conjugate_update(
        &mut self,
        stat: &[f64],
        n: f64,
        prior_strength: &mut [f64],
    ) -> Result<(), StatError> {
        check_len("stat", self.num_suff_stat(), stat.len())?;
        check_len("prior_strength", self.num_suff_stat(), prior_strength.len())?;
        if n == 0.0 {
            return Ok(());
        }

        let prior = prior_strength[0];
        let total = prior + n;
        let rate = total / (prior / self.rate + stat[0]);
        log::trace!(
            "exponential update: rate {} -> {rate} ({total} observations)",
            self.rate
        );

        self.rate = rate;
        prior_strength[0] = total;
        Ok(())
    }

    fn combine_suff_stat(
        &self,
        stat: &mut [f64],
        n: f64,
        other: &[f64],
        other_n: f64,
    ) -> Result<f64, StatError> {
        check_len("stat", self.num_suff_stat(), stat.len())?;
        check_len("other", self.num_suff_stat(), other.len())?;
        stat[0] += other[0];
        Ok(n + other_n)
    }
}
