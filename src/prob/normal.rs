use rand::{distributions::Distribution, Rng};
use rand_distr::StandardNormal;

use super::ConjugateUpdate;
use crate::{
    error::{check_len, StatError},
    online::Mean,
};

/// Normal distribution with mean `mu` and standard deviation `sigma`
///
/// The sufficient statistic is `[x̄, Σ wᵢ(xᵢ - x̄)²]`: the weighted mean and the weighted sum of squared
/// deviations from it. Conjugate updates merge the mean with the [`Mean::combine`] rule and the squared
/// deviations with the pairwise rule of Chan et al., so `sigma` is the maximum likelihood (population)
/// standard deviation of everything seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub mu: f64,
    pub sigma: f64,
}

impl Normal {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

/// The standard normal
impl Default for Normal {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Distribution<f64> for Normal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mu + self.sigma * z
    }
}

/// Sum of squared deviations of two merged groups, given each group's own sum, their counts and the
/// difference between their means
fn merge_ssd(ssd_a: f64, n_a: f64, ssd_b: f64, n_b: f64, delta: f64) -> f64 {
    ssd_a + ssd_b + delta * delta * n_a * n_b / (n_a + n_b)
}

impl ConjugateUpdate for Normal {
    fn num_suff_stat(&self) -> usize {
        2
    }

    fn suff_stat(
        &self,
        samples: &[f64],
        weights: Option<&[f64]>,
        stat: &mut [f64],
    ) -> Result<f64, StatError> {
        check_len("stat", self.num_suff_stat(), stat.len())?;

        let mut mean = Mean::new();
        match weights {
            Some(weights) => mean.increment_batch_weighted(samples, weights)?,
            None => mean.increment_batch(samples),
        }
        if mean.is_empty() {
            stat.fill(0.0);
            return Ok(0.0);
        }

        let mu = mean.result();
        let ssd: f64 = match weights {
            Some(weights) => samples
                .iter()
                .zip(weights)
                .filter(|&(_, &w)| w != 0.0)
                .map(|(x, w)| w * (x - mu).powi(2))
                .sum(),
            None => samples.iter().map(|x| (x - mu).powi(2)).sum(),
        };

        stat[0] = mu;
        stat[1] = ssd;
        Ok(mean.total_weight())
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

        let (prior_mu, prior_sigma) = (prior_strength[0], prior_strength[1]);

        let mut mean = Mean::with_weight(self.mu, prior_mu);
        mean.combine(&Mean::with_weight(stat[0], n));

        let ssd = merge_ssd(
            prior_sigma * self.sigma * self.sigma,
            prior_sigma,
            stat[1],
            n,
            stat[0] - self.mu,
        );
        let sigma = (ssd / (prior_sigma + n)).sqrt();

        log::trace!(
            "normal update: mu {} -> {}, sigma {} -> {sigma} ({n} new observations)",
            self.mu,
            mean.result(),
            self.sigma,
        );

        self.mu = mean.result();
        self.sigma = sigma;
        prior_strength[0] = prior_mu + n;
        prior_strength[1] = prior_sigma + n;
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
        if other_n == 0.0 {
            return Ok(n);
        }
        if n == 0.0 {
            stat.copy_from_slice(other);
            return Ok(other_n);
        }

        let mut mean = Mean::with_weight(stat[0], n);
        mean.combine(&Mean::with_weight(other[0], other_n));
        stat[1] = merge_ssd(stat[1], n, other[1], other_n, other[0] - stat[0]);
        stat[0] = mean.result();
        Ok(mean.total_weight())
    }
}

#[cfg(test)]
mod tests {
    use statrs::statistics::Statistics;

    use super::*;
    use crate::{
        prob::{testing::assert_incremental_matches_batch, Exponential},
        util::testing::{assert_close, ones, randn, rng},
    };

    const TOL: f64 = 1e-14;

    fn params(n: &Normal) -> Vec<f64> {
        vec![n.mu, n.sigma]
    }

    #[test]
    fn incremental_matches_batch_unweighted() {
        let mut rng = rng(10);
        let samps = randn(&Normal::new(1.0, 2.0), 10, &mut rng);
        assert_incremental_matches_batch(
            &Normal::new(1.0, 2.0),
            &samps,
            None,
            params,
            TOL,
        );
    }

    #[test]
    fn incremental_matches_batch_unit_weights() {
        let mut rng = rng(11);
        let samps = randn(&Normal::new(1.0, 2.0), 10, &mut rng);
        let weights = ones(10);
        assert_incremental_matches_batch(
            &Normal::new(1.0, 2.0),
            &samps,
            Some(weights.as_slice()),
            params,
            TOL,
        );
    }

    #[test]
    fn incremental_matches_batch_random_weights() {
        let mut rng = rng(12);
        let samps = randn(&Normal::new(1.0, 2.0), 10, &mut rng);
        let weights = randn(&Exponential::new(1.0), 10, &mut rng);
        assert_incremental_matches_batch(
            &Normal::new(1.0, 2.0),
            &samps,
            Some(weights.as_slice()),
            params,
            TOL,
        );
    }

    #[test]
    fn suff_stat_matches_population_statistics() {
        let mut rng = rng(13);
        let samps = randn(&Normal::new(-3.0, 0.5), 64, &mut rng);
        let mut stat = [0.0; 2];
        let n = Normal::default()
            .suff_stat(&samps, None, &mut stat)
            .unwrap();

        assert_eq!(n, 64.0, "unweighted count is the sample count");
        assert_close(stat[0], samps.iter().mean(), 1e-13, "mean");
        assert_close(
            (stat[1] / n).sqrt(),
            samps.iter().population_std_dev(),
            1e-13,
            "population std dev",
        );
    }

    #[test]
    fn update_from_empty_prior_is_mle() {
        let mut dist = Normal::new(100.0, 100.0);
        let mut stat = [0.0; 2];
        let mut prior = [0.0; 2];
        let n = dist
            .suff_stat(&[1.0, 2.0, 3.0, 6.0], None, &mut stat)
            .unwrap();
        dist.conjugate_update(&stat, n, &mut prior).unwrap();

        assert_close(dist.mu, 3.0, TOL, "mu");
        assert_close(dist.sigma, 3.5_f64.sqrt(), TOL, "sigma");
        assert_eq!(prior, [4.0, 4.0], "prior strength carries the count forward");
    }

    #[test]
    fn single_sample_collapses_sigma() {
        let mut dist = Normal::default();
        let mut stat = [7.0, 7.0];
        let mut prior = [0.0; 2];
        let n = dist.suff_stat(&[2.5], None, &mut stat).unwrap();
        assert_eq!(stat, [2.5, 0.0], "stale buffer contents are overwritten");

        dist.conjugate_update(&stat, n, &mut prior).unwrap();
        assert_eq!(dist, Normal::new(2.5, 0.0));
    }

    #[test]
    fn zero_weights_ignored() {
        let samps = [0.5, 40.0, -1.0, 2.0];
        let weights = [1.0, 0.0, 2.0, 0.5];
        let mut with_zero = Normal::new(1.0, 1.0);
        let mut without = with_zero;
        let (mut prior_a, mut prior_b) = ([1.0, 1.0], [1.0, 1.0]);
        let mut stat = [0.0; 2];

        let n = with_zero
            .suff_stat(&samps, Some(&weights[..]), &mut stat)
            .unwrap();
        assert_eq!(n, 3.5, "zero weight does not count");
        with_zero.conjugate_update(&stat, n, &mut prior_a).unwrap();

        let n = without
            .suff_stat(&[0.5, -1.0, 2.0], Some(&[1.0, 2.0, 0.5][..]), &mut stat)
            .unwrap();
        without.conjugate_update(&stat, n, &mut prior_b).unwrap();

        assert_close(with_zero.mu, without.mu, TOL, "mu");
        assert_close(with_zero.sigma, without.sigma, TOL, "sigma");
        assert_eq!(prior_a, prior_b);

        let before = with_zero;
        let n = with_zero
            .suff_stat(&[1e6], Some(&[0.0][..]), &mut stat)
            .unwrap();
        with_zero.conjugate_update(&stat, n, &mut prior_a).unwrap();
        assert_eq!(with_zero, before, "zero-weight batch is a no-op");
    }

    #[test]
    fn combine_suff_stat_matches_union() {
        let mut rng = rng(14);
        let samps = randn(&Normal::new(2.0, 5.0), 30, &mut rng);
        let weights = randn(&Exponential::new(1.0), 30, &mut rng);
        let dist = Normal::default();

        let mut full = [0.0; 2];
        let n_full = dist
            .suff_stat(&samps, Some(weights.as_slice()), &mut full)
            .unwrap();

        let mut acc = [0.0; 2];
        let mut n_acc = 0.0;
        let mut part = [0.0; 2];
        for (x, w) in samps.chunks(7).zip(weights.chunks(7)) {
            let n = dist.suff_stat(x, Some(w), &mut part).unwrap();
            n_acc = dist.combine_suff_stat(&mut acc, n_acc, &part, n).unwrap();
        }

        assert_close(n_acc, n_full, 1e-12, "count");
        assert_close(acc[0], full[0], 1e-12, "mean");
        assert_close(acc[1], full[1], 1e-10, "sum of squared deviations");
    }

    #[test]
    fn buffer_length_checked() {
        let mut dist = Normal::default();
        let err = dist.suff_stat(&[1.0], None, &mut [0.0; 1]).unwrap_err();
        assert_eq!(
            err,
            StatError::InvalidArgument {
                name: "stat",
                expected: 2,
                found: 1,
            }
        );
        assert!(dist
            .suff_stat(&[1.0, 2.0], Some(&[1.0][..]), &mut [0.0; 2])
            .is_err());
        assert!(dist.conjugate_update(&[0.0; 2], 1.0, &mut [0.0]).is_err());
        assert_eq!(dist, Normal::default(), "failed calls do not mutate");
    }

    #[test]
    fn sample_moments() {
        let mut rng = rng(15);
        let samps = randn(&Normal::new(2.0, 5.0), 20_000, &mut rng);
        let mean = (&samps).mean();
        let sd = (&samps).std_dev();
        assert!((mean - 2.0).abs() < 0.15, "sample mean {mean} near 2");
        assert!((sd - 5.0).abs() < 0.15, "sample std dev {sd} near 5");
    }
}
