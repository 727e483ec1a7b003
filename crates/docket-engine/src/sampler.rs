//! Sampling primitives: seeded random streams, Gaussian noise, quantiles

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Random stream for one claim of one run
///
/// Each claim draws from its own stream derived from the run seed, so a
/// counterfactual that changes one claim leaves every other claim's draws
/// untouched.
pub fn claim_stream(seed: u64, claim_position: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(claim_position as u64))
}

/// Seed for a run: the configured one, or a fresh one from the thread RNG
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| rand::thread_rng().next_u64())
}

/// Draw a standard normal variate (Box-Muller)
///
/// Consumes exactly two uniforms per call, keeping stream positions aligned
/// between runs that share a seed.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // gen::<f64>() is in [0, 1); shift to (0, 1] so ln() stays finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Linear-interpolated quantile of an ascending-sorted slice
///
/// Position `(n - 1) * q` is interpolated between its two bracketing order
/// statistics. Returns NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Mean and 10th/90th percentiles of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// 10th percentile
    pub p10: f64,
    /// 90th percentile
    pub p90: f64,
}

impl SampleSummary {
    /// The same value for every statistic
    pub fn constant(value: f64) -> Self {
        Self {
            mean: value,
            p10: value,
            p90: value,
        }
    }

    /// Summarize samples, sorting them in place
    ///
    /// Returns `None` for an empty set.
    pub fn from_samples(samples: &mut [f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        samples.sort_by(f64::total_cmp);
        Some(Self {
            mean,
            p10: quantile(samples, 0.10),
            p90: quantile(samples, 0.90),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_endpoints() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 5.0);
        assert_eq!(quantile(&sorted, 0.5), 3.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        // (4 - 1) * 0.5 = 1.5 -> halfway between 20 and 30
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert!((quantile(&sorted, 0.5) - 25.0).abs() < 1e-12);
        // (4 - 1) * 0.1 = 0.3 -> 10 + 0.3 * 10
        assert!((quantile(&sorted, 0.1) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_single_and_empty() {
        assert_eq!(quantile(&[0.4], 0.9), 0.4);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_summary_sorts_and_averages() {
        let mut samples = vec![0.9, 0.1, 0.5, 0.3, 0.7];
        let summary = SampleSummary::from_samples(&mut samples).unwrap();
        assert!((summary.mean - 0.5).abs() < 1e-12);
        assert_eq!(samples, vec![0.1, 0.3, 0.5, 0.7, 0.9]);
        assert!(summary.p10 < summary.mean && summary.mean < summary.p90);
        assert!(SampleSummary::from_samples(&mut []).is_none());
    }

    #[test]
    fn test_gaussian_is_seeded_and_centered() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs: Vec<f64> = (0..5000).map(|_| gaussian(&mut a)).collect();
        let ys: Vec<f64> = (0..5000).map(|_| gaussian(&mut b)).collect();
        assert_eq!(xs, ys);

        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64;
        assert!(mean.abs() < 0.1, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {}", var);
        assert!(xs.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_claim_streams_differ() {
        let mut first = claim_stream(7, 0);
        let mut second = claim_stream(7, 1);
        assert_ne!(first.next_u64(), second.next_u64());
        assert_eq!(resolve_seed(Some(11)), 11);
    }
}
