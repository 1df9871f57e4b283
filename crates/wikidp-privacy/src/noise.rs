//! Laplace noise injection for counts.
//!
//! Samples use the inverse CDF of Laplace(0, b):
//!
//! ```text
//! u ~ Uniform(-0.5, 0.5)
//! x = -b * sign(u) * ln(1 - 2|u|)
//! ```
//!
//! Noised counts are rounded half-to-even and clamped to the floor.

use rand::Rng;
use wikidp_core::PrivacyParameters;

use crate::types::GroundTruthEntry;

/// Source of uniform draws on the open interval (-0.5, 0.5).
///
/// Every [`Rng`] is a source; tests can supply scripted draws instead.
pub trait UniformSource {
    fn next_centered(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_centered(&mut self) -> f64 {
        // gen::<f64>() is in [0, 1); u = -0.5 would make ln(0) infinite.
        loop {
            let u = self.gen::<f64>() - 0.5;
            if u > -0.5 {
                return u;
            }
        }
    }
}

/// Draw one Laplace(0, scale) sample.
pub fn laplace_sample<S: UniformSource + ?Sized>(scale: f64, source: &mut S) -> f64 {
    let u = source.next_centered();
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
}

/// Round a noisy value half-to-even and clamp it to `floor`.
pub fn round_count(noisy: f64, floor: u64) -> u64 {
    let rounded = noisy.round_ties_even();
    if rounded <= floor as f64 {
        floor
    } else {
        // Saturates for values beyond u64::MAX.
        rounded as u64
    }
}

/// Noise every true count independently.
///
/// The result is index-aligned with `entries`; the input is not modified.
pub fn noise_counts<S: UniformSource + ?Sized>(
    entries: &[GroundTruthEntry],
    params: &PrivacyParameters,
    source: &mut S,
) -> Vec<u64> {
    let scale = params.scale();
    entries
        .iter()
        .map(|e| round_count(e.true_count as f64 + laplace_sample(scale, source), params.floor))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Replays a fixed list of centered uniforms.
    pub(crate) struct Scripted(pub std::vec::IntoIter<f64>);

    impl Scripted {
        pub(crate) fn new(draws: &[f64]) -> Self {
            Self(draws.to_vec().into_iter())
        }
    }

    impl UniformSource for Scripted {
        fn next_centered(&mut self) -> f64 {
            self.0.next().expect("scripted draws exhausted")
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_inverse_cdf_sample() {
        let mut src = Scripted::new(&[0.25, -0.25, 0.0, 0.45]);
        // -1 * ln(0.5) = ln 2
        assert!(close(laplace_sample(1.0, &mut src), std::f64::consts::LN_2));
        assert!(close(laplace_sample(1.0, &mut src), -std::f64::consts::LN_2));
        assert_eq!(laplace_sample(1.0, &mut src), 0.0);
        // scale 2, u = 0.45: -2 * ln(0.1)
        assert!(close(laplace_sample(2.0, &mut src), -2.0 * 0.1f64.ln()));
    }

    #[test]
    fn test_rng_draws_stay_in_open_interval() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..10_000 {
            let u = rng.next_centered();
            assert!(u > -0.5 && u < 0.5);
            assert!(laplace_sample(1.0, &mut rng).is_finite());
        }
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_count(100.5, 0), 100);
        assert_eq!(round_count(101.5, 0), 102);
        assert_eq!(round_count(99.49, 0), 99);
        assert_eq!(round_count(0.5, 0), 0);
    }

    #[test]
    fn test_round_clamps_to_floor() {
        assert_eq!(round_count(-12.7, 0), 0);
        assert_eq!(round_count(3.2, 5), 5);
        assert_eq!(round_count(5.4, 5), 5);
        assert_eq!(round_count(6.0, 5), 6);
    }

    #[test]
    fn test_noise_counts_does_not_mutate_input() {
        let entries = vec![
            GroundTruthEntry::new("A", 1, 100),
            GroundTruthEntry::new("B", 2, 50),
        ];
        let before = entries.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let noised = noise_counts(&entries, &PrivacyParameters::default(), &mut rng);
        assert_eq!(noised.len(), 2);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let entries: Vec<_> = (0..50)
            .map(|i| GroundTruthEntry::new(format!("a{i}"), i + 1, 1000 - i as u64 * 10))
            .collect();
        let params = PrivacyParameters::default();

        let a = noise_counts(&entries, &params, &mut ChaCha20Rng::seed_from_u64(99));
        let b = noise_counts(&entries, &params, &mut ChaCha20Rng::seed_from_u64(99));
        let c = noise_counts(&entries, &params, &mut ChaCha20Rng::seed_from_u64(100));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_larger_epsilon_means_less_error() {
        let entries: Vec<_> = (0..20)
            .map(|i| GroundTruthEntry::new(format!("a{i}"), i + 1, 10_000))
            .collect();

        let mean_abs_error = |epsilon: f64| {
            let params = PrivacyParameters {
                epsilon,
                ..PrivacyParameters::default()
            };
            let mut rng = ChaCha20Rng::seed_from_u64(2024);
            let mut total = 0.0;
            let trials = 200;
            for _ in 0..trials {
                for n in noise_counts(&entries, &params, &mut rng) {
                    total += (n as f64 - 10_000.0).abs();
                }
            }
            total / (trials * entries.len()) as f64
        };

        // E|Lap(b)| = b, so the means sit near 10, 1, and 0.1 (before rounding).
        let loose = mean_abs_error(0.1);
        let mid = mean_abs_error(1.0);
        let tight = mean_abs_error(10.0);
        assert!(loose > 8.0 && loose < 12.0, "loose = {loose}");
        assert!(mid > 0.7 && mid < 1.3, "mid = {mid}");
        assert!(loose > mid && mid > tight);
    }
}
