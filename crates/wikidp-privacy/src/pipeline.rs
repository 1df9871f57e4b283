//! The full release: noise, then re-rank, then classify.

use tracing::info;
use wikidp_core::PrivacyParameters;

use crate::noise::{noise_counts, UniformSource};
use crate::rank::rerank;
use crate::reliability::is_reliable;
use crate::types::{GroundTruthEntry, NoisedEntry, Release, ReleaseMetrics};

/// Produce the noised release for one batch of ground-truth entries.
///
/// Ranking runs only after every count in the batch is noised. The returned
/// entries are ordered by `noised_rank`.
pub fn release<S: UniformSource + ?Sized>(
    entries: &[GroundTruthEntry],
    params: &PrivacyParameters,
    source: &mut S,
) -> Release {
    let noised = noise_counts(entries, params, source);
    let ranks = rerank(&noised);

    let mut enriched: Vec<NoisedEntry> = entries
        .iter()
        .zip(noised.iter().zip(ranks.iter()))
        .map(|(truth, (&noised_count, &noised_rank))| NoisedEntry {
            truth: truth.clone(),
            noised_count,
            noised_rank,
            reliable: is_reliable(noised_count, params),
        })
        .collect();
    enriched.sort_by_key(|e| e.noised_rank);

    let release = Release {
        metrics: ReleaseMetrics::for_params(params),
        entries: enriched,
    };

    info!(
        epsilon = params.epsilon,
        sensitivity = params.sensitivity,
        entries = release.entries.len(),
        reliable = release.reliable_count(),
        "Released noised counts"
    );

    release
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::QualEps;
    use crate::noise::tests::Scripted;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn abc() -> Vec<GroundTruthEntry> {
        vec![
            GroundTruthEntry::new("A", 1, 100),
            GroundTruthEntry::new("B", 2, 100),
            GroundTruthEntry::new("C", 3, 10),
        ]
    }

    fn summary(release: &Release) -> Vec<(&str, u64, u32, bool)> {
        release
            .entries
            .iter()
            .map(|e| (e.truth.article_id.as_str(), e.noised_count, e.noised_rank, e.reliable))
            .collect()
    }

    #[test]
    fn test_golden_tie_broken_by_input_order() {
        // A: 100 + ln(1/0.4) = 100.92 -> 101
        // B: 100 + ln 2      = 100.69 -> 101
        // C: 10  + ln 10     = 12.30  -> 12
        let mut src = Scripted::new(&[0.3, 0.25, 0.45]);
        let release = release(&abc(), &PrivacyParameters::default(), &mut src);

        assert_eq!(
            summary(&release),
            vec![("A", 101, 1, true), ("B", 101, 2, true), ("C", 12, 3, true)]
        );
    }

    #[test]
    fn test_golden_reorders_and_clamps() {
        // A: 100 - 0.92 = 99.08 -> 99
        // B: 100 + 0.92 = 100.92 -> 101
        // C: 10 - 10.82 = -0.82 -> floor 0
        let mut src = Scripted::new(&[-0.3, 0.3, -0.49999]);
        let release = release(&abc(), &PrivacyParameters::default(), &mut src);

        assert_eq!(
            summary(&release),
            vec![("B", 101, 1, true), ("A", 99, 2, true), ("C", 0, 3, false)]
        );
        assert_eq!(release.reliable_count(), 2);
        // ground truth is carried through untouched
        assert_eq!(release.entries[1].truth, GroundTruthEntry::new("A", 1, 100));
    }

    #[test]
    fn test_request_level_metrics() {
        let mut src = Scripted::new(&[0.0, 0.0, 0.0]);
        let release = release(&abc(), &PrivacyParameters::default(), &mut src);

        let metrics = release.metrics;
        assert_eq!(metrics.params, PrivacyParameters::default());
        assert!((metrics.confidence_half_width - std::f64::consts::LN_2).abs() < 1e-12);
        assert_eq!(metrics.aggregation_threshold, 3.0);
        match metrics.qual_eps {
            QualEps::Bound(v) => assert!((v - 0.731_058_578_630_005).abs() < 1e-12),
            QualEps::Undefined => panic!("prior 0.5 is always defined"),
        }
    }

    #[test]
    fn test_golden_seeded_chacha() {
        let params = PrivacyParameters::default();

        // seed 0 draws: A 100 - 3.02, B 100 + 3.33, C 10 + 1.28
        let release0 = release(&abc(), &params, &mut ChaCha20Rng::seed_from_u64(0));
        assert_eq!(
            summary(&release0),
            vec![("B", 103, 1, true), ("A", 97, 2, true), ("C", 11, 3, true)]
        );

        // seed 42 draws: A 100 + 0.03, B 100 - 0.20, C 10 - 1.63; A and B tie
        let release42 = release(&abc(), &params, &mut ChaCha20Rng::seed_from_u64(42));
        assert_eq!(
            summary(&release42),
            vec![("A", 100, 1, true), ("B", 100, 2, true), ("C", 8, 3, true)]
        );
    }

    #[test]
    fn test_seeded_release_is_reproducible_and_complete() {
        let entries: Vec<_> = (0..50u32)
            .map(|i| GroundTruthEntry::new(format!("Article_{i}"), i + 1, 5000 / (i as u64 + 1)))
            .collect();
        let params = PrivacyParameters {
            epsilon: 0.1,
            floor: 5,
            ..PrivacyParameters::default()
        };

        let a = release(&entries, &params, &mut ChaCha20Rng::seed_from_u64(7));
        let b = release(&entries, &params, &mut ChaCha20Rng::seed_from_u64(7));
        assert_eq!(a.entries, b.entries);

        assert_eq!(a.entries.len(), 50);
        for (i, e) in a.entries.iter().enumerate() {
            assert_eq!(e.noised_rank, i as u32 + 1);
            assert!(e.noised_count >= 5);
        }
        for pair in a.entries.windows(2) {
            assert!(pair[0].noised_count >= pair[1].noised_count);
        }
    }

    #[test]
    fn test_empty_batch() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let release = release(&[], &PrivacyParameters::default(), &mut rng);
        assert!(release.entries.is_empty());
    }

    #[test]
    fn test_serialized_entry_shape() {
        let mut src = Scripted::new(&[0.3, 0.25, 0.45]);
        let release = release(&abc(), &PrivacyParameters::default(), &mut src);
        let json = serde_json::to_value(&release.entries[0]).unwrap();

        assert_eq!(json["article"], "A");
        assert_eq!(json["gt-rank"], 1);
        assert_eq!(json["gt-views"], 100);
        assert_eq!(json["dp-rank"], 1);
        assert_eq!(json["dp-views"], 101);
        assert_eq!(json["reliable"], true);
    }
}
