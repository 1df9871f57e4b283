//! Reliability decision: publish a noised count, or suppress it until it can
//! be aggregated further.
//!
//! The check uses only the noised value and the public parameters, so it
//! costs no privacy budget. Based on the Laplace confidence interval from
//! Wilson et al., "Differentially Private SQL with Bounded User
//! Contribution" (arXiv:2009.01265, section 4).

use wikidp_core::PrivacyParameters;

/// Half-width `ci` of the two-tailed `1 - alpha` interval around a noised count.
///
/// The interval is symmetric: `[noised - ci, noised + ci]`.
pub fn confidence_half_width(params: &PrivacyParameters) -> f64 {
    let rank = params.confidence_alpha / 2.0;
    (params.scale() * (2.0 * rank).ln()).abs()
}

/// Whether `noised_count` is within `tolerance_fraction` of the truth with
/// the configured confidence. A zero count is never reliable.
pub fn is_reliable(noised_count: u64, params: &PrivacyParameters) -> bool {
    if noised_count == 0 {
        return false;
    }
    confidence_half_width(params) <= params.tolerance_fraction * noised_count as f64
}

/// Smallest noised count, rounded up, at which the check starts to pass.
pub fn aggregation_threshold(params: &PrivacyParameters) -> f64 {
    (confidence_half_width(params) / params.tolerance_fraction).ceil()
}
