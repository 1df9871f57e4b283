//! Qualitative reading of epsilon as an adversary's belief update.
//!
//! If someone believed an individual was in the data with probability `p`,
//! then after seeing the output they can be at most `qual_eps(eps, p)`
//! certain (assuming the sensitivity is correct). For eps = 1 and p = 0.5
//! that moves them from 50% to at most 73.1%.

use serde::{Serialize, Serializer};

/// Default prior: complete uncertainty.
pub const DEFAULT_PRIOR: f64 = 0.5;

/// Posterior belief bound, or `Undefined` when the prior is a certainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualEps {
    Bound(f64),
    Undefined,
}

impl QualEps {
    pub fn value(&self) -> Option<f64> {
        match self {
            QualEps::Bound(v) => Some(*v),
            QualEps::Undefined => None,
        }
    }
}

impl Serialize for QualEps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QualEps::Bound(v) => serializer.serialize_f64(*v),
            QualEps::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

/// `posterior = e^eps * p / (1 + (e^eps - 1) * p)` for `0 < p < 1`.
///
/// Evaluated as `p / (p + (1 - p) * e^-eps)`, which stays finite for any
/// positive epsilon.
pub fn qual_eps(epsilon: f64, prior: f64) -> QualEps {
    if !(prior > 0.0 && prior < 1.0) {
        return QualEps::Undefined;
    }
    QualEps::Bound(prior / (prior + (1.0 - prior) * (-epsilon).exp()))
}
