//! Request parameters and the permissive validation applied at the boundary.
//!
//! Every parameter is validated on its own. A missing, unparsable, or
//! out-of-range value is replaced by its documented default and logged;
//! it never fails the request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::languages::{is_valid_language, DEFAULT_LANGUAGE};

pub const DEFAULT_FLOOR: u64 = 0;
pub const DEFAULT_EPSILON: f64 = 1.0;
pub const DEFAULT_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_CONFIDENCE_ALPHA: f64 = 0.5;
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.25;

/// Parameters of the Laplace mechanism and the reliability decision.
///
/// Construct through [`QueryArgs::validate`] or [`Default`]; the engine
/// assumes every field is already in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrivacyParameters {
    /// Privacy-loss budget, finite and > 0.
    pub epsilon: f64,
    /// L1 sensitivity of the count, finite and > 0.
    pub sensitivity: f64,
    /// Minimum value a noised count may take.
    pub floor: u64,
    /// Two-tailed confidence level for the reliability check, in (0, 1).
    pub confidence_alpha: f64,
    /// Acceptable half-width as a fraction of the noised count, > 0.
    pub tolerance_fraction: f64,
}

impl Default for PrivacyParameters {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            sensitivity: DEFAULT_SENSITIVITY,
            floor: DEFAULT_FLOOR,
            confidence_alpha: DEFAULT_CONFIDENCE_ALPHA,
            tolerance_fraction: DEFAULT_TOLERANCE_FRACTION,
        }
    }
}

impl PrivacyParameters {
    /// Laplace scale `b = sensitivity / epsilon`.
    pub fn scale(&self) -> f64 {
        self.sensitivity / self.epsilon
    }
}

/// Validated parameters for one pageviews request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub lang: String,
    pub privacy: PrivacyParameters,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANGUAGE.to_string(),
            privacy: PrivacyParameters::default(),
        }
    }
}

/// Raw query-string arguments, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryArgs {
    pub lang: Option<String>,
    pub mincount: Option<String>,
    pub eps: Option<String>,
    pub sensitivity: Option<String>,
    pub alpha: Option<String>,
    #[serde(rename = "propWithin")]
    pub prop_within: Option<String>,
}

impl QueryArgs {
    /// Collect arguments from raw key/value pairs. The first occurrence of a
    /// key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut args = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "lang" => &mut args.lang,
                "mincount" => &mut args.mincount,
                "eps" => &mut args.eps,
                "sensitivity" => &mut args.sensitivity,
                "alpha" => &mut args.alpha,
                "propWithin" => &mut args.prop_within,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        args
    }

    /// Validate each argument independently, substituting defaults.
    pub fn validate(&self) -> RequestParams {
        let lang = match self.lang.as_deref().map(|l| l.trim().to_lowercase()) {
            Some(l) if is_valid_language(&l) => l,
            Some(l) => {
                debug!(lang = %l, "Unknown language, using default");
                DEFAULT_LANGUAGE.to_string()
            }
            None => DEFAULT_LANGUAGE.to_string(),
        };

        let floor = parse_or_default("mincount", self.mincount.as_deref(), DEFAULT_FLOOR, |_| true);
        let epsilon = parse_or_default("eps", self.eps.as_deref(), DEFAULT_EPSILON, positive_finite);
        let sensitivity = parse_or_default(
            "sensitivity",
            self.sensitivity.as_deref(),
            DEFAULT_SENSITIVITY,
            positive_finite,
        );
        // A subnormal epsilon passes the range check but overflows the scale.
        let epsilon = if (sensitivity / epsilon).is_finite() {
            epsilon
        } else {
            debug!(epsilon, sensitivity, "Laplace scale overflows, using default epsilon");
            DEFAULT_EPSILON
        };
        let confidence_alpha = parse_or_default(
            "alpha",
            self.alpha.as_deref(),
            DEFAULT_CONFIDENCE_ALPHA,
            |a: &f64| *a > 0.0 && *a < 1.0,
        );
        let tolerance_fraction = parse_or_default(
            "propWithin",
            self.prop_within.as_deref(),
            DEFAULT_TOLERANCE_FRACTION,
            positive_finite,
        );

        RequestParams {
            lang,
            privacy: PrivacyParameters {
                epsilon,
                sensitivity,
                floor,
                confidence_alpha,
                tolerance_fraction,
            },
        }
    }
}

fn positive_finite(x: &f64) -> bool {
    x.is_finite() && *x > 0.0
}

fn parse_or_default<T, F>(name: &str, raw: Option<&str>, default: T, valid: F) -> T
where
    T: std::str::FromStr,
    F: Fn(&T) -> bool,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if valid(&v) => v,
        _ => {
            debug!(param = name, value = raw, "Rejected parameter, using default");
            default
        }
    }
}
