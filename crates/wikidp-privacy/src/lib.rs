//! Privacy engine — Laplace noise for counts and the quality metrics around it.
//!
//! The engine is a set of pure functions composed as noise, then rank, then
//! classify. Randomness enters only through a caller-supplied
//! [`UniformSource`], so a seeded generator makes every step reproducible.

pub mod belief;
pub mod noise;
pub mod pipeline;
pub mod rank;
pub mod reliability;
pub mod types;

pub use belief::{qual_eps, QualEps};
pub use noise::{laplace_sample, noise_counts, round_count, UniformSource};
pub use pipeline::release;
pub use rank::rerank;
pub use reliability::{aggregation_threshold, confidence_half_width, is_reliable};
pub use types::*;
