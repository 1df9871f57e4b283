//! WikiDP Core — configuration, error types, language codes, privacy parameters.

pub mod config;
pub mod error;
pub mod languages;
pub mod params;

pub use config::WikidpConfig;
pub use error::{Error, Result};
pub use params::{PrivacyParameters, QueryArgs, RequestParams};
