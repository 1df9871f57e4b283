//! Shared application state.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use wikidp_core::WikidpConfig;
use wikidp_pageviews::GroundTruthSource;

/// Read-only state shared by all route handlers. Nothing here changes after startup.
pub struct AppState {
    pub config: WikidpConfig,
    pub source: Arc<dyn GroundTruthSource>,
}

impl AppState {
    pub fn new(config: WikidpConfig, source: Arc<dyn GroundTruthSource>) -> Self {
        Self { config, source }
    }

    /// A fresh noise generator for one request.
    pub fn noise_rng(&self) -> ChaCha20Rng {
        match self.config.noise_seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}
