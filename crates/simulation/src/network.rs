//! Simulated latencies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

/// Latency and seeding configuration for a simulated run.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Per-hop message delivery delay, sampled uniformly.
    pub latency_ms: Range<u64>,
    /// Duration of a verification task, sampled uniformly.
    pub verification_ms: Range<u64>,
    /// Seed for all latency sampling.
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            latency_ms: 5..50,
            verification_ms: 1..10,
            seed: 42,
        }
    }
}

/// Deterministic latency source.
///
/// Every delay in a run is drawn from one seeded generator, so the full
/// delivery schedule is a function of the config alone.
pub struct SimulatedNetwork {
    config: NetworkConfig,
    rng: ChaCha8Rng,
}

impl SimulatedNetwork {
    pub fn new(config: NetworkConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Sample the delivery delay for one message.
    pub fn message_delay(&mut self) -> u64 {
        Self::sample(&mut self.rng, &self.config.latency_ms)
    }

    /// Sample the duration of one verification task.
    pub fn verification_delay(&mut self) -> u64 {
        Self::sample(&mut self.rng, &self.config.verification_ms)
    }

    fn sample(rng: &mut ChaCha8Rng, range: &Range<u64>) -> u64 {
        if range.is_empty() {
            range.start
        } else {
            rng.gen_range(range.clone())
        }
    }
}
