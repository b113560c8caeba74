//! Random mock witness.
//!
//! Stands in for a real peer: each request resolves after a uniformly drawn
//! delay inside the configured window and confirms with the configured
//! probability.

use questline_core::{AttestationStatus, Attester, EngineConfig, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

/// A witness request whose answer is already drawn.
#[derive(Debug, Clone, Copy)]
struct Scheduled {
    ready_at: Timestamp,
    confirmed: bool,
}

#[derive(Debug)]
pub struct RandomWitness {
    rng: StdRng,
    min_delay_ms: u64,
    max_delay_ms: u64,
    success_percent: u8,
    requests: BTreeMap<String, Scheduled>,
}

impl RandomWitness {
    /// Seeded from OS entropy.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible draws.
    pub fn seeded(config: &EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &EngineConfig, rng: StdRng) -> Self {
        Self {
            rng,
            min_delay_ms: config.witness_min_delay_ms,
            max_delay_ms: config.witness_max_delay_ms.max(config.witness_min_delay_ms),
            success_percent: config.witness_success_percent.min(100),
            requests: BTreeMap::new(),
        }
    }

    /// Latest instant a request made at `now` can resolve.
    pub fn deadline(&self, now: Timestamp) -> Timestamp {
        now.plus_millis(self.max_delay_ms)
    }
}

impl Attester for RandomWitness {
    fn request(&mut self, code: &str, now: Timestamp) {
        let delay = self.rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        let confirmed = self.rng.gen_range(0..100u8) < self.success_percent;
        debug!(code, delay, confirmed, "witness answer drawn");
        self.requests.insert(
            code.to_string(),
            Scheduled {
                ready_at: now.plus_millis(delay),
                confirmed,
            },
        );
    }

    fn poll(&mut self, code: &str, now: Timestamp) -> AttestationStatus {
        match self.requests.get(code).copied() {
            None => AttestationStatus::Declined,
            Some(scheduled) if now < scheduled.ready_at => AttestationStatus::Pending,
            Some(scheduled) => {
                self.requests.remove(code);
                if scheduled.confirmed {
                    AttestationStatus::Confirmed
                } else {
                    AttestationStatus::Declined
                }
            }
        }
    }

    fn cancel(&mut self, code: &str) {
        self.requests.remove(code);
    }
}
