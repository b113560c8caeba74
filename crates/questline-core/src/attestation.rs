//! # Witness Attestation
//!
//! Peer confirmation enters the engine only through the [`Attester`] trait.
//!
//! A confirmed attestation is a trust bypass, not a stronger check: the
//! next proof submission for the current quest attempt skips every content
//! check. Anyone replacing the mock witness with genuine peer attestation
//! implements this trait and nothing else changes.

use crate::primitives::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer to a poll for a witness code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationStatus {
    Pending,
    Confirmed,
    Declined,
}

/// External attester capability.
pub trait Attester {
    /// Ask the witness identified by `code` to confirm the current attempt.
    fn request(&mut self, code: &str, now: Timestamp);

    /// Check on a previously requested code.
    ///
    /// Codes that were never requested report `Declined`.
    fn poll(&mut self, code: &str, now: Timestamp) -> AttestationStatus;

    /// Forget an unresolved request whose attempt was abandoned.
    fn cancel(&mut self, code: &str);
}

/// Witness request state for the active quest attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WitnessState {
    #[default]
    None,
    Pending {
        code: String,
        requested_at: Timestamp,
    },
    Confirmed {
        code: String,
    },
    Declined {
        code: String,
    },
}

impl WitnessState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

// =============================================================================
// SCHEDULED ATTESTER
// =============================================================================

/// Deterministic attester: every request resolves after a fixed delay with
/// a fixed outcome.
#[derive(Debug, Clone)]
pub struct ScheduledAttester {
    delay_ms: u64,
    confirms: bool,
    requests: BTreeMap<String, Timestamp>,
}

impl ScheduledAttester {
    #[must_use]
    pub fn new(delay_ms: u64, confirms: bool) -> Self {
        Self {
            delay_ms,
            confirms,
            requests: BTreeMap::new(),
        }
    }

    /// Confirms every request after `delay_ms`.
    #[must_use]
    pub fn confirming(delay_ms: u64) -> Self {
        Self::new(delay_ms, true)
    }

    /// Declines every request after `delay_ms`.
    #[must_use]
    pub fn declining(delay_ms: u64) -> Self {
        Self::new(delay_ms, false)
    }

    /// Requests still waiting for an answer.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.requests.len()
    }
}

impl Attester for ScheduledAttester {
    fn request(&mut self, code: &str, now: Timestamp) {
        self.requests
            .insert(code.to_string(), now.plus_millis(self.delay_ms));
    }

    fn poll(&mut self, code: &str, now: Timestamp) -> AttestationStatus {
        match self.requests.get(code) {
            None => AttestationStatus::Declined,
            Some(&ready_at) if now < ready_at => AttestationStatus::Pending,
            Some(_) => {
                self.requests.remove(code);
                if self.confirms {
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

// =============================================================================
// TESTS
// =============================================================================
