//! Transient per-run state. Never persisted.

use crate::attestation::WitnessState;
use crate::primitives::{QuestId, Timestamp};
use crate::verification::Verdict;

/// Where the current quest-offering cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing offered: cooling down, exhausted, or not yet selected.
    #[default]
    NoQuestOffered,
    /// A quest is on the board, not yet begun.
    QuestOffered,
    /// The player has begun; proof may be submitted.
    ProofPending,
    /// Last submission passed; re-selection follows at `reselect_at`.
    Verified { reselect_at: Timestamp },
    /// Last submission failed; the player may retry immediately.
    Rejected,
}

/// A verified-but-not-yet-applied submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub quest_id: QuestId,
    pub title: String,
    pub experience_reward: u64,
    pub verdict: Verdict,
    pub resolves_at: Timestamp,
}

/// The active session owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct ActiveSession {
    pub(crate) phase: Phase,
    pub(crate) offered: Option<QuestId>,
    pub(crate) started_at: Option<Timestamp>,
    pub(crate) witness: WitnessState,
    pub(crate) submission: Option<PendingSubmission>,
    /// Running cooldown countdown; replaced whenever selection changes.
    pub(crate) cooldown_until: Option<Timestamp>,
    pub(crate) next_reflection_poll: Timestamp,
}

impl ActiveSession {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn offered(&self) -> Option<&QuestId> {
        self.offered.as_ref()
    }

    /// When the current attempt began. Informational only.
    #[must_use]
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    #[must_use]
    pub fn witness(&self) -> &WitnessState {
        &self.witness
    }

    #[must_use]
    pub fn submission_in_flight(&self) -> bool {
        self.submission.is_some()
    }

    #[must_use]
    pub fn cooldown_until(&self) -> Option<Timestamp> {
        self.cooldown_until
    }

    /// Begun and awaiting (or retrying) a proof.
    #[must_use]
    pub fn attempt_active(&self) -> bool {
        matches!(self.phase, Phase::ProofPending | Phase::Rejected)
    }

    /// Drop everything tied to the current attempt.
    pub(crate) fn clear_attempt(&mut self) {
        self.started_at = None;
        self.witness = WitnessState::None;
    }
}
