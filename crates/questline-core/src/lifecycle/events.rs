//! Values handed back to the host.

use super::selection::Selection;
use crate::primitives::{QuestId, Timestamp};
use crate::progression::PlayerStats;
use crate::verification::ReasonCode;
use serde::{Deserialize, Serialize};

/// Something the host should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    QuestOffered {
        quest_id: QuestId,
        title: String,
    },
    CoolingDown {
        until: Timestamp,
        remaining_ms: u64,
    },
    NoQuestsAvailable,
    ProofVerified {
        quest_id: QuestId,
        message: String,
        experience_awarded: u64,
        witnessed: bool,
    },
    ProofRejected {
        quest_id: QuestId,
        reason: Option<ReasonCode>,
        message: String,
        detail: Option<String>,
    },
    /// Fired once per award, however many levels were crossed.
    LevelUp {
        level: u32,
        levels_gained: u32,
    },
    WitnessConfirmed {
        code: String,
    },
    WitnessDeclined {
        code: String,
    },
    ReflectionDue {
        quest_id: QuestId,
        title: String,
        due_at: Timestamp,
    },
}

/// A reflection waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueReflection {
    pub quest_id: QuestId,
    pub title: String,
    pub due_at: Timestamp,
}

impl From<DueReflection> for Event {
    fn from(due: DueReflection) -> Self {
        Event::ReflectionDue {
            quest_id: due.quest_id,
            title: due.title,
            due_at: due.due_at,
        }
    }
}

/// Acknowledgement of a submitted proof; the verdict lands at `resolves_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofReceipt {
    pub quest_id: QuestId,
    pub resolves_at: Timestamp,
}

/// Result of sealing a reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionOutcome {
    pub quest_id: QuestId,
    pub stats: PlayerStats,
    pub levels_gained: u32,
    /// Selection computed right after sealing.
    pub selection: Selection,
    /// The next outstanding reflection, if any is already due.
    pub next_due: Option<DueReflection>,
}
