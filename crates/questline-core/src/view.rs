//! # View Module
//!
//! Presentation-ready snapshots of engine state.
//!
//! The host renders either the plain-text box (`to_text`) or the serialized
//! struct. Nothing here mutates the engine.

use crate::attestation::Attester;
use crate::lifecycle::{DueReflection, Event, Phase, QuestEngine};
use crate::primitives::{ProofType, QuestId, Timestamp};
use crate::progression::PlayerStats;
use crate::storage::KeyValueBackend;
use serde::{Deserialize, Serialize};

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
#[must_use]
pub fn format_countdown(millis: u64) -> String {
    let total = millis / 1_000;
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// What the quest board shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "board", rename_all = "snake_case")]
pub enum Board {
    Offered {
        quest_id: QuestId,
        title: String,
        description: String,
        objective: String,
        proof_type: ProofType,
        /// True once the player has begun the quest.
        in_progress: bool,
    },
    /// A verification was just applied; the next quest appears shortly.
    Verified,
    CoolingDown {
        remaining_ms: u64,
    },
    NoQuests,
}

/// Player stats with level progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub stats: PlayerStats,
    /// Integer percent toward the next level (100 at max level).
    pub progress_percent: u8,
    /// Cumulative experience needed for the next level, `None` at max level.
    pub next_threshold: Option<u64>,
}

/// Everything a status screen needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub stats: StatsView,
    pub board: Board,
    pub due_reflection: Option<DueReflection>,
}

impl StatusView {
    /// Snapshot the engine at `now`.
    #[must_use]
    pub fn capture<B: KeyValueBackend, A: Attester>(engine: &QuestEngine<B, A>, now: Timestamp) -> Self {
        let stats = engine.stats();
        let progress = engine.progress();
        let next_threshold = engine
            .thresholds()
            .threshold(engine.thresholds().level_for(stats.experience) + 1);

        let session = engine.session();
        let board = match (engine.offered_quest(), session.phase()) {
            (_, Phase::Verified { .. }) => Board::Verified,
            (Some(quest), _) => Board::Offered {
                quest_id: quest.id.clone(),
                title: quest.title.clone(),
                description: quest.description.clone(),
                objective: quest.objective.clone(),
                proof_type: quest.proof_type,
                in_progress: session.attempt_active(),
            },
            (None, _) => match engine.cooldown_remaining(now) {
                Some(remaining_ms) => Board::CoolingDown { remaining_ms },
                None => Board::NoQuests,
            },
        };

        Self {
            stats: StatsView {
                stats,
                progress_percent: progress.percent(),
                next_threshold,
            },
            board,
            due_reflection: engine.check_due_reflections(now),
        }
    }

    /// Format as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let stats = &self.stats.stats;

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str("│ SEEKER                              │\n");
        output.push_str(&format!("│ Level {}\n", stats.level));
        match self.stats.next_threshold {
            Some(next) => output.push_str(&format!(
                "│ Experience {} / {} ({}%)\n",
                stats.experience, next, self.stats.progress_percent
            )),
            None => output.push_str(&format!("│ Experience {} (max level)\n", stats.experience)),
        }
        output.push_str(&format!(
            "│ Quests verified {}\n",
            stats.verified_quest_count
        ));

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ QUEST                               │\n");
        match &self.board {
            Board::Offered {
                quest_id,
                title,
                description,
                objective,
                proof_type,
                in_progress,
            } => {
                output.push_str(&format!("│ {title} [{quest_id}]\n"));
                output.push_str(&format!("│ {description}\n"));
                output.push_str(&format!("│ Objective: {objective}\n"));
                output.push_str(&format!("│ Proof: {}\n", proof_type.label()));
                if *in_progress {
                    output.push_str("│ Status: in progress\n");
                }
            }
            Board::Verified => output.push_str("│ Quest verified. Seeking the next path...\n"),
            Board::CoolingDown { remaining_ms } => output.push_str(&format!(
                "│ Next quest available in {}\n",
                format_countdown(*remaining_ms)
            )),
            Board::NoQuests => output.push_str("│ No quests available. All paths walked.\n"),
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ REFLECTION                          │\n");
        match &self.due_reflection {
            Some(due) => output.push_str(&format!(
                "│ Reflect on \"{}\" [{}]\n",
                due.title, due.quest_id
            )),
            None => output.push_str("│ - (none due)                        │\n"),
        }

        output.push_str("└─────────────────────────────────────┘\n");
        output
    }
}

/// One human-readable line for an engine event.
#[must_use]
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::QuestOffered { quest_id, title } => format!("Quest offered: {title} [{quest_id}]"),
        Event::CoolingDown { remaining_ms, .. } => format!(
            "All quests cooling down. Next in {}",
            format_countdown(*remaining_ms)
        ),
        Event::NoQuestsAvailable => "No quests available.".to_string(),
        Event::ProofVerified {
            message,
            experience_awarded,
            ..
        } => format!("{message} +{experience_awarded} XP"),
        Event::ProofRejected {
            message, detail, ..
        } => match detail {
            Some(detail) => format!("{message} ({detail})"),
            None => message.clone(),
        },
        Event::LevelUp { level, .. } => format!("Ascension! You reached level {level}."),
        Event::WitnessConfirmed { code } => format!("Witness {code} confirmed your attempt."),
        Event::WitnessDeclined { code } => format!("Witness {code} did not confirm."),
        Event::ReflectionDue { quest_id, title, .. } => {
            format!("A reflection awaits for \"{title}\" [{quest_id}].")
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
