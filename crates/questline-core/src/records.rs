//! # Persisted Records
//!
//! Completion records and cooldown entries, keyed by quest id.
//!
//! Both ledgers are `BTreeMap`s so iteration order is deterministic. The two
//! are independent facts: a quest may be off cooldown yet fully completed.

use crate::primitives::{QuestId, Timestamp};
use crate::progression::PlayerStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// COMPLETION RECORDS
// =============================================================================

/// Created on the first successful verification of a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub completion_time: Timestamp,
    pub reflection_due_time: Timestamp,
    /// Flips false -> true once, on reflection submission.
    pub reflection_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_text: Option<String>,
    /// Denormalized quest title for the reflection prompt.
    pub title: String,
}

impl CompletionRecord {
    /// Whether the reflection is outstanding and due at `now`.
    #[must_use]
    pub fn is_reflection_due(&self, now: Timestamp) -> bool {
        !self.reflection_completed && self.reflection_due_time <= now
    }
}

/// All completion records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger(BTreeMap<QuestId, CompletionRecord>);

impl CompletionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &QuestId) -> Option<&CompletionRecord> {
        self.0.get(id)
    }

    /// Create or overwrite the record for a verified quest.
    pub fn record_verification(
        &mut self,
        id: &QuestId,
        title: &str,
        now: Timestamp,
        reflection_delay_ms: u64,
    ) {
        self.0.insert(
            id.clone(),
            CompletionRecord {
                completion_time: now,
                reflection_due_time: now.plus_millis(reflection_delay_ms),
                reflection_completed: false,
                reflection_text: None,
                title: title.to_string(),
            },
        );
    }

    /// A record exists and its reflection is sealed.
    #[must_use]
    pub fn is_fully_completed(&self, id: &QuestId) -> bool {
        self.0.get(id).is_some_and(|r| r.reflection_completed)
    }

    /// Outstanding reflections due at `now`, earliest due time first
    /// (ties broken by quest id).
    #[must_use]
    pub fn due_reflections(&self, now: Timestamp) -> Vec<(&QuestId, &CompletionRecord)> {
        let mut due: Vec<_> = self
            .0
            .iter()
            .filter(|(_, record)| record.is_reflection_due(now))
            .collect();
        due.sort_by(|(a_id, a), (b_id, b)| {
            a.reflection_due_time
                .cmp(&b.reflection_due_time)
                .then_with(|| a_id.cmp(b_id))
        });
        due
    }

    /// Mutable access for the reflection transition.
    pub fn get_mut(&mut self, id: &QuestId) -> Option<&mut CompletionRecord> {
        self.0.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestId, &CompletionRecord)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// COOLDOWNS
// =============================================================================

/// Quest id -> instant after which the quest may be offered again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CooldownLedger(BTreeMap<QuestId, Timestamp>);

impl CooldownLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expiry for `id`. An existing later expiry is kept, so an entry
    /// never moves backward.
    pub fn extend(&mut self, id: &QuestId, until: Timestamp) {
        let entry = self.0.entry(id.clone()).or_insert(until);
        if until > *entry {
            *entry = until;
        }
    }

    #[must_use]
    pub fn expiry(&self, id: &QuestId) -> Option<Timestamp> {
        self.0.get(id).copied()
    }

    /// The quest's cooldown has not yet lapsed at `now`.
    #[must_use]
    pub fn is_cooling(&self, id: &QuestId, now: Timestamp) -> bool {
        self.expiry(id).is_some_and(|until| now < until)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestId, &Timestamp)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Everything the engine persists, in one exportable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub stats: PlayerStats,
    pub completions: CompletionLedger,
    pub cooldowns: CooldownLedger,
}

// =============================================================================
// TESTS
// =============================================================================
