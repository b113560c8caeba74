//! # Quest Lifecycle Controller
//!
//! Orchestrates one quest-offering cycle:
//!
//! ```text
//! NoQuestOffered ──select──► QuestOffered ──begin──► ProofPending ──tick──► Verified ──tick──► (select)
//!       ▲                         │                      ▲     │
//!       └────────cancel───────────┘                      │     └──tick──► Rejected
//!                                                        └───────submit (retry)────┘
//! ```
//!
//! The controller owns the [`ActiveSession`] and reads/writes persisted
//! state through a [`JsonStore`]. It never reads a clock: every operation
//! takes `now`, and the host calls [`QuestEngine::tick`] to drive the
//! verification delay, witness responses, post-verification re-selection,
//! cooldown expiry and the due-reflection poll.

mod error;
mod events;
mod selection;
mod session;

pub use error::LifecycleError;
pub use events::{DueReflection, Event, ProofReceipt, ReflectionOutcome};
pub use selection::{Selection, select_next_quest};
pub use session::{ActiveSession, PendingSubmission, Phase};

use crate::attestation::{AttestationStatus, Attester, WitnessState};
use crate::catalog::{QuestCatalog, QuestDefinition};
use crate::config::{ConfigError, EngineConfig};
use crate::primitives::{Proof, QuestId, Timestamp};
use crate::progression::{PlayerStats, Progress, ThresholdTable, award_experience, progress};
use crate::records::{CompletionLedger, CooldownLedger, Profile};
use crate::storage::{COMPLETIONS_KEY, COOLDOWNS_KEY, JsonStore, KeyValueBackend, STATS_KEY};
use crate::verification::{VerificationRules, verify};
use tracing::{debug, info};

/// Notice returned when the player closes a reflection prompt unanswered.
pub const REFLECTION_POSTPONED: &str = "Deeper resonance postponed. Your insight awaits.";

/// The quest lifecycle engine.
pub struct QuestEngine<B: KeyValueBackend, A: Attester> {
    catalog: QuestCatalog,
    config: EngineConfig,
    thresholds: ThresholdTable,
    rules: VerificationRules,
    store: JsonStore<B>,
    attester: A,
    session: ActiveSession,
}

impl<B: KeyValueBackend, A: Attester> QuestEngine<B, A> {
    /// Assemble an engine. Fails only on an invalid configuration.
    pub fn new(
        catalog: QuestCatalog,
        config: EngineConfig,
        backend: B,
        attester: A,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let thresholds = config.threshold_table()?;
        let rules = config.verification_rules();
        Ok(Self {
            catalog,
            config,
            thresholds,
            rules,
            store: JsonStore::new(backend),
            attester,
            session: ActiveSession::default(),
        })
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn session(&self) -> &ActiveSession {
        &self.session
    }

    pub fn store(&self) -> &JsonStore<B> {
        &self.store
    }

    pub fn attester(&self) -> &A {
        &self.attester
    }

    pub fn stats(&self) -> PlayerStats {
        self.store.get_or_default(STATS_KEY)
    }

    pub fn progress(&self) -> Progress {
        progress(&self.stats(), &self.thresholds)
    }

    pub fn completions(&self) -> CompletionLedger {
        self.store.get_or_default(COMPLETIONS_KEY)
    }

    pub fn cooldowns(&self) -> CooldownLedger {
        self.store.get_or_default(COOLDOWNS_KEY)
    }

    /// All persisted state in one value.
    pub fn profile(&self) -> Profile {
        Profile {
            stats: self.stats(),
            completions: self.completions(),
            cooldowns: self.cooldowns(),
        }
    }

    /// The quest currently on the board.
    pub fn offered_quest(&self) -> Option<&QuestDefinition> {
        self.session
            .offered
            .as_ref()
            .and_then(|id| self.catalog.get(id))
    }

    /// Milliseconds left on the running cooldown countdown.
    pub fn cooldown_remaining(&self, now: Timestamp) -> Option<u64> {
        self.session
            .cooldown_until
            .map(|until| now.millis_until(until))
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Initial pass: surface a due reflection, then select a quest.
    pub fn start(&mut self, now: Timestamp) -> Vec<Event> {
        let mut events = Vec::new();
        self.poll_reflections(now, &mut events);
        let selection = self.select_next_quest(now);
        events.push(self.selection_event(&selection, now));
        events
    }

    /// Compute the next quest and put it on the board.
    ///
    /// While a submission is being verified the session is left alone and
    /// the selection is only reported.
    pub fn select_next_quest(&mut self, now: Timestamp) -> Selection {
        let selection = select_next_quest(
            &self.catalog,
            &self.completions(),
            &self.cooldowns(),
            now,
        );
        debug!(?selection, "quest selection");

        if !self.session.submission_in_flight() {
            self.apply_selection(&selection);
        }
        selection
    }

    fn apply_selection(&mut self, selection: &Selection) {
        self.clear_attempt();
        match selection {
            Selection::Offered { quest_id } => {
                self.session.phase = Phase::QuestOffered;
                self.session.offered = Some(quest_id.clone());
                self.session.cooldown_until = None;
            }
            Selection::CoolingDown { until } => {
                self.session.phase = Phase::NoQuestOffered;
                self.session.offered = None;
                self.session.cooldown_until = Some(*until);
            }
            Selection::Exhausted => {
                self.session.phase = Phase::NoQuestOffered;
                self.session.offered = None;
                self.session.cooldown_until = None;
            }
        }
    }

    /// Drop the current attempt, withdrawing any unanswered witness request.
    fn clear_attempt(&mut self) {
        if let WitnessState::Pending { code, .. } = &self.session.witness {
            debug!(code = %code, "withdrawing witness request");
            self.attester.cancel(code);
        }
        self.session.clear_attempt();
    }

    fn selection_event(&self, selection: &Selection, now: Timestamp) -> Event {
        match selection {
            Selection::Offered { quest_id } => Event::QuestOffered {
                quest_id: quest_id.clone(),
                title: self
                    .catalog
                    .get(quest_id)
                    .map(|q| q.title.clone())
                    .unwrap_or_default(),
            },
            Selection::CoolingDown { until } => Event::CoolingDown {
                until: *until,
                remaining_ms: now.millis_until(*until),
            },
            Selection::Exhausted => Event::NoQuestsAvailable,
        }
    }

    // =========================================================================
    // QUEST ATTEMPT
    // =========================================================================

    /// Start the offered quest. The start instant is recorded but gates
    /// nothing.
    pub fn begin_quest(
        &mut self,
        quest_id: &QuestId,
        now: Timestamp,
    ) -> Result<&QuestDefinition, LifecycleError> {
        if self.session.submission_in_flight() {
            return Err(LifecycleError::SubmissionInFlight);
        }
        let Some(offered) = self.session.offered.clone() else {
            return Err(LifecycleError::NoQuestOffered);
        };
        if &offered != quest_id {
            return Err(LifecycleError::QuestMismatch {
                offered,
                requested: quest_id.clone(),
            });
        }
        if self.session.attempt_active() {
            return Err(LifecycleError::QuestInProgress(offered));
        }

        info!(quest = %offered, "beginning quest");
        self.clear_attempt();
        self.session.started_at = Some(now);
        self.session.phase = Phase::ProofPending;

        self.catalog
            .get(&offered)
            .ok_or(LifecycleError::NoQuestOffered)
    }

    /// Abandon the current attempt. No penalty, no cooldown.
    pub fn cancel_quest(&mut self, now: Timestamp) -> Result<Selection, LifecycleError> {
        if self.session.submission_in_flight() {
            return Err(LifecycleError::SubmissionInFlight);
        }
        info!(quest = ?self.session.offered, "quest aborted");
        self.clear_attempt();
        Ok(self.select_next_quest(now))
    }

    /// Submit a proof for the begun quest.
    ///
    /// The verdict is computed now and applied by [`tick`](Self::tick) once
    /// the verification delay has elapsed. Until then further submissions are
    /// refused.
    pub fn submit_proof(
        &mut self,
        proof: &Proof,
        now: Timestamp,
    ) -> Result<ProofReceipt, LifecycleError> {
        if self.session.submission_in_flight() {
            return Err(LifecycleError::SubmissionInFlight);
        }
        if !self.session.attempt_active() {
            return Err(LifecycleError::NotStarted);
        }
        let quest = self
            .session
            .offered
            .as_ref()
            .and_then(|id| self.catalog.get(id))
            .ok_or(LifecycleError::NoQuestOffered)?;

        let verdict = verify(quest, proof, self.session.witness.is_confirmed(), &self.rules);
        let resolves_at = now.plus_millis(self.config.verification_delay_ms);
        let receipt = ProofReceipt {
            quest_id: quest.id.clone(),
            resolves_at,
        };

        debug!(quest = %quest.id, passed = verdict.passed, "proof transmitted");
        self.session.submission = Some(PendingSubmission {
            quest_id: quest.id.clone(),
            title: quest.title.clone(),
            experience_reward: quest.experience_reward,
            verdict,
            resolves_at,
        });
        self.session.phase = Phase::ProofPending;
        Ok(receipt)
    }

    /// Ask a witness to confirm the current attempt.
    ///
    /// A confirmation makes the next submission pass without any content
    /// check. This is a trust bypass.
    pub fn request_peer_confirmation(
        &mut self,
        code: &str,
        now: Timestamp,
    ) -> Result<(), LifecycleError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LifecycleError::EmptyWitnessCode);
        }
        if self.session.witness.is_pending() {
            return Err(LifecycleError::WitnessPending);
        }
        if !self.session.attempt_active() {
            return Err(LifecycleError::NotStarted);
        }

        info!(code = %code, "requesting witness confirmation");
        self.attester.request(code, now);
        self.session.witness = WitnessState::Pending {
            code: code.to_string(),
            requested_at: now,
        };
        Ok(())
    }

    // =========================================================================
    // REFLECTIONS
    // =========================================================================

    /// The outstanding reflection that is due first, if any.
    ///
    /// Pure read: repeated calls return the same reflection until it is
    /// sealed.
    pub fn check_due_reflections(&self, now: Timestamp) -> Option<DueReflection> {
        self.completions()
            .due_reflections(now)
            .into_iter()
            .next()
            .map(|(id, record)| DueReflection {
                quest_id: id.clone(),
                title: record.title.clone(),
                due_at: record.reflection_due_time,
            })
    }

    /// The player closed the prompt. It returns on the next poll.
    pub fn dismiss_reflection(&mut self, now: Timestamp) -> &'static str {
        self.session.next_reflection_poll = now.plus_millis(self.config.reflection_poll_ms);
        REFLECTION_POSTPONED
    }

    /// Seal a reflection and award the bonus.
    pub fn submit_reflection(
        &mut self,
        quest_id: &QuestId,
        text: &str,
        now: Timestamp,
    ) -> Result<ReflectionOutcome, LifecycleError> {
        let text = text.trim();
        let mut completions = self.completions();
        let Some(record) = completions.get_mut(quest_id) else {
            return Err(LifecycleError::UnknownQuest(quest_id.clone()));
        };
        if record.reflection_completed {
            return Err(LifecycleError::ReflectionSealed(quest_id.clone()));
        }
        let actual = text.chars().count();
        let required = self.config.reflection_min_chars;
        if actual < required {
            return Err(LifecycleError::ReflectionTooShort { required, actual });
        }

        record.reflection_completed = true;
        record.reflection_text = Some(text.to_string());
        info!(quest = %quest_id, title = %record.title, "reflection sealed");
        self.store.set(COMPLETIONS_KEY, &completions);

        let award = award_experience(&self.stats(), self.config.reflection_bonus, &self.thresholds);
        self.store.set(STATS_KEY, &award.stats);
        if award.leveled_up() {
            info!(level = award.stats.level, "level up");
        }

        let selection = select_next_quest(&self.catalog, &completions, &self.cooldowns(), now);
        if !self.session.attempt_active() && !self.session.submission_in_flight() {
            self.apply_selection(&selection);
        }

        Ok(ReflectionOutcome {
            quest_id: quest_id.clone(),
            stats: award.stats,
            levels_gained: award.levels_gained,
            selection,
            next_due: self.check_due_reflections(now),
        })
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advance every timer to `now` and report what happened.
    pub fn tick(&mut self, now: Timestamp) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(pending) = self.session.submission.take_if(|s| s.resolves_at <= now) {
            self.resolve_submission(pending, now, &mut events);
        }

        self.poll_witness(now, &mut events);

        let reselect = match self.session.phase {
            Phase::Verified { reselect_at } => reselect_at <= now,
            Phase::NoQuestOffered => self.session.cooldown_until.is_some_and(|u| u <= now),
            _ => false,
        };
        if reselect {
            let selection = self.select_next_quest(now);
            events.push(self.selection_event(&selection, now));
        }

        if self.session.next_reflection_poll <= now {
            self.poll_reflections(now, &mut events);
        }

        events
    }

    fn resolve_submission(
        &mut self,
        pending: PendingSubmission,
        now: Timestamp,
        events: &mut Vec<Event>,
    ) {
        let PendingSubmission {
            quest_id,
            title,
            experience_reward,
            verdict,
            ..
        } = pending;

        if !verdict.passed {
            info!(quest = %quest_id, reason = ?verdict.reason, "quest failed");
            self.session.phase = Phase::Rejected;
            events.push(Event::ProofRejected {
                quest_id,
                reason: verdict.reason,
                message: verdict.message,
                detail: verdict.detail,
            });
            return;
        }

        info!(quest = %quest_id, witnessed = verdict.witnessed, "quest verified");

        let mut stats = self.stats();
        stats.verified_quest_count = stats.verified_quest_count.saturating_add(1);
        let award = award_experience(&stats, experience_reward, &self.thresholds);
        self.store.set(STATS_KEY, &award.stats);

        let mut completions = self.completions();
        completions.record_verification(&quest_id, &title, now, self.config.reflection_delay_ms);
        self.store.set(COMPLETIONS_KEY, &completions);

        let mut cooldowns = self.cooldowns();
        cooldowns.extend(&quest_id, now.plus_millis(self.config.cooldown_ms));
        self.store.set(COOLDOWNS_KEY, &cooldowns);

        self.clear_attempt();
        self.session.offered = None;
        self.session.cooldown_until = None;
        self.session.phase = Phase::Verified {
            reselect_at: now.plus_millis(self.config.display_delay_ms),
        };

        events.push(Event::ProofVerified {
            quest_id,
            message: verdict.message,
            experience_awarded: experience_reward,
            witnessed: verdict.witnessed,
        });
        if award.leveled_up() {
            info!(level = award.stats.level, gained = award.levels_gained, "level up");
            events.push(Event::LevelUp {
                level: award.stats.level,
                levels_gained: award.levels_gained,
            });
        }
    }

    fn poll_witness(&mut self, now: Timestamp, events: &mut Vec<Event>) {
        let WitnessState::Pending { code, .. } = &self.session.witness else {
            return;
        };
        let code = code.clone();
        match self.attester.poll(&code, now) {
            AttestationStatus::Pending => {}
            AttestationStatus::Confirmed => {
                info!(code = %code, "witness confirmed");
                self.session.witness = WitnessState::Confirmed { code: code.clone() };
                events.push(Event::WitnessConfirmed { code });
            }
            AttestationStatus::Declined => {
                info!(code = %code, "witness unresponsive or declined");
                self.session.witness = WitnessState::Declined { code: code.clone() };
                events.push(Event::WitnessDeclined { code });
            }
        }
    }

    fn poll_reflections(&mut self, now: Timestamp, events: &mut Vec<Event>) {
        self.session.next_reflection_poll = now.plus_millis(self.config.reflection_poll_ms);
        if let Some(due) = self.check_due_reflections(now) {
            debug!(quest = %due.quest_id, "reflection due");
            events.push(due.into());
        }
    }
}
