//! # Questline Core
//!
//! The deterministic engine behind Questline, a gamified habit tracker.
//!
//! A quest is offered, the player submits a proof, a local heuristic decides
//! whether the proof resonates, experience and levels are awarded, the quest
//! goes on cooldown, and a reflection becomes due some hours later.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Host (apps/questline): clock, randomness, rendering, input   │
//! └───────────────▲──────────────────────────────┬───────────────┘
//!                 │ Events / views               │ intents + now
//! ┌───────────────┴──────────────────────────────▼───────────────┐
//! │ lifecycle::QuestEngine                                       │
//! │   ├── verification::verify      (pure)                       │
//! │   ├── progression::award_experience / progress (pure)        │
//! │   ├── attestation::Attester     (pluggable witness)          │
//! │   └── storage::JsonStore<B>     (best-effort persistence)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never reads a clock. Every operation takes `now` and the host
//! drives timers through [`lifecycle::QuestEngine::tick`].

pub mod attestation;
pub mod catalog;
pub mod config;
pub mod formats;
pub mod lifecycle;
pub mod primitives;
pub mod progression;
pub mod records;
pub mod storage;
pub mod verification;
pub mod view;

pub use attestation::{AttestationStatus, Attester, ScheduledAttester, WitnessState};
pub use catalog::{CatalogError, QuestCatalog, QuestDefinition};
pub use config::{ConfigError, EngineConfig};
pub use lifecycle::{
    DueReflection, Event, LifecycleError, Phase, ProofReceipt, QuestEngine, ReflectionOutcome,
    Selection,
};
pub use primitives::{Attachment, Proof, ProofType, QuestId, Timestamp};
pub use progression::{Award, PlayerStats, Progress, ThresholdTable};
pub use records::{CompletionLedger, CompletionRecord, CooldownLedger, Profile};
pub use storage::{JsonStore, KeyValueBackend, MemoryBackend, RedbBackend, StoreError};
pub use verification::{ReasonCode, Verdict, VerificationRules};
