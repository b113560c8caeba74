use crate::primitives::QuestId;
use thiserror::Error;

/// Rejected intents. Returned as values; nothing here is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("No quest is currently offered.")]
    NoQuestOffered,

    #[error("Quest {requested} is not the offered quest ({offered}).")]
    QuestMismatch { offered: QuestId, requested: QuestId },

    #[error("Quest {0} is already in progress.")]
    QuestInProgress(QuestId),

    #[error("Begin the quest before transmitting proof.")]
    NotStarted,

    #[error("A proof transmission is already being verified.")]
    SubmissionInFlight,

    #[error("Please enter a valid witness code.")]
    EmptyWitnessCode,

    #[error("Witness request already pending.")]
    WitnessPending,

    #[error("No completion record for quest {0}.")]
    UnknownQuest(QuestId),

    #[error("Reflection for quest {0} is already sealed.")]
    ReflectionSealed(QuestId),

    #[error("Reflection incomplete. Provide at least {required} characters of insight.")]
    ReflectionTooShort { required: usize, actual: usize },
}
