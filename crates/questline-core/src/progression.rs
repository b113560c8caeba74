//! # Progression Model
//!
//! Pure functions over player stats: awarding experience, deriving the level
//! from cumulative experience, and measuring progress toward the next level.
//!
//! Experience is cumulative and never reset on level-up. The level is always
//! recomputed from experience, so one large award can cross several levels.
//! Progress is integer-only (no float arithmetic in the core).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cumulative experience required to reach each level.
///
/// `DEFAULT_THRESHOLDS[L - 1]` is the total experience for level `L`.
pub const DEFAULT_THRESHOLDS: [u64; 10] = [0, 100, 250, 450, 700, 1000, 1350, 1750, 2200, 2700];

/// Errors in a threshold table definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold table is empty")]
    Empty,

    #[error("threshold for level 1 must be 0, found {0}")]
    NonZeroBase(u64),

    #[error("thresholds must strictly increase (level {level}: {value} <= {previous})")]
    NotIncreasing { level: u32, value: u64, previous: u64 },
}

// =============================================================================
// THRESHOLD TABLE
// =============================================================================

/// Ordered cumulative-experience boundaries, one per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct ThresholdTable(Vec<u64>);

impl ThresholdTable {
    /// Validate and wrap a table: non-empty, starts at 0, strictly increasing.
    pub fn new(thresholds: Vec<u64>) -> Result<Self, ThresholdError> {
        let Some(&first) = thresholds.first() else {
            return Err(ThresholdError::Empty);
        };
        if first != 0 {
            return Err(ThresholdError::NonZeroBase(first));
        }
        for (index, pair) in thresholds.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ThresholdError::NotIncreasing {
                    level: index as u32 + 2,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }
        Ok(Self(thresholds))
    }

    /// Highest level the table defines.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.0.len() as u32
    }

    /// Cumulative experience needed for `level`, if the table defines it.
    #[must_use]
    pub fn threshold(&self, level: u32) -> Option<u64> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.0.get(index).copied()
    }

    /// The largest level `L` with `experience >= threshold(L)`.
    #[must_use]
    pub fn level_for(&self, experience: u64) -> u32 {
        // Table is sorted and starts at 0, so the count is at least 1.
        self.0.iter().take_while(|&&t| t <= experience).count().max(1) as u32
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLDS.to_vec())
    }
}

impl TryFrom<Vec<u64>> for ThresholdTable {
    type Error = ThresholdError;

    fn try_from(value: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThresholdTable> for Vec<u64> {
    fn from(table: ThresholdTable) -> Self {
        table.0
    }
}

// =============================================================================
// PLAYER STATS
// =============================================================================

/// Persisted player progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u64,
    pub verified_quest_count: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            verified_quest_count: 0,
        }
    }
}

/// Result of an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub stats: PlayerStats,
    /// Levels crossed by this single award (0 if none).
    pub levels_gained: u32,
}

impl Award {
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Add `amount` to cumulative experience and recompute the level.
///
/// A zero amount is a no-op.
#[must_use]
pub fn award_experience(stats: &PlayerStats, amount: u64, table: &ThresholdTable) -> Award {
    if amount == 0 {
        return Award {
            stats: *stats,
            levels_gained: 0,
        };
    }

    let experience = stats.experience.saturating_add(amount);
    let level = table.level_for(experience);
    let levels_gained = level.saturating_sub(stats.level);

    Award {
        stats: PlayerStats {
            level,
            experience,
            verified_quest_count: stats.verified_quest_count,
        },
        levels_gained,
    }
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Progress from the current level's threshold toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Experience earned past the current level's threshold.
    pub earned: u64,
    /// Experience separating the current level from the next (0 at max level).
    pub span: u64,
}

impl Progress {
    /// Progress when the table is exhausted.
    #[must_use]
    pub fn complete() -> Self {
        Self { earned: 0, span: 0 }
    }

    /// Integer percentage, clamped to 0..=100. 100 at max level.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.span == 0 {
            return 100;
        }
        let pct = self.earned.saturating_mul(100) / self.span;
        pct.min(100) as u8
    }
}

/// How far `stats.experience` sits between the current and next level.
#[must_use]
pub fn progress(stats: &PlayerStats, table: &ThresholdTable) -> Progress {
    let level = table.level_for(stats.experience);
    let (Some(current), Some(next)) = (table.threshold(level), table.threshold(level + 1)) else {
        return Progress::complete();
    };
    Progress {
        earned: stats.experience.saturating_sub(current),
        span: next.saturating_sub(current),
    }
}

// =============================================================================
// TESTS
// =============================================================================
