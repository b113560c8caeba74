//! Quest eligibility and selection.

use crate::catalog::QuestCatalog;
use crate::primitives::{QuestId, Timestamp};
use crate::records::{CompletionLedger, CooldownLedger};
use serde::{Deserialize, Serialize};

/// What the board shows next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Selection {
    /// The first eligible quest in catalog order.
    Offered { quest_id: QuestId },
    /// Nothing eligible, but a not-fully-completed quest comes off cooldown
    /// at `until` (the earliest such expiry).
    CoolingDown { until: Timestamp },
    /// Nothing eligible and nothing waiting on a cooldown.
    Exhausted,
}

/// Pick the next quest.
///
/// Eligible means: not fully completed (record exists with a sealed
/// reflection) and not cooling down. The first eligible quest in catalog
/// order wins, so the result is deterministic for unchanged state.
#[must_use]
pub fn select_next_quest(
    catalog: &QuestCatalog,
    completions: &CompletionLedger,
    cooldowns: &CooldownLedger,
    now: Timestamp,
) -> Selection {
    let open = catalog
        .iter()
        .filter(|quest| !completions.is_fully_completed(&quest.id));

    if let Some(quest) = open
        .clone()
        .find(|quest| !cooldowns.is_cooling(&quest.id, now))
    {
        return Selection::Offered {
            quest_id: quest.id.clone(),
        };
    }

    open.filter_map(|quest| cooldowns.expiry(&quest.id))
        .filter(|&until| now < until)
        .min()
        .map_or(Selection::Exhausted, |until| Selection::CoolingDown { until })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(catalog: &QuestCatalog) -> Vec<QuestId> {
        catalog.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn first_in_catalog_order_wins() {
        let catalog = QuestCatalog::builtin();
        let first = ids(&catalog)[0].clone();
        let completions = CompletionLedger::new();
        let cooldowns = CooldownLedger::new();

        for _ in 0..3 {
            assert_eq!(
                select_next_quest(&catalog, &completions, &cooldowns, Timestamp(0)),
                Selection::Offered {
                    quest_id: first.clone()
                }
            );
        }
    }

    #[test]
    fn cooling_quest_is_skipped() {
        let catalog = QuestCatalog::builtin();
        let all = ids(&catalog);
        let mut cooldowns = CooldownLedger::new();
        cooldowns.extend(&all[0], Timestamp(1_000));

        let selection =
            select_next_quest(&catalog, &CompletionLedger::new(), &cooldowns, Timestamp(10));
        assert_eq!(
            selection,
            Selection::Offered {
                quest_id: all[1].clone()
            }
        );
    }

    #[test]
    fn sealed_quest_never_returns_even_after_cooldown() {
        let catalog = QuestCatalog::builtin();
        let all = ids(&catalog);
        let mut completions = CompletionLedger::new();
        let mut cooldowns = CooldownLedger::new();
        completions.record_verification(&all[0], "first", Timestamp(0), 0);
        if let Some(record) = completions.get_mut(&all[0]) {
            record.reflection_completed = true;
        }
        cooldowns.extend(&all[0], Timestamp(100));

        let selection =
            select_next_quest(&catalog, &completions, &cooldowns, Timestamp(1_000_000));
        assert_ne!(
            selection,
            Selection::Offered {
                quest_id: all[0].clone()
            }
        );
    }

    #[test]
    fn reports_earliest_cooldown_of_open_quests() {
        let catalog = QuestCatalog::builtin();
        let all = ids(&catalog);
        let mut completions = CompletionLedger::new();
        let mut cooldowns = CooldownLedger::new();
        for (i, id) in all.iter().enumerate() {
            cooldowns.extend(id, Timestamp(1_000 + i as u64 * 100));
        }
        // The quest with the earliest cooldown is sealed, so it doesn't count.
        completions.record_verification(&all[0], "first", Timestamp(0), 0);
        if let Some(record) = completions.get_mut(&all[0]) {
            record.reflection_completed = true;
        }

        let selection = select_next_quest(&catalog, &completions, &cooldowns, Timestamp(500));
        assert_eq!(
            selection,
            Selection::CoolingDown {
                until: Timestamp(1_100)
            }
        );
    }

    #[test]
    fn all_sealed_is_exhausted() {
        let catalog = QuestCatalog::builtin();
        let mut completions = CompletionLedger::new();
        for id in ids(&catalog) {
            completions.record_verification(&id, "t", Timestamp(0), 0);
            if let Some(record) = completions.get_mut(&id) {
                record.reflection_completed = true;
            }
        }
        assert_eq!(
            select_next_quest(&catalog, &completions, &CooldownLedger::new(), Timestamp(5)),
            Selection::Exhausted
        );
    }
}
