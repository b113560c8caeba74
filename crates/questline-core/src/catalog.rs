//! # Quest Catalog
//!
//! The static, immutable list of quest definitions loaded at startup.
//!
//! Catalog order is canonical: quest selection always walks it front to back.

use crate::primitives::{ProofType, QuestId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("quest catalog is empty")]
    Empty,

    #[error("duplicate quest id: {0}")]
    DuplicateId(QuestId),

    #[error("quest id must not be blank")]
    BlankId,

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One quest, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDefinition {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub objective: String,
    pub proof_type: ProofType,
    /// Thematic keywords checked against text proofs (case-insensitive).
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub experience_reward: u64,
}

/// Ordered, id-unique collection of quest definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCatalog {
    quests: Vec<QuestDefinition>,
}

impl QuestCatalog {
    /// Build a catalog, rejecting empty lists, blank ids and duplicates.
    pub fn new(quests: Vec<QuestDefinition>) -> Result<Self, CatalogError> {
        if quests.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = BTreeSet::new();
        for quest in &quests {
            if quest.id.as_str().trim().is_empty() {
                return Err(CatalogError::BlankId);
            }
            if !seen.insert(quest.id.clone()) {
                return Err(CatalogError::DuplicateId(quest.id.clone()));
            }
        }

        Ok(Self { quests })
    }

    /// Parse a JSON array of quest definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let quests: Vec<QuestDefinition> = serde_json::from_str(json)?;
        Self::new(quests)
    }

    /// The five quests Questline ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            quests: builtin_quests(),
        }
    }

    /// Quests in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, QuestDefinition> {
        self.quests.iter()
    }

    #[must_use]
    pub fn get(&self, id: &QuestId) -> Option<&QuestDefinition> {
        self.quests.iter().find(|q| &q.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

impl Default for QuestCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn quest(
    id: &str,
    title: &str,
    description: &str,
    objective: &str,
    proof_type: ProofType,
    keywords: &[&str],
    experience_reward: u64,
) -> QuestDefinition {
    QuestDefinition {
        id: QuestId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        objective: objective.to_string(),
        proof_type,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        experience_reward,
    }
}

fn builtin_quests() -> Vec<QuestDefinition> {
    vec![
        quest(
            "meditate01",
            "Still the Mind's Echo",
            "Find a quiet space, free from external distractions. Focus solely on your breath for 15 uninterrupted minutes.",
            "Achieve 15 minutes of focused meditation.",
            ProofType::Text,
            &["peace", "calm", "focus", "breath", "quiet", "present", "mindful"],
            100,
        ),
        quest(
            "sigil01",
            "Manifest Intent",
            "Design and draw a personal sigil representing a core desire or intention for growth. Infuse it with purpose.",
            "Create and photograph your sigil.",
            ProofType::Image,
            &["intention", "desire", "symbol", "create", "focus", "manifest"],
            80,
        ),
        quest(
            "fear01",
            "Confront the Shadow",
            "Identify one small fear that holds you back. Take one concrete step today to face it, no matter how minor.",
            "Describe the fear and the action taken.",
            ProofType::Text,
            &[
                "fear", "afraid", "confront", "step", "action", "overcome", "challenge",
                "release", "brave",
            ],
            150,
        ),
        quest(
            "gratitude01",
            "Acknowledge Abundance",
            "Record three specific things you are genuinely grateful for today, explaining *why* they matter.",
            "Write a short gratitude journal entry.",
            ProofType::Text,
            &[
                "grateful", "thankful", "appreciate", "blessing", "joy", "abundance", "positive",
            ],
            90,
        ),
        quest(
            "nature01",
            "Connect to Gaia",
            "Spend 20 minutes outdoors, consciously observing the natural world. Listen, watch, feel.",
            "Describe your sensory experience and any insights.",
            ProofType::Text,
            &[
                "nature", "observe", "connect", "earth", "listen", "feel", "grounded", "peace",
            ],
            120,
        ),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = QuestCatalog::builtin();
        let rebuilt = QuestCatalog::new(builtin.iter().cloned().collect());
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.len(), 5);
        assert_eq!(
            builtin.iter().next().map(|q| q.id.as_str()),
            Some("meditate01")
        );
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut quests: Vec<_> = QuestCatalog::builtin().iter().cloned().collect();
        quests.push(quests[0].clone());
        assert!(matches!(
            QuestCatalog::new(quests),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(QuestCatalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn from_json_defaults_missing_fields() {
        let json = r#"[{
            "id": "walk01",
            "title": "Walk",
            "description": "Take a walk.",
            "objective": "Walk for ten minutes.",
            "proofType": "video"
        }]"#;
        let catalog = QuestCatalog::from_json(json);
        assert!(catalog.is_ok());
        let catalog = catalog.unwrap_or_default();
        let walk = catalog.get(&QuestId::from("walk01"));
        assert_eq!(walk.map(|q| q.proof_type), Some(ProofType::Video));
        assert_eq!(walk.map(|q| q.experience_reward), Some(0));
        assert_eq!(walk.map(|q| q.keywords.len()), Some(0));
    }
}
