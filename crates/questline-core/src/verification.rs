//! # Verification Engine
//!
//! Decides whether a submitted proof resonates with its quest.
//!
//! This is a local heuristic, not content analysis:
//! - text: trimmed length and keyword membership
//! - image: presence of an attachment
//! - audio/video: length of the written description
//!
//! A witness-confirmed submission short-circuits every check. Failures carry
//! an explicit [`ReasonCode`]; hosts map codes to copy and never parse the
//! message text.

use crate::catalog::QuestDefinition;
use crate::primitives::{Proof, ProofType};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Minimum trimmed character count for a text proof.
pub const DEFAULT_TEXT_MIN_CHARS: usize = 150;

/// An audio/video description must be strictly longer than this.
pub const DEFAULT_RECORDING_MIN_CHARS: usize = 20;

/// Global keywords that satisfy the text resonance check for any quest.
pub const DEFAULT_EMOTIONAL_KEYWORDS: [&str; 16] = [
    "afraid",
    "grateful",
    "angry",
    "free",
    "release",
    "breakthrough",
    "realization",
    "clarity",
    "fear",
    "joy",
    "peace",
    "connected",
    "struggle",
    "overcome",
    "insight",
    "let go",
];

// =============================================================================
// REASON CODES
// =============================================================================

/// Why a proof was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Text shorter than the minimum.
    TooShort,
    /// Text long enough but no global or quest keyword found.
    NoResonance,
    /// Image quest submitted without an attachment.
    MissingImage,
    /// Audio/video description missing or too short.
    DescriptionInsufficient,
    /// The quest asks for a proof type the engine cannot check.
    UnsupportedType,
}

impl ReasonCode {
    /// Stable machine-readable code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::NoResonance => "no_resonance",
            Self::MissingImage => "missing_image",
            Self::DescriptionInsufficient => "description_insufficient",
            Self::UnsupportedType => "unsupported_type",
        }
    }

    /// Default encouraging follow-up shown after a rejection.
    #[must_use]
    pub fn supportive_message(self) -> &'static str {
        match self {
            Self::TooShort => {
                "The signal was too faint. Elaborate further; delve deeper into the experience."
            }
            Self::NoResonance => {
                "The core frequency is missing. Re-center your intention and ensure alignment with the objective."
            }
            Self::MissingImage | Self::DescriptionInsufficient => {
                "Required data stream absent. Ensure the correct proof format is provided."
            }
            Self::UnsupportedType => {
                "Discrepancy detected. Recalibrate your approach and attempt transmission again when ready."
            }
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RULES
// =============================================================================

/// Tunable thresholds for the heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRules {
    pub text_min_chars: usize,
    pub recording_min_chars: usize,
    /// Lowercased global keywords.
    pub emotional_keywords: Vec<String>,
}

impl Default for VerificationRules {
    fn default() -> Self {
        Self {
            text_min_chars: DEFAULT_TEXT_MIN_CHARS,
            recording_min_chars: DEFAULT_RECORDING_MIN_CHARS,
            emotional_keywords: DEFAULT_EMOTIONAL_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// VERDICT
// =============================================================================

/// Outcome of one verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    /// Headline shown to the player.
    pub message: String,
    /// Set only on failure.
    pub reason: Option<ReasonCode>,
    /// Longer explanation of the failure, if any.
    pub detail: Option<String>,
    /// True when a confirmed witness bypassed the content checks.
    pub witnessed: bool,
}

impl Verdict {
    fn pass(message: &str) -> Self {
        Self {
            passed: true,
            message: message.to_string(),
            reason: None,
            detail: None,
            witnessed: false,
        }
    }

    fn fail(reason: ReasonCode, message: &str, detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.to_string(),
            reason: Some(reason),
            detail: Some(detail.into()),
            witnessed: false,
        }
    }

    fn witnessed() -> Self {
        Self {
            witnessed: true,
            ..Self::pass("Resonance confirmed by witness echo. Alignment achieved.")
        }
    }
}

/// Diagnostics gathered from a text proof. Word count is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAnalysis {
    pub chars: usize,
    pub words: usize,
    pub emotional_match: bool,
    pub quest_match: bool,
}

impl TextAnalysis {
    #[must_use]
    pub fn of(text: &str, quest: &QuestDefinition, rules: &VerificationRules) -> Self {
        let lowered = text.to_lowercase();
        let contains_any = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
        };
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            emotional_match: contains_any(&rules.emotional_keywords),
            quest_match: contains_any(&quest.keywords),
        }
    }
}

// =============================================================================
// VERIFY
// =============================================================================

/// Check a proof against its quest.
///
/// `witness_confirmed` is a trust bypass: when set, the proof is not
/// inspected at all.
#[must_use]
pub fn verify(
    quest: &QuestDefinition,
    proof: &Proof,
    witness_confirmed: bool,
    rules: &VerificationRules,
) -> Verdict {
    debug!(quest = %quest.id, proof_type = %quest.proof_type, "verifying proof");

    if witness_confirmed {
        debug!(quest = %quest.id, "witness confirmed, skipping content checks");
        return Verdict::witnessed();
    }

    match quest.proof_type {
        ProofType::Text => verify_text(quest, proof, rules),

        ProofType::Image => {
            if proof.attachment.is_some() {
                Verdict::pass(
                    "Visual pattern acknowledged. Sigil energy detected. Alignment achieved.",
                )
            } else {
                Verdict::fail(
                    ReasonCode::MissingImage,
                    "Visual input missing.",
                    "No visual data stream detected. Upload required.",
                )
            }
        }

        ProofType::Audio | ProofType::Video => {
            let chars = proof.recording_description.chars().count();
            if chars > rules.recording_min_chars {
                Verdict::pass(
                    "Auditory/Visual log acknowledged. Resonance pattern stable. Alignment achieved.",
                )
            } else {
                Verdict::fail(
                    ReasonCode::DescriptionInsufficient,
                    "A/V stream description unclear.",
                    "Auditory/Visual log description insufficient or missing.",
                )
            }
        }

        ProofType::Unsupported => Verdict::fail(
            ReasonCode::UnsupportedType,
            "System error: Unknown proof protocol.",
            "Unsupported proof type encountered.",
        ),
    }
}

fn verify_text(quest: &QuestDefinition, proof: &Proof, rules: &VerificationRules) -> Verdict {
    let text = proof.text.trim();
    let analysis = TextAnalysis::of(text, quest, rules);

    debug!(
        quest = %quest.id,
        chars = analysis.chars,
        words = analysis.words,
        emotional = analysis.emotional_match,
        thematic = analysis.quest_match,
        "text analysis"
    );

    if analysis.chars < rules.text_min_chars {
        return Verdict::fail(
            ReasonCode::TooShort,
            "Insufficient data stream. Resonance weak.",
            format!(
                "Log entry too brief (requires {} characters). Deeper reflection needed.",
                rules.text_min_chars
            ),
        );
    }

    if !(analysis.emotional_match || analysis.quest_match) {
        return Verdict::fail(
            ReasonCode::NoResonance,
            "Data stream lacks required resonance signature.",
            "Emotional or thematic resonance not detected in log entry. Refine focus.",
        );
    }

    Verdict::pass("Textual resonance confirmed. Emotional signature detected. Alignment achieved.")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Attachment, QuestId};

    fn quest(proof_type: ProofType, keywords: &[&str]) -> QuestDefinition {
        QuestDefinition {
            id: QuestId::from("q1"),
            title: "Quest".to_string(),
            description: "Do the thing.".to_string(),
            objective: "Describe it.".to_string(),
            proof_type,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            experience_reward: 100,
        }
    }

    /// Neutral filler that matches no default keyword.
    fn filler(len: usize) -> String {
        "x".repeat(len)
    }

    /// `len` characters ending in the quest keyword "sunrise".
    fn with_keyword(len: usize) -> String {
        let keyword = " sunrise";
        format!("{}{}", filler(len - keyword.len()), keyword)
    }

    #[test]
    fn text_one_below_minimum_is_too_short() {
        let q = quest(ProofType::Text, &["sunrise"]);
        let verdict = verify(&q, &Proof::text(with_keyword(149)), false, &VerificationRules::default());
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, Some(ReasonCode::TooShort));
    }

    #[test]
    fn text_at_minimum_without_keyword_lacks_resonance() {
        let q = quest(ProofType::Text, &["sunrise"]);
        let verdict = verify(&q, &Proof::text(filler(150)), false, &VerificationRules::default());
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, Some(ReasonCode::NoResonance));
    }

    #[test]
    fn text_at_minimum_with_quest_keyword_passes() {
        let q = quest(ProofType::Text, &["sunrise"]);
        let verdict = verify(&q, &Proof::text(with_keyword(150)), false, &VerificationRules::default());
        assert!(verdict.passed);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn emotional_keyword_matches_case_insensitively() {
        let q = quest(ProofType::Text, &[]);
        let text = format!("{} I felt GRATEFUL", filler(150));
        let verdict = verify(&q, &Proof::text(text), false, &VerificationRules::default());
        assert!(verdict.passed);
    }

    #[test]
    fn surrounding_whitespace_does_not_count() {
        let q = quest(ProofType::Text, &["sunrise"]);
        let text = format!("   {}   \n", with_keyword(149));
        let verdict = verify(&q, &Proof::text(text), false, &VerificationRules::default());
        assert_eq!(verdict.reason, Some(ReasonCode::TooShort));
    }

    #[test]
    fn word_count_does_not_affect_outcome() {
        let q = quest(ProofType::Text, &["sunrise"]);
        // A single 150-character "word" still passes.
        let single_word = format!("{}sunrise", filler(143));
        let verdict = verify(&q, &Proof::text(single_word), false, &VerificationRules::default());
        assert!(verdict.passed);
    }

    #[test]
    fn witness_confirmation_passes_empty_proof() {
        let rules = VerificationRules::default();
        for proof_type in [ProofType::Text, ProofType::Image, ProofType::Video, ProofType::Unsupported] {
            let verdict = verify(&quest(proof_type, &[]), &Proof::empty(), true, &rules);
            assert!(verdict.passed);
            assert!(verdict.witnessed);
        }
    }

    #[test]
    fn image_requires_attachment_only() {
        let q = quest(ProofType::Image, &[]);
        let rules = VerificationRules::default();
        assert_eq!(
            verify(&q, &Proof::empty(), false, &rules).reason,
            Some(ReasonCode::MissingImage)
        );
        assert!(verify(&q, &Proof::image(Attachment::new("sigil.png", 0)), false, &rules).passed);
    }

    #[test]
    fn recording_description_must_exceed_minimum() {
        let rules = VerificationRules::default();
        for proof_type in [ProofType::Audio, ProofType::Video] {
            let q = quest(proof_type, &[]);
            let at_minimum = verify(&q, &Proof::recording(filler(20)), false, &rules);
            assert_eq!(at_minimum.reason, Some(ReasonCode::DescriptionInsufficient));
            assert!(verify(&q, &Proof::recording(filler(21)), false, &rules).passed);
        }
    }

    #[test]
    fn unsupported_type_always_fails() {
        let q = quest(ProofType::Unsupported, &[]);
        let verdict = verify(&q, &Proof::text(with_keyword(300)), false, &VerificationRules::default());
        assert_eq!(verdict.reason, Some(ReasonCode::UnsupportedType));
    }

    #[test]
    fn reason_codes_have_distinct_copy() {
        assert_ne!(
            ReasonCode::TooShort.supportive_message(),
            ReasonCode::NoResonance.supportive_message()
        );
        assert_eq!(ReasonCode::NoResonance.to_string(), "no_resonance");
    }
}
