//! # Primitives
//!
//! Small value types shared by every layer: instants, quest identifiers,
//! proof types and the proof payload itself.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TIMESTAMP
// =============================================================================

/// An instant, in milliseconds since the Unix epoch.
///
/// The engine never reads a clock itself; the host passes `now` in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// The instant `millis` after this one (saturating).
    #[must_use]
    pub const fn plus_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Milliseconds from `self` until `later`, zero if `later` has passed.
    #[must_use]
    pub const fn millis_until(self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// =============================================================================
// QUEST ID
// =============================================================================

/// Unique identifier of a quest definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(pub String);

impl QuestId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// PROOF TYPE
// =============================================================================

/// The kind of evidence a quest asks for.
///
/// Unknown values in a catalog file deserialize to `Unsupported`, which the
/// verification engine always rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofType {
    Text,
    Image,
    Audio,
    Video,
    #[serde(other)]
    Unsupported,
}

impl ProofType {
    /// Capitalized label for display ("Text", "Image", ...).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

// =============================================================================
// PROOF PAYLOAD
// =============================================================================

/// A reference to an uploaded file. Only its presence is ever checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size_bytes: u64,
}

impl Attachment {
    #[must_use]
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// Everything the player handed in for one submission.
///
/// All three channels may be filled; the verification engine reads only the
/// one matching the quest's proof type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Journal-style text entry.
    pub text: String,
    /// Uploaded image, if any.
    pub attachment: Option<Attachment>,
    /// Written description of an audio or video recording.
    pub recording_description: String,
}

impl Proof {
    /// A proof with nothing in it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn image(attachment: Attachment) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn recording(description: impl Into<String>) -> Self {
        Self {
            recording_description: description.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn timestamp_arithmetic_saturates() {
        let t = Timestamp::from_millis(u64::MAX - 1);
        assert_eq!(t.plus_millis(10), Timestamp(u64::MAX));
        assert_eq!(Timestamp(50).millis_until(Timestamp(20)), 0);
        assert_eq!(Timestamp(20).millis_until(Timestamp(50)), 30);
    }

    #[test]
    fn proof_type_parses_lowercase_and_unknown() {
        let parsed: Vec<ProofType> =
            serde_json::from_str(r#"["text","image","audio","video","smell"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ProofType::Text,
                ProofType::Image,
                ProofType::Audio,
                ProofType::Video,
                ProofType::Unsupported,
            ]
        );
    }

    #[test]
    fn quest_id_serializes_as_plain_string() {
        let id = QuestId::from("meditate01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"meditate01\"");
    }
}
