use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ImportError;

/// Raw identifier as it appears on the wire.
///
/// Anything that is neither an unsigned integer nor a string lands in
/// `Other`, so a bad id fails conversion of its own entity instead of the
/// whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

/// Normalized entity identifier.
///
/// Sessionize mixes integer ids (categories, rooms, questions), digit strings
/// (session ids) and GUID strings (speaker ids). All of them normalize into
/// this one type, so `"42"` and `42` are the same key.
///
/// Numeric identifiers order before GUID identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "RawId")]
pub enum Identifier {
    Numeric(u64),
    Guid(Uuid),
}

impl Identifier {
    /// Parses identifier text. A run of ASCII digits is numeric, anything
    /// else must be a GUID.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let trimmed = text.trim();
        let invalid = || ImportError::InvalidIdentifier {
            value: text.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid());
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .map(Identifier::Numeric)
                .map_err(|_| invalid());
        }

        Uuid::parse_str(trimmed)
            .map(Identifier::Guid)
            .map_err(|_| invalid())
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Numeric(value)
    }
}

impl From<Uuid> for Identifier {
    fn from(value: Uuid) -> Self {
        Identifier::Guid(value)
    }
}

impl FromStr for Identifier {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

impl TryFrom<RawId> for Identifier {
    type Error = ImportError;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        match raw {
            RawId::Number(n) => Ok(Identifier::Numeric(n)),
            RawId::Text(text) => Identifier::parse(&text),
            RawId::Other(value) => Err(ImportError::InvalidIdentifier {
                value: value.to_string(),
            }),
        }
    }
}

impl From<Identifier> for RawId {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Numeric(n) => RawId::Number(n),
            Identifier::Guid(guid) => RawId::Text(guid.hyphenated().to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Guid(guid) => write!(f, "{}", guid.hyphenated()),
        }
    }
}

/// Kinds of entities in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Session,
    Speaker,
    Question,
    ChoiceGroup,
    Item,
    Room,
}

impl EntityKind {
    /// Returns the string representation of this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Session => "session",
            EntityKind::Speaker => "speaker",
            EntityKind::Question => "question",
            EntityKind::ChoiceGroup => "choice group",
            EntityKind::Item => "choice item",
            EntityKind::Room => "room",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names the identifier list a reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceContext {
    pub owner: EntityKind,
    pub owner_id: Identifier,
    pub field: &'static str,
}

impl fmt::Display for ReferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} field {}", self.owner, self.owner_id, self.field)
    }
}

/// Resolved, named and ranked stand-in for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: Identifier,
    pub name: String,
    /// Zero-based position within the resolved list.
    pub rank: u32,
}

/// A link on a speaker profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub title: String,
    pub url: String,
    pub link_type: String,
}

/// Answer to a custom question on a session or speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    pub question_id: Identifier,
    pub answer_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Identifier,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<FixedOffset>>,
    pub ends_at: Option<DateTime<FixedOffset>>,
    pub is_service_session: bool,
    pub is_plenum_session: bool,
    pub speaker_ids: Vec<Identifier>,
    #[serde(rename = "categoryIds")]
    pub choice_ids: Vec<Identifier>,
    pub question_answers: Vec<QuestionAnswer>,
    pub room_id: Option<Identifier>,
    pub live_url: Option<String>,
    pub recording_url: Option<String>,
    pub status: Option<String>,
    pub is_informed: bool,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: Identifier,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub tag_line: Option<String>,
    pub profile_picture: Option<String>,
    pub is_top_speaker: bool,
    pub links: Vec<Link>,
    pub session_ids: Vec<Identifier>,
    #[serde(rename = "categoryIds")]
    pub choice_ids: Vec<Identifier>,
    pub question_answers: Vec<QuestionAnswer>,
}

/// A selectable value inside a choice group, also used for rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Identifier,
    pub name: String,
    pub sort: i32,
}

/// A category (choice group) with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: Identifier,
    pub title: String,
    pub sort: i32,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Identifier,
    pub question: String,
    pub question_type: String,
    pub sort: i32,
}

/// A session with its identifier lists resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSession {
    #[serde(flatten)]
    pub session: Session,
    pub speaker_references: Vec<ReferenceItem>,
    #[serde(rename = "categoryReferences")]
    pub choice_references: Vec<ReferenceItem>,
}

/// A speaker with its identifier lists resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSpeaker {
    #[serde(flatten)]
    pub speaker: Speaker,
    pub session_references: Vec<ReferenceItem>,
    #[serde(rename = "categoryReferences")]
    pub choice_references: Vec<ReferenceItem>,
}

/// An identifier that had no match in its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    pub id: Identifier,
    pub context: ReferenceContext,
}

impl From<UnresolvedRef> for ImportError {
    fn from(uref: UnresolvedRef) -> Self {
        ImportError::UnresolvedReference {
            id: uref.id,
            context: uref.context,
        }
    }
}

/// Result of resolving one identifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Resolved references, ordered by name then id and ranked.
    pub references: Vec<ReferenceItem>,
    /// Identifiers that could not be found, in input order.
    pub unresolved: Vec<UnresolvedRef>,
    /// Number of identifiers in the input list.
    pub total: usize,
}

impl ResolutionResult {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}
