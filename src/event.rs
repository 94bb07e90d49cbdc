use serde::Serialize;
use tracing::{debug, warn};

use crate::dto::{convert_all, AllDataDto};
use crate::errors::{ImportError, Result};
use crate::report::ReportSink;
use crate::resolution::{Index, ReferenceResolver};
use crate::types::*;

/// An event whose entities are loaded and sorted but not yet indexed.
///
/// Collections are sorted once here: sessions by title, speakers by full
/// name, and questions, choice groups and rooms by their sort order. Later
/// stages never reorder them.
///
/// Rooms and questions are carried through unindexed, so repeated room ids
/// are kept as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    source: Option<String>,
    sessions: Vec<Session>,
    speakers: Vec<Speaker>,
    questions: Vec<Question>,
    choices: Vec<Choice>,
    rooms: Vec<Item>,
}

/// An event with its session, speaker and item indexes built.
pub struct IndexedEvent<'a> {
    raw: &'a RawEvent,
    resolver: ReferenceResolver<'a>,
}

/// A fully resolved event, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEvent {
    #[serde(skip)]
    pub source: Option<String>,
    pub sessions: Vec<ResolvedSession>,
    pub speakers: Vec<ResolvedSpeaker>,
    pub questions: Vec<Question>,
    #[serde(rename = "categories")]
    pub choices: Vec<Choice>,
    pub rooms: Vec<Item>,
    /// Number of references that could not be resolved.
    #[serde(skip)]
    pub unresolved_count: usize,
}

// ---------------------------------------------------------------------------
// Raw
// ---------------------------------------------------------------------------

impl RawEvent {
    /// Creates a raw event from already converted entities, sorting every
    /// collection into display order.
    pub fn new(
        source: Option<String>,
        mut sessions: Vec<Session>,
        mut speakers: Vec<Speaker>,
        mut questions: Vec<Question>,
        mut choices: Vec<Choice>,
        mut rooms: Vec<Item>,
    ) -> Self {
        sessions.sort_by(|a, b| a.title.cmp(&b.title));
        speakers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        questions.sort_by_key(|q| q.sort);
        choices.sort_by_key(|c| c.sort);
        for choice in &mut choices {
            choice.items.sort_by_key(|item| item.sort);
        }
        rooms.sort_by_key(|r| r.sort);

        Self {
            source,
            sessions,
            speakers,
            questions,
            choices,
            rooms,
        }
    }

    /// Converts a parsed payload. Entities that fail conversion are reported
    /// to `sink` and left out; the rest of the event is still built.
    pub fn from_dto(all: AllDataDto, source: Option<String>, sink: &mut dyn ReportSink) -> Self {
        let sessions = convert_all(all.sessions, sink);
        let speakers = convert_all(all.speakers, sink);
        let questions = convert_all(all.questions, sink);
        let choices = all
            .categories
            .into_iter()
            .filter_map(|dto| match Choice::from_dto(dto, sink) {
                Ok(choice) => Some(choice),
                Err(e) => {
                    sink.report(e);
                    None
                }
            })
            .collect();
        let rooms = convert_all(all.rooms, sink);

        Self::new(source, sessions, speakers, questions, choices, rooms)
    }

    /// Builds the session, speaker and item indexes.
    ///
    /// Fails with `DuplicateIdentifier` if any index has a repeated key, in
    /// which case the event cannot be resolved.
    pub fn index(&self) -> Result<IndexedEvent<'_>> {
        let resolver = ReferenceResolver::new(&self.sessions, &self.speakers, &self.choices)?;
        debug!(
            sessions = resolver.session_by_id().len(),
            speakers = resolver.speaker_by_id().len(),
            items = resolver.item_by_id().len(),
            "indexed event"
        );
        Ok(IndexedEvent {
            raw: self,
            resolver,
        })
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn rooms(&self) -> &[Item] {
        &self.rooms
    }
}

// ---------------------------------------------------------------------------
// Indexed
// ---------------------------------------------------------------------------

impl<'a> IndexedEvent<'a> {
    pub fn raw(&self) -> &'a RawEvent {
        self.raw
    }

    pub fn session_by_id(&self) -> &Index<'a, Session> {
        self.resolver.session_by_id()
    }

    pub fn speaker_by_id(&self) -> &Index<'a, Speaker> {
        self.resolver.speaker_by_id()
    }

    pub fn item_by_id(&self) -> &Index<'a, Item> {
        self.resolver.item_by_id()
    }

    /// Resolves every session, then every speaker.
    ///
    /// Unresolved references are reported to `sink` and skipped; they never
    /// stop sibling fields or entities from resolving.
    pub fn resolve(&self, sink: &mut dyn ReportSink) -> ResolvedEvent {
        let mut unresolved_count = 0;

        let sessions = self
            .raw
            .sessions
            .iter()
            .map(|session| {
                let (resolved, unresolved) = self.resolver.resolve_session(session);
                unresolved_count += unresolved.len();
                unresolved.into_iter().for_each(|uref| sink.report(uref.into()));
                resolved
            })
            .collect();

        let speakers = self
            .raw
            .speakers
            .iter()
            .map(|speaker| {
                let (resolved, unresolved) = self.resolver.resolve_speaker(speaker);
                unresolved_count += unresolved.len();
                unresolved.into_iter().for_each(|uref| sink.report(uref.into()));
                resolved
            })
            .collect();

        ResolvedEvent {
            source: self.raw.source.clone(),
            sessions,
            speakers,
            questions: self.raw.questions.clone(),
            choices: self.raw.choices.clone(),
            rooms: self.raw.rooms.clone(),
            unresolved_count,
        }
    }

    /// Like [`resolve`](Self::resolve), but fails with `TooManyUnresolved`
    /// when more than `max_unresolved` references are missing.
    pub fn resolve_within(
        &self,
        max_unresolved: usize,
        sink: &mut dyn ReportSink,
    ) -> Result<ResolvedEvent> {
        let event = self.resolve(sink);
        if event.unresolved_count > max_unresolved {
            warn!(
                count = event.unresolved_count,
                limit = max_unresolved,
                "unresolved reference limit exceeded"
            );
            return Err(ImportError::TooManyUnresolved {
                count: event.unresolved_count,
                limit: max_unresolved,
            });
        }
        Ok(event)
    }
}

// ---------------------------------------------------------------------------
// Resolved
// ---------------------------------------------------------------------------

impl ResolvedEvent {
    pub fn find_session(&self, id: Identifier) -> Option<&ResolvedSession> {
        self.sessions.iter().find(|s| s.session.id == id)
    }

    pub fn find_speaker(&self, id: Identifier) -> Option<&ResolvedSpeaker> {
        self.speakers.iter().find(|s| s.speaker.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.speakers.is_empty()
    }
}
