use tracing::debug;

use crate::errors::Result;
use crate::types::*;

use super::index::{build_index, build_item_index, Index};

/// Resolves a list of identifiers against `index`.
///
/// Input order is discarded. Found entities are projected to `(id, name)`,
/// sorted by name using byte-wise comparison with ties broken by id, and
/// ranked by their sorted position. Identifiers missing from the index are
/// returned in `unresolved` and left out of `references`.
pub fn resolve<E, F>(
    ids: &[Identifier],
    index: &Index<'_, E>,
    name_of: F,
    context: ReferenceContext,
) -> ResolutionResult
where
    F: Fn(&E) -> &str,
{
    let mut found: Vec<(Identifier, &str)> = Vec::with_capacity(ids.len());
    let mut unresolved = Vec::new();

    for id in ids {
        match index.get(id) {
            Some(&entity) => found.push((*id, name_of(entity))),
            None => unresolved.push(UnresolvedRef { id: *id, context }),
        }
    }

    found.sort_by(|(a_id, a_name), (b_id, b_name)| {
        a_name
            .as_bytes()
            .cmp(b_name.as_bytes())
            .then_with(|| a_id.cmp(b_id))
    });

    let references = found
        .into_iter()
        .enumerate()
        .map(|(rank, (id, name))| ReferenceItem {
            id,
            name: name.to_string(),
            rank: rank as u32,
        })
        .collect();

    ResolutionResult {
        references,
        unresolved,
        total: ids.len(),
    }
}

/// Resolves session and speaker identifier lists against the three entity
/// indexes of an event.
///
/// Indexes are built once at construction time and only borrowed afterwards,
/// so resolving the same entity twice gives the same result.
pub struct ReferenceResolver<'a> {
    session_by_id: Index<'a, Session>,
    speaker_by_id: Index<'a, Speaker>,
    item_by_id: Index<'a, Item>,
}

impl<'a> ReferenceResolver<'a> {
    /// Builds the session, speaker and item indexes.
    ///
    /// Fails with `DuplicateIdentifier` on the first repeated key in any of
    /// them.
    pub fn new(
        sessions: &'a [Session],
        speakers: &'a [Speaker],
        choices: &'a [Choice],
    ) -> Result<Self> {
        let session_by_id = build_index(EntityKind::Session, sessions, |s| s.id)?;
        let speaker_by_id = build_index(EntityKind::Speaker, speakers, |s| s.id)?;
        let item_by_id = build_item_index(choices)?;

        Ok(Self {
            session_by_id,
            speaker_by_id,
            item_by_id,
        })
    }

    pub fn session_by_id(&self) -> &Index<'a, Session> {
        &self.session_by_id
    }

    pub fn speaker_by_id(&self) -> &Index<'a, Speaker> {
        &self.speaker_by_id
    }

    pub fn item_by_id(&self) -> &Index<'a, Item> {
        &self.item_by_id
    }

    /// Resolves a session's speakers and choices.
    ///
    /// Returns the resolved session together with every identifier that could
    /// not be found. A miss in one field does not affect the other.
    pub fn resolve_session(&self, session: &Session) -> (ResolvedSession, Vec<UnresolvedRef>) {
        let speakers = resolve(
            &session.speaker_ids,
            &self.speaker_by_id,
            |speaker: &Speaker| speaker.full_name.as_str(),
            ReferenceContext {
                owner: EntityKind::Session,
                owner_id: session.id,
                field: "speakerIds",
            },
        );
        let choices = self.resolve_choices(&session.choice_ids, EntityKind::Session, session.id);

        debug!(
            session = %session.id,
            speakers = speakers.references.len(),
            choices = choices.references.len(),
            "resolved session"
        );

        let mut unresolved = speakers.unresolved;
        unresolved.extend(choices.unresolved);

        let resolved = ResolvedSession {
            session: session.clone(),
            speaker_references: speakers.references,
            choice_references: choices.references,
        };
        (resolved, unresolved)
    }

    /// Resolves a speaker's sessions and choices.
    pub fn resolve_speaker(&self, speaker: &Speaker) -> (ResolvedSpeaker, Vec<UnresolvedRef>) {
        let sessions = resolve(
            &speaker.session_ids,
            &self.session_by_id,
            |session: &Session| session.title.as_str(),
            ReferenceContext {
                owner: EntityKind::Speaker,
                owner_id: speaker.id,
                field: "sessionIds",
            },
        );
        let choices = self.resolve_choices(&speaker.choice_ids, EntityKind::Speaker, speaker.id);

        debug!(
            speaker = %speaker.id,
            sessions = sessions.references.len(),
            choices = choices.references.len(),
            "resolved speaker"
        );

        let mut unresolved = sessions.unresolved;
        unresolved.extend(choices.unresolved);

        let resolved = ResolvedSpeaker {
            speaker: speaker.clone(),
            session_references: sessions.references,
            choice_references: choices.references,
        };
        (resolved, unresolved)
    }

    fn resolve_choices(
        &self,
        ids: &[Identifier],
        owner: EntityKind,
        owner_id: Identifier,
    ) -> ResolutionResult {
        resolve(
            ids,
            &self.item_by_id,
            |item: &Item| item.name.as_str(),
            ReferenceContext {
                owner,
                owner_id,
                field: "categoryIds",
            },
        )
    }
}
