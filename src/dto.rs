//! Wire types for the Sessionize "All Data" JSON payload and their
//! conversions into domain entities.
//!
//! DTOs accept whatever shape the API sends (numeric or string ids, optional
//! text). Conversions into the domain types are explicit per entity kind and
//! fail with an `ImportError` when an id or timestamp cannot be normalized.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, Result};
use crate::report::ReportSink;
use crate::types::*;

/// Top-level "All Data" payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllDataDto {
    #[serde(default)]
    pub sessions: Vec<SessionDto>,
    #[serde(default)]
    pub speakers: Vec<SpeakerDto>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
    #[serde(default)]
    pub categories: Vec<ChoiceDto>,
    #[serde(default)]
    pub rooms: Vec<ItemDto>,
}

impl AllDataDto {
    /// Parses a payload. `source_name` only labels the error.
    pub fn from_json(json: &str, source_name: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Err(ImportError::Parse {
                message: "empty payload".to_string(),
                source_name: source_name.to_string(),
            });
        }

        serde_json::from_str(json).map_err(|e| ImportError::Parse {
            message: e.to_string(),
            source_name: source_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub is_service_session: bool,
    #[serde(default)]
    pub is_plenum_session: bool,
    #[serde(default, alias = "speakers")]
    pub speaker_ids: Vec<RawId>,
    #[serde(default, alias = "categoryItems", alias = "categoryIds")]
    pub choice_ids: Vec<RawId>,
    #[serde(default)]
    pub question_answers: Vec<QuestionAnswerDto>,
    #[serde(default)]
    pub room_id: Option<RawId>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_informed: bool,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerDto {
    pub id: RawId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub is_top_speaker: bool,
    #[serde(default)]
    pub links: Vec<LinkDto>,
    #[serde(default, alias = "sessions")]
    pub session_ids: Vec<RawId>,
    #[serde(default, alias = "categoryItems", alias = "categoryIds")]
    pub choice_ids: Vec<RawId>,
    #[serde(default)]
    pub question_answers: Vec<QuestionAnswerDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: RawId,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceDto {
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemDto>,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswerDto {
    pub question_id: RawId,
    #[serde(default)]
    pub answer_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub link_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn convert_ids(raw: Vec<RawId>) -> Result<Vec<Identifier>> {
    raw.into_iter().map(Identifier::try_from).collect()
}

fn convert_answers(raw: Vec<QuestionAnswerDto>) -> Result<Vec<QuestionAnswer>> {
    raw.into_iter()
        .map(|dto| -> Result<QuestionAnswer> {
            Ok(QuestionAnswer {
                question_id: Identifier::try_from(dto.question_id)?,
                answer_value: dto.answer_value,
            })
        })
        .collect()
}

/// Parses an optional Sessionize timestamp.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS` form, which is
/// read as UTC. Blank text counts as absent.
fn parse_timestamp(
    entity: EntityKind,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<FixedOffset>>> {
    let Some(text) = value else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt));
    }

    trimmed
        .parse::<NaiveDateTime>()
        .map(|naive| Some(naive.and_utc().fixed_offset()))
        .map_err(|_| ImportError::InvalidField {
            entity,
            field,
            value: text.clone(),
        })
}

impl TryFrom<SessionDto> for Session {
    type Error = ImportError;

    fn try_from(dto: SessionDto) -> Result<Self> {
        Ok(Session {
            id: Identifier::try_from(dto.id)?,
            title: dto.title.unwrap_or_default(),
            description: dto.description,
            starts_at: parse_timestamp(EntityKind::Session, "startsAt", dto.starts_at)?,
            ends_at: parse_timestamp(EntityKind::Session, "endsAt", dto.ends_at)?,
            is_service_session: dto.is_service_session,
            is_plenum_session: dto.is_plenum_session,
            speaker_ids: convert_ids(dto.speaker_ids)?,
            choice_ids: convert_ids(dto.choice_ids)?,
            question_answers: convert_answers(dto.question_answers)?,
            room_id: dto.room_id.map(Identifier::try_from).transpose()?,
            live_url: dto.live_url,
            recording_url: dto.recording_url,
            status: dto.status,
            is_informed: dto.is_informed,
            is_confirmed: dto.is_confirmed,
        })
    }
}

impl TryFrom<SpeakerDto> for Speaker {
    type Error = ImportError;

    fn try_from(dto: SpeakerDto) -> Result<Self> {
        let first_name = dto.first_name.unwrap_or_default();
        let last_name = dto.last_name.unwrap_or_default();
        let full_name = match dto.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("{} {}", first_name, last_name).trim().to_string(),
        };

        Ok(Speaker {
            id: Identifier::try_from(dto.id)?,
            first_name,
            last_name,
            full_name,
            bio: dto.bio,
            tag_line: dto.tag_line,
            profile_picture: dto.profile_picture,
            is_top_speaker: dto.is_top_speaker,
            links: dto
                .links
                .into_iter()
                .map(|link| Link {
                    title: link.title.unwrap_or_default(),
                    url: link.url.unwrap_or_default(),
                    link_type: link.link_type.unwrap_or_default(),
                })
                .collect(),
            session_ids: convert_ids(dto.session_ids)?,
            choice_ids: convert_ids(dto.choice_ids)?,
            question_answers: convert_answers(dto.question_answers)?,
        })
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = ImportError;

    fn try_from(dto: QuestionDto) -> Result<Self> {
        Ok(Question {
            id: Identifier::try_from(dto.id)?,
            question: dto.question.unwrap_or_default(),
            question_type: dto.question_type.unwrap_or_default(),
            sort: dto.sort,
        })
    }
}

impl TryFrom<ItemDto> for Item {
    type Error = ImportError;

    fn try_from(dto: ItemDto) -> Result<Self> {
        Ok(Item {
            id: Identifier::try_from(dto.id)?,
            name: dto.name.unwrap_or_default(),
            sort: dto.sort,
        })
    }
}

impl Choice {
    /// Converts a choice group. Items with an invalid id are reported and
    /// dropped; an invalid group id drops the whole group.
    pub fn from_dto(dto: ChoiceDto, sink: &mut dyn ReportSink) -> Result<Self> {
        let id = Identifier::try_from(dto.id)?;
        let mut items: Vec<Item> = convert_all(dto.items, sink);
        items.sort_by_key(|item| item.sort);

        Ok(Choice {
            id,
            title: dto.title.unwrap_or_default(),
            sort: dto.sort,
            items,
        })
    }
}

/// Converts every DTO, reporting and dropping the ones that fail.
pub fn convert_all<D, T>(dtos: Vec<D>, sink: &mut dyn ReportSink) -> Vec<T>
where
    T: TryFrom<D, Error = ImportError>,
{
    dtos.into_iter()
        .filter_map(|dto| match T::try_from(dto) {
            Ok(entity) => Some(entity),
            Err(e) => {
                sink.report(e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_without_offset_is_utc() {
        let dt = parse_timestamp(
            EntityKind::Session,
            "startsAt",
            Some("2023-10-12T09:30:00".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.to_rfc3339(), "2023-10-12T09:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_keeps_offset() {
        let dt = parse_timestamp(
            EntityKind::Session,
            "startsAt",
            Some("2023-10-12T09:30:00+02:00".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_timestamp_blank_is_none() {
        let dt = parse_timestamp(EntityKind::Session, "endsAt", Some("  ".to_string())).unwrap();
        assert!(dt.is_none());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp(EntityKind::Session, "endsAt", Some("noon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidField { field: "endsAt", .. }));
    }
}
