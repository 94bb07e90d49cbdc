use crate::config::DisplayMode;
use crate::errors::Result;
use crate::event::ResolvedEvent;
use crate::types::{ReferenceItem, ResolvedSession, ResolvedSpeaker};

const INDENT: &str = "    ";

/// Comma-separated speaker names of a session, in resolved order.
pub fn speaker_names(session: &ResolvedSession) -> String {
    session
        .speaker_references
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Service sessions have no meaningful id to show.
fn session_label(session: &ResolvedSession) -> String {
    if session.session.is_service_session {
        "SERVICE".to_string()
    } else {
        session.session.id.to_string()
    }
}

fn push_references(out: &mut String, label: &str, references: &[ReferenceItem]) {
    for r in references {
        out.push_str(&format!("\n{}{} {}: {}", INDENT, label, r.id, r.name));
    }
}

/// One-line session summary: id, speakers, title.
pub fn session_display_short(session: &ResolvedSession) -> String {
    format!(
        "{:<7} - Speakers: {:<30} - {}",
        session_label(session),
        speaker_names(session),
        session.session.title
    )
}

/// Session id and title followed by one indented line per choice and per
/// speaker.
pub fn session_display_long(session: &ResolvedSession) -> String {
    let mut out = format!("{:<10} - {}", session_label(session), session.session.title);
    push_references(&mut out, "Choice", &session.choice_references);
    push_references(&mut out, "Speaker", &session.speaker_references);
    out
}

pub fn speaker_display_short(speaker: &ResolvedSpeaker) -> String {
    format!(
        "{} - |Sessions| = {} - {}",
        speaker.speaker.full_name,
        speaker.speaker.session_ids.len(),
        speaker.speaker.id
    )
}

pub fn speaker_display_long(speaker: &ResolvedSpeaker) -> String {
    let mut out = speaker_display_short(speaker);
    push_references(&mut out, "Choice", &speaker.choice_references);
    push_references(&mut out, "Session", &speaker.session_references);
    out
}

pub fn event_display_short(event: &ResolvedEvent) -> String {
    format!(
        "Source = {} - |Sessions| = {} - |Speakers| = {}",
        event.source.as_deref().unwrap_or_default(),
        event.sessions.len(),
        event.speakers.len()
    )
}

/// Formats the whole event as a plain-text report.
///
/// The report starts with the event summary, followed by a `Sessions`
/// and a `Speakers` section rendered at the requested detail level.
pub fn format_event_report(event: &ResolvedEvent, mode: DisplayMode) -> String {
    let mut out = String::new();
    out.push_str(&event_display_short(event));
    out.push_str("\n\n");

    out.push_str("Sessions\n");
    if event.sessions.is_empty() {
        out.push_str("(none)\n");
    }
    for session in &event.sessions {
        let line = match mode {
            DisplayMode::Short => session_display_short(session),
            DisplayMode::Long => session_display_long(session),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str("\nSpeakers\n");
    if event.speakers.is_empty() {
        out.push_str("(none)\n");
    }
    for speaker in &event.speakers {
        let line = match mode {
            DisplayMode::Short => speaker_display_short(speaker),
            DisplayMode::Long => speaker_display_long(speaker),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Formats a resolved event as pretty-printed JSON.
pub fn format_event_as_json(event: &ResolvedEvent) -> Result<String> {
    Ok(serde_json::to_string_pretty(event)?)
}
