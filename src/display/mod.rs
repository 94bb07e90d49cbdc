/// Log-style text and JSON renderings of a resolved event.
pub mod formatter;

pub use formatter::{
    event_display_short, format_event_as_json, format_event_report, session_display_long,
    session_display_short, speaker_display_long, speaker_display_short, speaker_names,
};
