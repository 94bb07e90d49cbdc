use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::{is_remote_source, ImporterConfig};
use crate::dto::AllDataDto;
use crate::errors::{ImportError, Result};
use crate::event::{RawEvent, ResolvedEvent};
use crate::report::ReportSink;

/// Reads an event payload from a file or URL and runs it through parsing,
/// indexing and resolution.
///
/// Non-fatal problems go to the caller's `ReportSink`. Anything that leaves
/// no usable event (unreadable source, unparseable payload, duplicate ids,
/// too many unresolved references) is returned as an error.
pub struct EventImporter {
    config: ImporterConfig,
    agent: ureq::Agent,
}

impl EventImporter {
    /// Creates an importer with an HTTP agent configured from `config`.
    pub fn new(config: ImporterConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.fetch_timeout_secs)))
            .build()
            .into();
        Self { config, agent }
    }

    /// Imports from a file path or an `http(s)://` URL.
    pub fn import(&self, source: &str, sink: &mut dyn ReportSink) -> Result<ResolvedEvent> {
        if is_remote_source(source) {
            self.import_from_url(source, sink)
        } else {
            self.import_from_file(Path::new(source), sink)
        }
    }

    pub fn import_from_file(
        &self,
        path: &Path,
        sink: &mut dyn ReportSink,
    ) -> Result<ResolvedEvent> {
        let source = path.display().to_string();
        info!(file = %source, "importing event file");

        let json = std::fs::read_to_string(path).map_err(|e| {
            log_import_error(
                &source,
                ImportError::File {
                    message: e.to_string(),
                    path: source.clone(),
                },
            )
        })?;

        self.import_from_json(&json, &source, sink)
    }

    pub fn import_from_url(&self, url: &str, sink: &mut dyn ReportSink) -> Result<ResolvedEvent> {
        info!(%url, "fetching event data");

        let json = self.fetch(url).map_err(|e| log_import_error(url, e))?;

        self.import_from_json(&json, url, sink)
    }

    /// Parses, indexes and resolves a JSON payload. `source` labels the event
    /// and any error messages.
    pub fn import_from_json(
        &self,
        json: &str,
        source: &str,
        sink: &mut dyn ReportSink,
    ) -> Result<ResolvedEvent> {
        let start = Instant::now();

        let all = AllDataDto::from_json(json, source).map_err(|e| log_import_error(source, e))?;
        let raw = RawEvent::from_dto(all, Some(source.to_string()), sink);
        let indexed = raw.index().map_err(|e| log_import_error(source, e))?;

        let event = match self.config.max_unresolved {
            Some(limit) => indexed
                .resolve_within(limit, sink)
                .map_err(|e| log_import_error(source, e))?,
            None => indexed.resolve(sink),
        };

        info!(
            %source,
            sessions = event.sessions.len(),
            speakers = event.speakers.len(),
            unresolved = event.unresolved_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "imported event"
        );

        Ok(event)
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let fetch_error = |message: String| ImportError::Fetch {
            message,
            url: url.to_string(),
        };

        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| fetch_error(e.to_string()))
    }
}

/// Logs why an import produced no event and hands the error back.
fn log_import_error(source: &str, err: ImportError) -> ImportError {
    error!(%source, error = %err, "unable to import data");
    err
}
