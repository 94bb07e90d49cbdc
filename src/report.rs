//! Reporting channel for non-fatal import errors.
//!
//! Dropped entities and unresolved references do not stop an import. They are
//! handed to a [`ReportSink`] instead, which the caller chooses.

use tracing::{error, warn};

use crate::errors::ImportError;

/// Receives errors that do not abort the import.
pub trait ReportSink {
    fn report(&mut self, error: ImportError);
}

/// Collects reported errors, mostly useful in tests.
impl ReportSink for Vec<ImportError> {
    fn report(&mut self, error: ImportError) {
        self.push(error);
    }
}

/// Emits every reported error as a `tracing` event and counts them.
#[derive(Debug, Default)]
pub struct TracingSink {
    reported: usize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors reported so far.
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl ReportSink for TracingSink {
    fn report(&mut self, err: ImportError) {
        self.reported += 1;
        match &err {
            ImportError::UnresolvedReference { id, context } => {
                warn!(%id, %context, "unresolved reference skipped");
            }
            _ => error!(error = %err, "import error"),
        }
    }
}
