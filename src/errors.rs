use thiserror::Error;

use crate::types::{EntityKind, Identifier, ReferenceContext};

/// Errors that can occur while importing and resolving an event.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid identifier: '{value}'")]
    InvalidIdentifier { value: String },

    #[error("invalid {field} on {entity}: '{value}'")]
    InvalidField {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    #[error("duplicate {kind} id {id}")]
    DuplicateIdentifier { kind: EntityKind, id: Identifier },

    #[error("unresolved reference {id} ({context})")]
    UnresolvedReference {
        id: Identifier,
        context: ReferenceContext,
    },

    #[error("{count} unresolved references exceed the limit of {limit}")]
    TooManyUnresolved { count: usize, limit: usize },

    #[error("parse error: {message} (source: {source_name})")]
    Parse {
        message: String,
        source_name: String,
    },

    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("fetch error: {message} (url: {url})")]
    Fetch { message: String, url: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `ImportError`.
pub type Result<T> = std::result::Result<T, ImportError>;
