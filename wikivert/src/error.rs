//! Error types for serialization

use std::fmt;

/// Errors that can occur while serializing a DOM to wikitext
#[derive(Debug, Clone, PartialEq)]
pub enum SerializeError {
    /// The input document could not be parsed into a DOM
    IngestError(String),
    /// Selser was requested but no original source was supplied
    MissingOriginalSource,
    /// A data-mw envelope was too malformed to emit anything from
    BadEnvelope(String),
    /// Error while emitting wikitext
    EmitError(String),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::IngestError(msg) => write!(f, "Ingest error: {msg}"),
            SerializeError::MissingOriginalSource => {
                write!(f, "Selective serialization requires the original source")
            }
            SerializeError::BadEnvelope(msg) => write!(f, "Bad data-mw envelope: {msg}"),
            SerializeError::EmitError(msg) => write!(f, "Emit error: {msg}"),
        }
    }
}

impl std::error::Error for SerializeError {}
