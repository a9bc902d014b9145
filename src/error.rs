//! Error types for exam assembly operations.

use thiserror::Error;

use crate::latex::Slot;

/// Errors that can occur while parsing a descriptor, selecting variants,
/// or rendering document sources.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("no templates registered for language '{language}'")]
    UnsupportedLanguage { language: String },

    #[error("bank holds {available} questions but {requested} were requested per variant")]
    InsufficientQuestions { requested: usize, available: usize },

    #[error("template slot {slot:?} missing for language '{language}'")]
    MissingTemplateSlot { slot: Slot, language: String },

    #[error("answer key serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
