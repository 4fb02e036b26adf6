//! Error types for diaryconv operations.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur while converting a diary export.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),

    /// A day entry without a `body` child. The export is corrupt or was mis-parsed.
    #[error("Day entry #{index} has no body element: {context}")]
    MissingBody { index: usize, context: String },

    #[error("Invalid timestamp {value:?} in comment #{comment} of day entry #{post}: {source}")]
    InvalidTimestamp {
        post: usize,
        comment: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
