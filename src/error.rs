use std::io;
use thiserror::Error;

/// Failures that can occur while decoding a single EDF file.
///
/// None of these escape [`parse_stream`](crate::reader::parse_stream) or
/// [`parse_file`](crate::reader::parse_file): the record assembler turns every
/// one of them into [`FileRecord::Invalid`](crate::FileRecord::Invalid).
/// They are only visible when the lower level decoders are called directly.
#[derive(Debug, Error)]
pub enum EdfError {
    #[error("Unexpected end of file. Expected {expected} bytes, but got {actual}")]
    UnexpectedEndOfFile { expected: u64, actual: u64 },

    #[error("Malformed header field {field}: {raw:?}")]
    MalformedField { field: &'static str, raw: String },

    #[error("Invalid date format: {date} {time}")]
    InvalidTimestamp { date: String, time: String },

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EdfError {
    pub(crate) fn malformed(field: &'static str, raw: &str) -> Self {
        EdfError::MalformedField {
            field,
            raw: raw.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdfError>;
