//! Error types for the rxtract-core library.

use thiserror::Error;

/// Main error type for the rxtract library.
#[derive(Error, Debug)]
pub enum RxtractError {
    /// The selected file is not an image.
    #[error(transparent)]
    Input(#[from] InputValidationError),

    /// The OCR engine could not produce text.
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    /// A session transition was attempted from the wrong state.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Export failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Sharing failed.
    #[error(transparent)]
    Share(#[from] ShareError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Rejected input: the declared MIME type does not describe an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Please upload an image file")]
pub struct InputValidationError {
    /// The MIME type that was declared for the rejected input.
    pub mime_type: String,
}

/// OCR engine failure. The detail is surfaced to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error processing image: {detail}")]
pub struct RecognitionError {
    pub detail: String,
}

impl RecognitionError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Guarded session transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A recognition cycle is already in flight.
    #[error("a recognition is already in progress")]
    Busy,

    /// No image has been selected yet.
    #[error("no image selected")]
    NoImage,

    /// The ticket does not belong to the in-flight cycle.
    #[error("stale recognition ticket {0}")]
    StaleTicket(u64),
}

/// Errors related to exporting a record.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Unknown export format name.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Serialization failed.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Share or clipboard failure. The stored record is never affected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error sharing data: {0}")]
pub struct ShareError(pub String);

/// Result type for the rxtract library.
pub type Result<T> = std::result::Result<T, RxtractError>;
