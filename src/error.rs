//! Error taxonomy for a single extraction attempt.
//!
//! Every variant is terminal for the attempt that raised it: nothing is retried, and the
//! controller shows the `Display` text to the user as-is.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejections made locally, before any network traffic.
pub enum ValidationError {
    /// Extraction was requested without a selected file.
    #[error("Please upload a file first")]
    NoFile,

    /// The selected file is not a PDF.
    #[error("Please upload a PDF file")]
    NotPdf {
        /// MIME type detected for the file.
        mime_type: String,
    },

    /// The selected file is over the upload limit.
    #[error("File size exceeds 500MB limit")]
    TooLarge {
        /// Size of the file in bytes.
        size: u64,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures talking to the extraction service.
pub enum ExtractionError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    RemoteFailure {
        /// HTTP status code returned by the service.
        status: u16,
        /// The service's `detail`, or a generic message carrying the status.
        message: String,
    },

    /// The service answered with success but the envelope was not usable.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
/// Crate-level error surfaced by the view controller.
pub enum Error {
    /// Local validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The extraction service could not produce a hierarchy.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An extraction is already in flight.
    #[error("An extraction is already in progress")]
    Busy,

    /// Export was requested before any hierarchy was loaded.
    #[error("Nothing to export yet")]
    NothingToExport,

    /// The configuration file exists but could not be parsed.
    #[error("Invalid config {}: {message}", .path.display())]
    Config {
        /// File that was read.
        path: std::path::PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// Local file I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for controller operations.
pub type Result<T> = std::result::Result<T, Error>;
