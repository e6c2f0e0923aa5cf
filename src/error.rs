//! Error types for the travel-itinerary library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DispatchError`]: the question could not be answered. Every variant
//!   except [`DispatchError::EmptyQuery`] collapses to
//!   [`ErrorKind::ConnectionFailed`], and the user only ever sees
//!   [`CONNECTION_FAILED_MESSAGE`]. The variants exist so that callers (and
//!   the logs) can still tell a timeout from a 500 without changing what the
//!   user is shown.
//!
//! * [`ItineraryError`]: **fatal**. An export or configuration problem that
//!   must abort the operation rather than write a corrupt document.

use std::path::PathBuf;
use thiserror::Error;

/// The fixed text shown in place of an answer when dispatch fails.
pub const CONNECTION_FAILED_MESSAGE: &str = "❌ Error connecting to server";

/// Coarse, user-facing classification of a dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Any transport or protocol failure.
    ConnectionFailed,
}

impl ErrorKind {
    /// The message shown to the user for this kind of failure.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::ConnectionFailed => CONNECTION_FAILED_MESSAGE,
        }
    }
}

/// Why a single question/answer exchange failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The question had no non-whitespace character; nothing was sent.
    #[error("question is empty")]
    EmptyQuery,

    /// Connection refused, DNS failure, TLS error, reset mid-body …
    #[error("transport error talking to '{endpoint}': {detail}")]
    Transport { endpoint: String, detail: String },

    /// The configured request timeout elapsed.
    #[error("request to '{endpoint}' timed out")]
    Timeout { endpoint: String },

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint '{endpoint}' returned HTTP {code}")]
    Status { endpoint: String, code: u16 },

    /// 2xx, but the body was not `{"answer": "<string>"}`.
    #[error("malformed response from '{endpoint}': {detail}")]
    MalformedBody { endpoint: String, detail: String },
}

impl DispatchError {
    /// Collapse the failure into its user-facing kind.
    ///
    /// Returns `None` for [`DispatchError::EmptyQuery`], which is not a
    /// failure the user sees: a blank question is simply ignored.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DispatchError::EmptyQuery => None,
            _ => Some(ErrorKind::ConnectionFailed),
        }
    }

    /// The fixed text to display instead of an answer.
    pub fn user_message(&self) -> &'static str {
        ErrorKind::ConnectionFailed.user_message()
    }
}

/// All fatal errors returned by the travel-itinerary library.
#[derive(Debug, Error)]
pub enum ItineraryError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Export errors ─────────────────────────────────────────────────────
    /// There is no answer to export.
    #[error("Nothing to export: the answer is empty")]
    NothingToExport,

    /// The laid-out region has zero width or height.
    #[error("Rendered region is empty ({width}x{height} pt)")]
    EmptyRegion { width: f32, height: f32 },

    /// Drawing or rasterising the itinerary region failed.
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// A configured TrueType font could not be read or loaded.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoadFailed { path: PathBuf, detail: String },

    /// pdfium could not build the paginated document.
    #[error("Failed to assemble page {page}: {detail}")]
    PageAssemblyFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium \
to use a specific copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
