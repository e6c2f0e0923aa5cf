//! Serialisable results of planning and exporting.

use crate::config::ExportMode;
use crate::error::ErrorKind;
use crate::pipeline::segment::ItinerarySection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One question/answer exchange, segmented both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutput {
    pub question: String,
    /// The answer verbatim, or the fixed error text when `error` is set.
    pub answer: String,
    /// Structured day list (empty for marker-less answers).
    pub days: Vec<ItinerarySection>,
    /// Cards as drawn.
    pub cards: Vec<ItinerarySection>,
    /// Set when the exchange failed.
    pub error: Option<ErrorKind>,
    pub duration_ms: u64,
}

impl PlanOutput {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Facts about one exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Where the document was written; `None` for in-memory exports.
    pub path: Option<PathBuf>,
    pub pages: usize,
    pub cards: usize,
    pub captured_width: u32,
    pub captured_height: u32,
    /// Capture height once scaled to the page width.
    pub scaled_height_mm: f64,
    pub mode: ExportMode,
    /// Characters the built-in fonts could not draw and that were left
    /// out. Always empty when a TrueType font is configured.
    pub dropped_chars: Vec<char>,
    pub bytes: usize,
    pub capture_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// An exported document held in memory.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub stats: ExportStats,
}
