//! Top-level entry points: ask, plan, and export.
//!
//! ```text
//! question ──▶ dispatch ──▶ answer ──▶ split_cards ──▶ lay_out ──▶ capture ──▶ paginate ──▶ PDF
//! ```
//!
//! [`plan`] covers the left half and never fails on a network problem; the
//! failure is folded into [`PlanOutput::error`] with the fixed error text as
//! the answer. The export functions cover the right half and fail loudly
//! ([`ItineraryError`]) rather than write an empty or partial document.

use crate::config::PlannerConfig;
use crate::error::{DispatchError, ItineraryError};
use crate::output::{ExportStats, ExportedDocument, PlanOutput};
use crate::pipeline::dispatch::{is_blank, AnswerSource, HttpDispatcher};
use crate::pipeline::capture::FontFiles;
use crate::pipeline::layout::{self, Region};
use crate::pipeline::paginate::PagePlan;
use crate::pipeline::segment::ItinerarySection;
use crate::pipeline::{capture, document, fonts, segment};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Send one question to the configured endpoint.
pub async fn ask(question: &str, config: &PlannerConfig) -> Result<String, DispatchError> {
    if is_blank(question) {
        return Err(DispatchError::EmptyQuery);
    }
    HttpDispatcher::new(config)?.ask(question).await
}

/// Ask and segment in one step.
///
/// # Errors
/// Only [`DispatchError::EmptyQuery`]: a blank question sends nothing and
/// produces nothing. Every other failure is reported inside the output.
pub async fn plan(question: &str, config: &PlannerConfig) -> Result<PlanOutput, DispatchError> {
    let start = Instant::now();
    match ask(question, config).await {
        Ok(answer) => Ok(PlanOutput {
            question: question.to_string(),
            days: segment::parse_days(&answer),
            cards: segment::split_cards(&answer),
            answer,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }),
        Err(DispatchError::EmptyQuery) => Err(DispatchError::EmptyQuery),
        Err(e) => {
            let answer = e.user_message().to_string();
            Ok(PlanOutput {
                question: question.to_string(),
                days: Vec::new(),
                cards: segment::split_cards(&answer),
                answer,
                error: e.kind(),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Cards of `answer` fitted to the fonts `config` draws with, and the
/// characters those fonts cannot draw.
fn drawable_cards(answer: &str, config: &PlannerConfig) -> (Vec<ItinerarySection>, Vec<char>) {
    let mut cards = segment::split_cards(answer);
    if config.has_unicode_font() {
        return (cards, Vec::new());
    }
    let dropped = fonts::fit_sections(&mut cards);
    (cards, dropped)
}

/// Lay out the cards of `answer` as they would be drawn.
pub fn render_region(answer: &str, config: &PlannerConfig) -> Region {
    layout::lay_out(&drawable_cards(answer, config).0, &config.layout)
}

/// Export `answer` as a paginated PDF held in memory.
pub async fn export_to_bytes(
    answer: &str,
    config: &PlannerConfig,
) -> Result<ExportedDocument, ItineraryError> {
    let total_start = Instant::now();
    if answer.is_empty() {
        return Err(ItineraryError::NothingToExport);
    }

    // ── Step 1: Lay out the cards ────────────────────────────────────────
    let (cards, dropped_chars) = drawable_cards(answer, config);
    if !dropped_chars.is_empty() {
        let list: String = dropped_chars.iter().collect();
        warn!(
            "{} characters cannot be drawn with the built-in fonts and are left out: {}. \
             Configure a TrueType font to keep them.",
            dropped_chars.len(),
            list
        );
    }
    if let Some(ref cb) = config.progress_callback {
        cb.on_export_start(cards.len());
    }
    let region = layout::lay_out(&cards, &config.layout);

    // ── Step 2: Capture ──────────────────────────────────────────────────
    let capture_start = Instant::now();
    let image = capture::capture_region(
        region,
        config.capture_scale,
        FontFiles::from_config(config),
        config.pdfium_lib_path.clone(),
    )
    .await?;
    let capture_duration_ms = capture_start.elapsed().as_millis() as u64;
    let (captured_width, captured_height) = image.dimensions();
    if let Some(ref cb) = config.progress_callback {
        cb.on_capture_complete(captured_width, captured_height);
    }

    // ── Step 3: Paginate ─────────────────────────────────────────────────
    let plan = PagePlan::compute(captured_width, captured_height, config.page_format)?;
    let pages = plan.page_count();
    let scaled_height_mm = plan.scaled_height_mm;
    info!(
        "Capture {}x{} px → {:.1} mm tall → {} pages",
        captured_width, captured_height, scaled_height_mm, pages
    );

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let bytes = document::build_pdf(
        image,
        plan,
        config.export_mode,
        config.pdfium_lib_path.clone(),
        config.progress_callback.clone(),
    )
    .await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_export_complete(pages);
    }

    let stats = ExportStats {
        path: None,
        pages,
        cards: cards.len(),
        captured_width,
        captured_height,
        scaled_height_mm,
        mode: config.export_mode,
        dropped_chars,
        bytes: bytes.len(),
        capture_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ExportedDocument { bytes, stats })
}

/// Export `answer` to [`PlannerConfig::output_path`].
///
/// Uses atomic write (temp file + rename) so a failed export never leaves a
/// truncated document behind.
pub async fn export_to_file(
    answer: &str,
    config: &PlannerConfig,
) -> Result<ExportStats, ItineraryError> {
    let exported = export_to_bytes(answer, config).await?;
    let path = config.output_path();
    write_atomic(&path, &exported.bytes).await?;

    info!(
        "Wrote {} ({} pages, {} bytes)",
        path.display(),
        exported.stats.pages,
        exported.stats.bytes
    );

    Ok(ExportStats {
        path: Some(path),
        ..exported.stats
    })
}

/// Synchronous wrapper around [`export_to_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn export_sync(answer: &str, config: &PlannerConfig) -> Result<ExportStats, ItineraryError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ItineraryError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(export_to_file(answer, config))
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ItineraryError> {
    let write_err = |source: std::io::Error| ItineraryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = temp_path_for(path);
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        warn!("Rename of {} failed: {}", tmp_path.display(), e);
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
