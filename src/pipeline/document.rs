//! Document assembly: place the capture on fixed-size pages.
//!
//! In [`ExportMode::Crop`] each page embeds only the rows
//! [`PagePlan::source_rows`] says are visible on it, pinned to the page top.
//! In [`ExportMode::RepeatFull`] every page embeds the whole scaled capture
//! at the plan's (negative) offset and lets the page edge clip it. Both
//! produce the same visible page content.

use crate::config::ExportMode;
use crate::error::ItineraryError;
use crate::pipeline::engine::bind_pdfium;
use crate::pipeline::paginate::{crop_rows, PagePlan, POINTS_PER_MM};
use crate::progress::ProgressCallback;
use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build the paginated PDF and return its bytes.
pub async fn build_pdf(
    image: RgbaImage,
    plan: PagePlan,
    mode: ExportMode,
    pdfium_lib: Option<PathBuf>,
    progress: Option<ProgressCallback>,
) -> Result<Vec<u8>, ItineraryError> {
    tokio::task::spawn_blocking(move || {
        build_pdf_blocking(&image, &plan, mode, pdfium_lib.as_deref(), progress.as_ref())
    })
    .await
    .map_err(|e| ItineraryError::Internal(format!("Document task panicked: {}", e)))?
}

/// Blocking implementation of document assembly.
pub fn build_pdf_blocking(
    image: &RgbaImage,
    plan: &PagePlan,
    mode: ExportMode,
    pdfium_lib: Option<&Path>,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<u8>, ItineraryError> {
    let pdfium = bind_pdfium(pdfium_lib)?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| ItineraryError::PageAssemblyFailed {
            page: 0,
            detail: format!("{:?}", e),
        })?;

    let page_w = plan.page_width_mm;
    let page_h = plan.page_height_mm;
    let total = plan.page_count();
    let full = match mode {
        ExportMode::RepeatFull => Some(DynamicImage::ImageRgba8(image.clone())),
        ExportMode::Crop => None,
    };

    for placement in &plan.placements {
        let page_num = placement.index + 1;
        let fail = |e: PdfiumError| ItineraryError::PageAssemblyFailed {
            page: page_num,
            detail: format!("{:?}", e),
        };

        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::new_custom(
                mm(page_w),
                mm(page_h),
            ))
            .map_err(fail)?;

        match &full {
            Some(full) => {
                // Image top sits `offset_mm` below the page top (above it
                // when negative); PDF y grows upwards from the page bottom.
                let bottom = page_h - (placement.offset_mm + plan.scaled_height_mm);
                page.objects_mut()
                    .create_image_object(
                        mm(0.0),
                        mm(bottom),
                        full,
                        Some(mm(page_w)),
                        Some(mm(plan.scaled_height_mm)),
                    )
                    .map_err(fail)?;
            }
            None => {
                let rows = plan.source_rows(placement.index);
                if rows.is_empty() {
                    // Sub-pixel remainder: the page exists but shows nothing.
                    debug!("Page {}: no rows", page_num);
                    if let Some(cb) = progress {
                        cb.on_page_written(page_num, total);
                    }
                    continue;
                }
                let slice_h = plan.rows_height_mm(&rows);
                let slice = DynamicImage::ImageRgba8(crop_rows(image, rows.clone()));
                page.objects_mut()
                    .create_image_object(
                        mm(0.0),
                        mm(page_h - slice_h),
                        &slice,
                        Some(mm(page_w)),
                        Some(mm(slice_h)),
                    )
                    .map_err(fail)?;
                debug!(
                    "Page {}: rows {}..{} ({:.1} mm)",
                    page_num, rows.start, rows.end, slice_h
                );
            }
        }

        if let Some(cb) = progress {
            cb.on_page_written(page_num, total);
        }
    }

    document
        .save_to_bytes()
        .map_err(|e| ItineraryError::PageAssemblyFailed {
            page: total,
            detail: format!("{:?}", e),
        })
}

fn mm(value: f64) -> PdfPoints {
    PdfPoints::new((value * POINTS_PER_MM) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimetres_to_points() {
        assert!((mm(25.4).value - 72.0).abs() < 1e-3);
        assert!((mm(210.0).value - 595.28).abs() < 0.01);
    }
}
