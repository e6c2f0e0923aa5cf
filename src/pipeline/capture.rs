//! Region capture: draw the laid-out itinerary and rasterise it.
//!
//! The region is drawn onto a single PDF page exactly its own size, then
//! rendered at `scale` pixels per point. With the default scale of 2 an A4
//! wide region (595 pt) becomes a 1190 px wide raster, sharp enough that the
//! text survives being stretched back over the page width on export.
//!
//! Text is drawn with the configured TrueType fonts when there are any,
//! otherwise with the built-in Helvetica faces.
//!
//! pdfium is not async-safe, so [`capture_region`] moves the work onto the
//! blocking pool with `tokio::task::spawn_blocking`.

use crate::config::PlannerConfig;
use crate::error::ItineraryError;
use crate::pipeline::engine::{bind_pdfium, colour};
use crate::pipeline::layout::{BoxRect, FontStyle, Region};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// TrueType font files to draw with; no regular font selects the
/// built-in faces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFiles {
    pub regular: Option<PathBuf>,
    /// Headings; falls back to `regular`.
    pub bold: Option<PathBuf>,
}

impl FontFiles {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            regular: config.font_path.clone(),
            bold: config.bold_font_path.clone(),
        }
    }
}

/// Font file contents, read before pdfium is bound.
struct FontData {
    regular: (PathBuf, Vec<u8>),
    bold: Option<(PathBuf, Vec<u8>)>,
}

fn read_font(path: &Path) -> Result<(PathBuf, Vec<u8>), ItineraryError> {
    let bytes = std::fs::read(path).map_err(|e| ItineraryError::FontLoadFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok((path.to_path_buf(), bytes))
}

fn read_fonts(files: &FontFiles) -> Result<Option<FontData>, ItineraryError> {
    let Some(regular) = files.regular.as_deref() else {
        return Ok(None);
    };
    Ok(Some(FontData {
        regular: read_font(regular)?,
        bold: files.bold.as_deref().map(read_font).transpose()?,
    }))
}

fn load_font(
    document: &mut PdfDocument<'_>,
    (path, bytes): &(PathBuf, Vec<u8>),
) -> Result<PdfFontToken, ItineraryError> {
    document
        .fonts_mut()
        .load_true_type_from_bytes(bytes, true)
        .map_err(|e| ItineraryError::FontLoadFailed {
            path: path.clone(),
            detail: format!("{:?}", e),
        })
}

/// Rasterise `region` at `scale` device pixels per point.
pub async fn capture_region(
    region: Region,
    scale: f32,
    fonts: FontFiles,
    pdfium_lib: Option<PathBuf>,
) -> Result<RgbaImage, ItineraryError> {
    tokio::task::spawn_blocking(move || {
        capture_region_blocking(&region, scale, &fonts, pdfium_lib.as_deref())
    })
    .await
    .map_err(|e| ItineraryError::Internal(format!("Capture task panicked: {}", e)))?
}

/// Blocking implementation of the capture.
pub fn capture_region_blocking(
    region: &Region,
    scale: f32,
    fonts: &FontFiles,
    pdfium_lib: Option<&Path>,
) -> Result<RgbaImage, ItineraryError> {
    if region.width <= 0.0 || region.height <= 0.0 {
        return Err(ItineraryError::EmptyRegion {
            width: region.width,
            height: region.height,
        });
    }

    let font_data = read_fonts(fonts)?;
    let pdfium = bind_pdfium(pdfium_lib)?;
    let fail = |e: PdfiumError| ItineraryError::CaptureFailed(format!("{:?}", e));

    let mut document = pdfium.create_new_pdf().map_err(fail)?;
    let (regular, bold) = match &font_data {
        Some(data) => {
            let regular = load_font(&mut document, &data.regular)?;
            let bold = match &data.bold {
                Some(bold) => load_font(&mut document, bold)?,
                None => regular,
            };
            debug!("Drawing with {}", data.regular.0.display());
            (regular, bold)
        }
        None => (
            document.fonts_mut().helvetica(),
            document.fonts_mut().helvetica_bold(),
        ),
    };

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::new_custom(
            PdfPoints::new(region.width),
            PdfPoints::new(region.height),
        ))
        .map_err(fail)?;

    let full = BoxRect {
        x: 0.0,
        top: 0.0,
        width: region.width,
        height: region.height,
    };
    fill_rect(&mut page, region.height, &full, colour(region.background)).map_err(fail)?;
    for card in &region.cards {
        fill_rect(&mut page, region.height, card, colour(region.card_fill)).map_err(fail)?;
    }

    for line in &region.lines {
        if line.text.trim().is_empty() {
            continue;
        }
        let font = match line.style {
            FontStyle::Regular => regular,
            FontStyle::Bold => bold,
        };
        let mut object = page
            .objects_mut()
            .create_text_object(
                PdfPoints::new(line.x),
                PdfPoints::new(region.height - line.baseline),
                &line.text,
                font,
                PdfPoints::new(line.size),
            )
            .map_err(fail)?;
        object.set_fill_color(colour(line.colour)).map_err(fail)?;
    }

    for rule in &region.rules {
        fill_rect(&mut page, region.height, rule, colour(region.text_colour)).map_err(fail)?;
    }

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let bitmap = page.render_with_config(&render_config).map_err(fail)?;
    let image = bitmap.as_image().to_rgba8();

    debug!(
        "Captured region {:.0}x{:.0} pt → {}x{} px (scale {})",
        region.width,
        region.height,
        image.width(),
        image.height(),
        scale
    );
    info!("Captured {} cards", region.cards.len());

    Ok(image)
}

/// Fill a top-measured box on a page whose height is `page_height` points.
fn fill_rect(
    page: &mut PdfPage,
    page_height: f32,
    rect: &BoxRect,
    fill: PdfColor,
) -> Result<(), PdfiumError> {
    let bottom = page_height - (rect.top + rect.height);
    let top = page_height - rect.top;
    page.objects_mut().create_path_object_rect(
        PdfRect::new_from_values(bottom, rect.x, top, rect.x + rect.width),
        None,
        None,
        Some(fill),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_region_is_rejected_before_binding() {
        let region = Region {
            width: 595.0,
            height: 0.0,
            background: crate::pipeline::layout::Rgb(0, 0, 0),
            card_fill: crate::pipeline::layout::Rgb(0, 0, 0),
            text_colour: crate::pipeline::layout::Rgb(255, 255, 255),
            cards: vec![],
            rules: vec![],
            lines: vec![],
        };
        let err = capture_region_blocking(&region, 2.0, &FontFiles::default(), None).unwrap_err();
        assert!(matches!(err, ItineraryError::EmptyRegion { .. }));
    }

    #[test]
    fn missing_font_file_is_reported_before_binding() {
        let region = crate::export::render_region("Day 1: Hotel ₹2,500", &PlannerConfig::default());
        let fonts = FontFiles {
            regular: Some(PathBuf::from("/definitely/not/NotoSans-Regular.ttf")),
            bold: None,
        };
        let err = capture_region_blocking(&region, 2.0, &fonts, None).unwrap_err();
        match err {
            ItineraryError::FontLoadFailed { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/NotoSans-Regular.ttf"));
            }
            other => panic!("expected FontLoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn fonts_follow_config() {
        let config = PlannerConfig::builder()
            .font_path("/fonts/a.ttf")
            .build()
            .unwrap();
        let fonts = FontFiles::from_config(&config);
        assert_eq!(fonts.regular, Some(PathBuf::from("/fonts/a.ttf")));
        assert_eq!(fonts.bold, None);
        assert_eq!(FontFiles::from_config(&PlannerConfig::default()), FontFiles::default());
    }
}
