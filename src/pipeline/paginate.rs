//! Pagination: spread one tall capture over fixed-size pages.
//!
//! The capture is scaled uniformly to the page width. Page 1 shows the top
//! of the scaled image; every following page shows the image shifted up by
//! one more page height, until the bottom of the image has been shown:
//!
//! ```text
//! scaled = captured_h * page_w / captured_w
//! page 0: offset 0
//! remaining = scaled - page_h
//! while remaining > 0:
//!     next page: offset remaining - scaled   (= -i * page_h)
//!     remaining -= page_h
//! ```
//!
//! Offsets are in millimetres, positive downwards from the page top, so a
//! negative offset pushes the image above the page edge. The page count is
//! `ceil(scaled / page_h)`, with a minimum of one page.
//!
//! [`PagePlan::source_rows`] turns a page's offset back into the capture's
//! pixel rows, which lets the exporter embed just that slice instead of the
//! whole image.

use crate::config::PageFormat;
use crate::error::ItineraryError;
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// PDF points per millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Where the scaled capture sits on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePlacement {
    /// 0-indexed page number.
    pub index: usize,
    /// Vertical position of the image top relative to the page top, in mm.
    /// Zero on the first page, `-index * page_height` after that.
    pub offset_mm: f64,
}

/// The full pagination of one capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Height of the capture once scaled to the page width.
    pub scaled_height_mm: f64,
    pub captured_width: u32,
    pub captured_height: u32,
    pub placements: Vec<PagePlacement>,
}

impl PagePlan {
    /// Paginate a capture of `captured_width × captured_height` pixels.
    pub fn compute(
        captured_width: u32,
        captured_height: u32,
        format: PageFormat,
    ) -> Result<Self, ItineraryError> {
        if captured_width == 0 || captured_height == 0 {
            return Err(ItineraryError::EmptyRegion {
                width: captured_width as f32,
                height: captured_height as f32,
            });
        }
        let page_w = format.width_mm() as f64;
        let page_h = format.height_mm() as f64;
        if page_w <= 0.0 || page_h <= 0.0 {
            return Err(ItineraryError::InvalidConfig(format!(
                "page size must be positive, got {page_w}x{page_h} mm"
            )));
        }

        let scaled = captured_height as f64 * page_w / captured_width as f64;

        let mut placements = vec![PagePlacement {
            index: 0,
            offset_mm: 0.0,
        }];
        let mut remaining = scaled - page_h;
        while remaining > 0.0 {
            placements.push(PagePlacement {
                index: placements.len(),
                offset_mm: remaining - scaled,
            });
            remaining -= page_h;
        }

        Ok(Self {
            page_width_mm: page_w,
            page_height_mm: page_h,
            scaled_height_mm: scaled,
            captured_width,
            captured_height,
            placements,
        })
    }

    pub fn page_count(&self) -> usize {
        self.placements.len()
    }

    /// Capture pixels per millimetre of page.
    fn pixels_per_mm(&self) -> f64 {
        self.captured_width as f64 / self.page_width_mm
    }

    /// Pixel rows of the capture visible on page `index`.
    ///
    /// Adjacent pages yield adjacent ranges; together they cover every row
    /// exactly once.
    pub fn source_rows(&self, index: usize) -> Range<u32> {
        let Some(placement) = self.placements.get(index) else {
            return 0..0;
        };
        let k = self.pixels_per_mm();
        let top_mm = -placement.offset_mm;
        let start = ((top_mm * k).round() as u32).min(self.captured_height);
        let end = if index + 1 == self.placements.len() {
            self.captured_height
        } else {
            (((top_mm + self.page_height_mm) * k).round() as u32).min(self.captured_height)
        };
        start..end.max(start)
    }

    /// Height in millimetres that `rows` occupy on the page.
    pub fn rows_height_mm(&self, rows: &Range<u32>) -> f64 {
        (rows.end - rows.start) as f64 / self.pixels_per_mm()
    }
}

/// Copy the given rows out of the capture.
pub fn crop_rows(image: &RgbaImage, rows: Range<u32>) -> RgbaImage {
    let height = rows.end.saturating_sub(rows.start);
    imageops::crop_imm(image, 0, rows.start, image.width(), height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const A4_H: f64 = 297.0;

    #[test]
    fn short_capture_is_one_page() {
        let plan = PagePlan::compute(1190, 800, PageFormat::A4).unwrap();
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.placements[0].offset_mm, 0.0);
        assert_eq!(plan.source_rows(0), 0..800);
    }

    #[test]
    fn scaled_height_preserves_aspect_ratio() {
        let plan = PagePlan::compute(1000, 3000, PageFormat::A4).unwrap();
        assert!((plan.scaled_height_mm - 630.0).abs() < 1e-9);
    }

    #[test]
    fn page_count_is_ceil_of_scaled_over_page_height() {
        for height in [1u32, 500, 1414, 1415, 2828, 2829, 5000, 12345, 40000] {
            let plan = PagePlan::compute(1000, height, PageFormat::A4).unwrap();
            let expected = (plan.scaled_height_mm / A4_H).ceil().max(1.0) as usize;
            assert_eq!(plan.page_count(), expected, "height {height}");
        }
    }

    #[test]
    fn exact_multiple_adds_no_blank_page() {
        // 210 mm wide, 594 mm tall once scaled: exactly two pages.
        let plan = PagePlan::compute(210, 594, PageFormat::A4).unwrap();
        assert_eq!(plan.scaled_height_mm, 594.0);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn each_page_shifts_by_one_page_height() {
        let plan = PagePlan::compute(1190, 9000, PageFormat::A4).unwrap();
        for p in &plan.placements {
            let expected = -(p.index as f64) * A4_H;
            assert!(
                (p.offset_mm - expected).abs() < 1e-6,
                "page {}: {} vs {}",
                p.index,
                p.offset_mm,
                expected
            );
        }
    }

    #[test]
    fn source_rows_tile_the_capture() {
        let plan = PagePlan::compute(1190, 7777, PageFormat::A4).unwrap();
        let mut next = 0;
        for i in 0..plan.page_count() {
            let rows = plan.source_rows(i);
            assert_eq!(rows.start, next, "page {i} starts where the previous ended");
            assert!(rows.end > rows.start);
            next = rows.end;
        }
        assert_eq!(next, 7777);
        assert_eq!(plan.source_rows(99), 0..0);
    }

    #[test]
    fn full_page_slice_is_page_height() {
        let plan = PagePlan::compute(1190, 7777, PageFormat::A4).unwrap();
        let rows = plan.source_rows(0);
        assert!((plan.rows_height_mm(&rows) - A4_H).abs() < 0.5);
    }

    #[test]
    fn every_page_slice_matches_its_offset() {
        // The slice embedded on page i must be exactly the rows the full
        // image would show at that page's offset.
        for (width, height) in [(1190_u32, 7777_u32), (1000, 12345), (1190, 40000)] {
            let plan = PagePlan::compute(width, height, PageFormat::A4).unwrap();
            let px_per_mm = width as f64 / plan.page_width_mm;
            let last = plan.page_count() - 1;
            for p in &plan.placements {
                let rows = plan.source_rows(p.index);
                let expected_start = (-p.offset_mm * px_per_mm).round() as u32;
                assert_eq!(rows.start, expected_start, "{height}px, page {}", p.index);
                if p.index < last {
                    let slice_mm = plan.rows_height_mm(&rows);
                    assert!(
                        (slice_mm - A4_H).abs() < 0.5,
                        "{height}px, page {}: {slice_mm} mm",
                        p.index
                    );
                } else {
                    assert_eq!(rows.end, height);
                    assert!(plan.rows_height_mm(&rows) <= A4_H + 0.5);
                }
            }
        }
    }

    #[test]
    fn zero_sized_capture_is_rejected() {
        assert!(matches!(
            PagePlan::compute(0, 10, PageFormat::A4),
            Err(ItineraryError::EmptyRegion { .. })
        ));
        assert!(PagePlan::compute(10, 0, PageFormat::A4).is_err());
    }

    #[test]
    fn crop_rows_copies_the_slice() {
        let mut img = RgbaImage::from_pixel(4, 10, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 6, Rgba([255, 0, 0, 255]));
        let slice = crop_rows(&img, 5..8);
        assert_eq!(slice.dimensions(), (4, 3));
        assert_eq!(slice.get_pixel(0, 1), &Rgba([255, 0, 0, 255]));
    }
}
