//! Pipeline stages from question to paginated document.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the pdfium-backed stages can be skipped in tests
//! that only care about text and geometry.
//!
//! ## Data Flow
//!
//! ```text
//! dispatch ──▶ segment ──▶ markdown ──▶ layout ──▶ capture ──▶ paginate ──▶ document
//!  (HTTP)      (markers)    (blocks)     (points)   (pdfium)    (mm math)    (pdfium)
//! ```
//!
//! 1. [`dispatch`]: POST the question, return the answer text; the only
//!    stage with network I/O
//! 2. [`segment`] : find `Day N:` markers; day list and card split
//! 3. [`markdown`]: reduce a card body to headings, paragraphs and list items
//! 4. [`layout`]  : stack cards and wrap their text into positioned lines;
//!    [`fonts`] supplies the glyph widths and the built-in font coverage
//! 5. [`capture`] : draw the region and rasterise it; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 6. [`paginate`]: scale the raster to the page width and cut it into pages
//! 7. [`document`]: embed the page images into the output PDF

pub mod capture;
pub mod dispatch;
pub mod document;
pub mod engine;
pub mod fonts;
pub mod layout;
pub mod markdown;
pub mod paginate;
pub mod segment;
