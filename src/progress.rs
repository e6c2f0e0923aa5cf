//! Progress-callback trait for export events.
//!
//! Inject an [`Arc<dyn ExportProgressCallback>`] via
//! [`crate::config::PlannerConfigBuilder::progress_callback`] to be told
//! when the capture finishes and as each page of the document is assembled.
//!
//! # Example
//!
//! ```rust
//! use travel_itinerary::{ExportProgressCallback, PlannerConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     written: AtomicUsize,
//! }
//!
//! impl ExportProgressCallback for PageCounter {
//!     fn on_page_written(&self, page_num: usize, total_pages: usize) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {}/{}", page_num, total_pages);
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { written: AtomicUsize::new(0) });
//!
//! let config = PlannerConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExportProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the exporter as it works through one export.
///
/// Capture and assembly run on a blocking worker thread, so implementations
/// must be `Send + Sync`. All methods default to no-ops.
pub trait ExportProgressCallback: Send + Sync {
    /// Called once before the region is laid out.
    ///
    /// # Arguments
    /// * `card_count`: number of cards that will be drawn
    fn on_export_start(&self, card_count: usize) {
        let _ = card_count;
    }

    /// Called when the raster capture is available.
    ///
    /// # Arguments
    /// * `width`, `height`: capture size in pixels
    fn on_capture_complete(&self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called after each page has been added to the document.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: pages in the finished document
    fn on_page_written(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once after the document has been saved.
    fn on_export_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation, the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExportProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PlannerConfig`].
pub type ProgressCallback = Arc<dyn ExportProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        cards: AtomicUsize,
        pages: AtomicUsize,
        finished_with: AtomicUsize,
    }

    impl ExportProgressCallback for TrackingCallback {
        fn on_export_start(&self, card_count: usize) {
            self.cards.store(card_count, Ordering::SeqCst);
        }

        fn on_page_written(&self, _page_num: usize, _total_pages: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_export_complete(&self, total_pages: usize) {
            self.finished_with.store(total_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_export_start(3);
        cb.on_capture_complete(1190, 4000);
        cb.on_page_written(1, 2);
        cb.on_export_complete(2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_export_start(4);
        tracker.on_capture_complete(10, 10);
        tracker.on_page_written(1, 2);
        tracker.on_page_written(2, 2);
        tracker.on_export_complete(2);

        assert_eq!(tracker.cards.load(Ordering::SeqCst), 4);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.finished_with.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExportProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_export_start(1);
        cb.on_page_written(1, 1);
    }
}
