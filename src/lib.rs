//! # travel-itinerary
//!
//! Ask a travel-planning service for an itinerary, split the answer into
//! per-day cards, and export the rendered cards as a paginated PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! question
//!  │
//!  ├─ 1. Dispatch  POST {"question"} → {"answer"}; any failure → fixed error text
//!  ├─ 2. Segment   find "Day N:" markers → day list + card split
//!  ├─ 3. Layout    cards → positioned text lines (Markdown bodies)
//!  ├─ 4. Capture   draw the region with pdfium, rasterise at 2×
//!  ├─ 5. Paginate  scale to A4 width, one page-height step per page
//!  └─ 6. Output    multi-page PDF, written atomically as itinerary.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use travel_itinerary::{export_to_file, plan, PlannerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::default(); // http://localhost:8000/query
//!     let output = plan("Plan a 3-day trip to Goa", &config).await?;
//!     for day in &output.days {
//!         println!("{} {}", day.heading, day.body);
//!     }
//!     if output.is_ok() {
//!         let stats = export_to_file(&output.answer, &config).await?;
//!         eprintln!("{} pages", stats.pages);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Segmentation without the network
//!
//! ```rust
//! use travel_itinerary::{parse_days, split_cards};
//!
//! let answer = "Welcome!\nDay 1: Arrive\nDay 2: Beach";
//! assert_eq!(parse_days(answer).len(), 2);   // preamble dropped
//! assert_eq!(split_cards(answer).len(), 3);  // preamble is its own card
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `itinerary` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Export needs a pdfium shared library at runtime: set `PDFIUM_LIB_PATH`
//! or install it where the system loader finds it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportMode, PageFormat, PlannerConfig, PlannerConfigBuilder};
pub use error::{DispatchError, ErrorKind, ItineraryError, CONNECTION_FAILED_MESSAGE};
pub use export::{ask, export_sync, export_to_bytes, export_to_file, plan, render_region};
pub use output::{ExportStats, ExportedDocument, PlanOutput};
pub use pipeline::dispatch::{AnswerSource, HttpDispatcher, QueryRequest, QueryResponse};
pub use pipeline::layout::LayoutOptions;
pub use pipeline::paginate::{PagePlacement, PagePlan};
pub use pipeline::segment::{find_markers, parse_days, split_cards, DayMarker, ItinerarySection};
pub use progress::{ExportProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{PlannerState, Session, SubmitOutcome};
