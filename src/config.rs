//! Configuration types for asking, segmenting and exporting an itinerary.
//!
//! All behaviour is controlled through [`PlannerConfig`], built via its
//! [`PlannerConfigBuilder`]. Keeping every knob in one struct makes it easy
//! to share a config between the dispatcher and the exporter, log it, and
//! diff two runs.

use crate::error::ItineraryError;
use crate::pipeline::layout::LayoutOptions;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Local answering service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/query";

/// Name of the exported document.
pub const DEFAULT_FILE_NAME: &str = "itinerary.pdf";

/// Configuration for a planning session and its exports.
///
/// # Example
/// ```rust
/// use travel_itinerary::{ExportMode, PageFormat, PlannerConfig};
///
/// let config = PlannerConfig::builder()
///     .endpoint("http://127.0.0.1:9000/query")
///     .capture_scale(3.0)
///     .page_format(PageFormat::Letter)
///     .export_mode(ExportMode::RepeatFull)
///     .build()
///     .unwrap();
/// assert_eq!(config.capture_scale, 3.0);
/// ```
#[derive(Clone)]
pub struct PlannerConfig {
    /// URL receiving `POST {"question": …}`. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Per-request timeout in seconds. Default: `None`, the transport's own
    /// behaviour applies and a slow answer is waited for indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Oversampling factor for the raster capture. Range: 0.5–4. Default: 2.
    ///
    /// The capture is taken at `scale` device pixels per layout point, so the
    /// text stays sharp once the raster is stretched to the page width.
    pub capture_scale: f32,

    /// Physical page size of the exported document. Default: A4 portrait.
    pub page_format: PageFormat,

    /// How the tall capture is distributed over pages. Default: [`ExportMode::Crop`].
    pub export_mode: ExportMode,

    /// Geometry and typography of the rendered itinerary cards.
    pub layout: LayoutOptions,

    /// Directory the document is written to. Default: current directory.
    pub output_dir: PathBuf,

    /// File name of the document. Default: [`DEFAULT_FILE_NAME`].
    pub file_name: String,

    /// TrueType font used for all text. Default: `None`, the built-in
    /// Helvetica faces, which cover only WinAnsi; other characters are
    /// substituted or dropped with a warning.
    pub font_path: Option<PathBuf>,

    /// TrueType font for headings. Falls back to `font_path`.
    pub bold_font_path: Option<PathBuf>,

    /// Explicit pdfium library to bind. `PDFIUM_LIB_PATH` is consulted when
    /// this is `None`, then the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Receives export progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            capture_scale: 2.0,
            page_format: PageFormat::default(),
            export_mode: ExportMode::default(),
            layout: LayoutOptions::default(),
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            font_path: None,
            bold_font_path: None,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("capture_scale", &self.capture_scale)
            .field("page_format", &self.page_format)
            .field("export_mode", &self.export_mode)
            .field("layout", &self.layout)
            .field("output_dir", &self.output_dir)
            .field("file_name", &self.file_name)
            .field("font_path", &self.font_path)
            .field("bold_font_path", &self.bold_font_path)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExportProgressCallback>"),
            )
            .finish()
    }
}

impl PlannerConfig {
    /// Create a new builder for `PlannerConfig`.
    pub fn builder() -> PlannerConfigBuilder {
        PlannerConfigBuilder {
            config: Self::default(),
        }
    }

    /// `true` when text is drawn with a configured TrueType font rather
    /// than the built-in faces.
    pub fn has_unicode_font(&self) -> bool {
        self.font_path.is_some()
    }

    /// Full path of the exported document.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// Builder for [`PlannerConfig`].
#[derive(Debug)]
pub struct PlannerConfigBuilder {
    config: PlannerConfig,
}

impl PlannerConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs.max(1));
        self
    }

    pub fn capture_scale(mut self, scale: f32) -> Self {
        self.config.capture_scale = scale.clamp(0.5, 4.0);
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.config.page_format = format;
        self
    }

    pub fn export_mode(mut self, mode: ExportMode) -> Self {
        self.config.export_mode = mode;
        self
    }

    pub fn layout(mut self, layout: LayoutOptions) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn bold_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.bold_font_path = Some(path.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PlannerConfig, ItineraryError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(ItineraryError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got '{}'",
                c.endpoint
            )));
        }
        if c.file_name.trim().is_empty() {
            return Err(ItineraryError::InvalidConfig(
                "file name must not be empty".into(),
            ));
        }
        if c.bold_font_path.is_some() && c.font_path.is_none() {
            return Err(ItineraryError::InvalidConfig(
                "a bold font needs a regular font as well".into(),
            ));
        }
        if c.layout.width <= 2.0 * c.layout.card_padding {
            return Err(ItineraryError::InvalidConfig(format!(
                "layout width {} leaves no room inside {} pt padding",
                c.layout.width, c.layout.card_padding
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Physical page size of the exported document, portrait orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    /// 210 × 297 mm (default).
    #[default]
    A4,
    /// 215.9 × 279.4 mm.
    Letter,
    /// Any other portrait size, in millimetres.
    Custom { width_mm: f32, height_mm: f32 },
}

impl PageFormat {
    pub fn width_mm(&self) -> f32 {
        match self {
            PageFormat::A4 => 210.0,
            PageFormat::Letter => 215.9,
            PageFormat::Custom { width_mm, .. } => *width_mm,
        }
    }

    pub fn height_mm(&self) -> f32 {
        match self {
            PageFormat::A4 => 297.0,
            PageFormat::Letter => 279.4,
            PageFormat::Custom { height_mm, .. } => *height_mm,
        }
    }
}

/// How the captured raster is spread over the document pages.
///
/// Both modes show exactly the same rows of the capture on each page; they
/// differ only in what is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportMode {
    /// Embed only the slice of rows visible on each page (default).
    #[default]
    Crop,
    /// Embed the full capture on every page, shifted up by one page height
    /// per page. Page size grows with the page count.
    RepeatFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let c = PlannerConfig::default();
        assert_eq!(c.endpoint, "http://localhost:8000/query");
        assert_eq!(c.capture_scale, 2.0);
        assert_eq!(c.page_format, PageFormat::A4);
        assert_eq!(c.request_timeout_secs, None);
        assert_eq!(c.output_path(), PathBuf::from("./itinerary.pdf"));
    }

    #[test]
    fn scale_is_clamped() {
        let c = PlannerConfig::builder().capture_scale(100.0).build().unwrap();
        assert_eq!(c.capture_scale, 4.0);
        let c = PlannerConfig::builder().capture_scale(0.0).build().unwrap();
        assert_eq!(c.capture_scale, 0.5);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = PlannerConfig::builder()
            .endpoint("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ItineraryError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_blank_file_name() {
        assert!(PlannerConfig::builder().file_name("  ").build().is_err());
    }

    #[test]
    fn bold_font_needs_regular_font() {
        assert!(PlannerConfig::builder()
            .bold_font_path("/fonts/NotoSans-Bold.ttf")
            .build()
            .is_err());
        let c = PlannerConfig::builder()
            .font_path("/fonts/NotoSans-Regular.ttf")
            .bold_font_path("/fonts/NotoSans-Bold.ttf")
            .build()
            .unwrap();
        assert!(c.has_unicode_font());
        assert!(!PlannerConfig::default().has_unicode_font());
    }

    #[test]
    fn a4_dimensions() {
        assert_eq!(PageFormat::A4.width_mm(), 210.0);
        assert_eq!(PageFormat::A4.height_mm(), 297.0);
        let custom = PageFormat::Custom {
            width_mm: 100.0,
            height_mm: 150.0,
        };
        assert_eq!(custom.height_mm(), 150.0);
    }
}
