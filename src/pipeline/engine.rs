//! pdfium binding shared by the capture and document stages.
//!
//! Resolution order: explicit path from the config, then `PDFIUM_LIB_PATH`,
//! then the system library search path. A directory is accepted as well as a
//! file; the platform library name is appended to it.

use crate::error::ItineraryError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bind to a pdfium library. Call from blocking code only.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, ItineraryError> {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

    let bindings = match candidate {
        Some(path) => {
            let path = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(&path).map_err(|e| {
                ItineraryError::PdfiumBindingFailed(format!("{}: {e}", path.display()))
            })?
        }
        None => {
            debug!("Binding system pdfium");
            Pdfium::bind_to_system_library()
                .map_err(|e| ItineraryError::PdfiumBindingFailed(e.to_string()))?
        }
    };

    Ok(Pdfium::new(bindings))
}

/// Convert a layout colour to a pdfium colour.
pub fn colour(rgb: crate::pipeline::layout::Rgb) -> PdfColor {
    PdfColor::new(rgb.0, rgb.1, rgb.2, 255)
}
