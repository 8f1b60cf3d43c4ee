//! Page rasterisation: render the first page of a PDF to a `DynamicImage`.
//!
//! ## Why a trait?
//!
//! pdfium is a native library that may not be present on a test machine.
//! [`PageRasterizer`] is the seam between the extractor and pdfium: the
//! production [`PdfiumRasterizer`] binds the real library, tests plug in a
//! fake that hands back a canned bitmap (or no page at all).
//!
//! ## Why spawn_blocking?
//!
//! pdfium uses thread-local state internally and is CPU-bound.
//! [`render_first_page`] moves the work onto Tokio's blocking pool so a
//! slow render never stalls the executor serving other sessions.

use crate::error::ExtractError;
use bytes::Bytes;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Something that can turn PDF bytes into an image of page one.
pub trait PageRasterizer: Send + Sync {
    /// Render the first page of `pdf`.
    ///
    /// Returns `Ok(None)` when the document opens but has zero pages.
    fn render_first_page(&self, pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError>;
}

/// Run a rasterizer on the blocking thread pool.
pub async fn render_first_page(
    rasterizer: Arc<dyn PageRasterizer>,
    pdf: Bytes,
) -> Result<Option<DynamicImage>, ExtractError> {
    tokio::task::spawn_blocking(move || rasterizer.render_first_page(&pdf))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {e}")))?
}

/// [`PageRasterizer`] backed by the pdfium library.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    lib_path: Option<PathBuf>,
    max_pixels: u32,
}

impl PdfiumRasterizer {
    /// `lib_path` points at a pdfium shared library; `None` searches the
    /// working directory and then the system library path.
    pub fn new(lib_path: Option<PathBuf>, max_pixels: u32) -> Self {
        Self {
            lib_path,
            max_pixels: max_pixels.max(100),
        }
    }

    fn bind(&self) -> Result<Pdfium, ExtractError> {
        let bindings = match &self.lib_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_first_page(&self, pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
        let pdfium = self.bind()?;

        let document = pdfium.load_pdf_from_byte_slice(pdf, None).map_err(|e| {
            let err_str = format!("{e:?}");
            if err_str.contains("Password") || err_str.contains("password") {
                ExtractError::PasswordRequired
            } else {
                ExtractError::CorruptPdf { detail: err_str }
            }
        })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        if total_pages == 0 {
            return Ok(None);
        }

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let page = pages
            .get(0)
            .map_err(|e| ExtractError::RasterisationFailed {
                detail: format!("{e:?}"),
            })?;

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ExtractError::RasterisationFailed {
                detail: format!("{e:?}"),
            })?;

        let image = bitmap.as_image();
        debug!("Rendered page 1 → {}x{} px", image.width(), image.height());

        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    struct Blank;

    impl PageRasterizer for Blank {
        fn render_first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
            Ok(Some(DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])))))
        }
    }

    #[tokio::test]
    async fn render_runs_on_blocking_pool() {
        let img = render_first_page(Arc::new(Blank), Bytes::from_static(b"%PDF"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(img.width(), 4);
    }

    #[test]
    fn max_pixels_floor() {
        let r = PdfiumRasterizer::new(None, 1);
        assert_eq!(r.max_pixels, 100);
    }
}
