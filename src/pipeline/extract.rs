//! The extractor: uploaded résumé bytes → one base64 JPEG of page one.

use crate::error::ExtractError;
use crate::pipeline::encode::{encode_jpeg, ImagePart};
use crate::pipeline::input::validate_document;
use crate::pipeline::render::{render_first_page, PageRasterizer};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

/// The encoded first page of a document.
///
/// Always holds exactly one [`ImagePart`]; there is no way to build an
/// empty bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBundle {
    parts: Vec<ImagePart>,
}

impl ImageBundle {
    pub fn single(part: ImagePart) -> Self {
        Self { parts: vec![part] }
    }

    /// The image sent to the model.
    pub fn first(&self) -> &ImagePart {
        &self.parts[0]
    }

    pub fn parts(&self) -> &[ImagePart] {
        &self.parts
    }
}

/// Extract the first page of `document` as a base64 JPEG bundle.
///
/// # Errors
/// - [`ExtractError::MissingInput`] when nothing was uploaded
/// - [`ExtractError::NotAPdf`] when the bytes lack the `%PDF` magic
/// - [`ExtractError::EmptyDocument`] when the PDF has zero pages
/// - any render/encode failure from the rasterizer or JPEG encoder
pub async fn extract_first_page(
    document: Option<&Bytes>,
    rasterizer: Arc<dyn PageRasterizer>,
    jpeg_quality: u8,
) -> Result<ImageBundle, ExtractError> {
    let bytes = document.ok_or(ExtractError::MissingInput)?;
    validate_document(Some(bytes.as_ref()))?;

    let image = match render_first_page(rasterizer, bytes.clone()).await {
        Ok(Some(image)) => image,
        Ok(None) => {
            warn!("Uploaded PDF has no pages");
            return Err(ExtractError::EmptyDocument);
        }
        Err(e) => {
            warn!("Failed to render first page: {}", e);
            return Err(e);
        }
    };

    let part = encode_jpeg(&image, jpeg_quality)?;
    debug!("Extracted page 1 ({}x{})", image.width(), image.height());
    Ok(ImageBundle::single(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake rasterizer reporting a fixed page count; renders a white page
    /// when there is at least one.
    struct FakePages {
        pages: usize,
        calls: AtomicUsize,
    }

    impl FakePages {
        fn new(pages: usize) -> Arc<Self> {
            Arc::new(Self {
                pages,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl PageRasterizer for FakePages {
        fn render_first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.pages == 0 {
                return Ok(None);
            }
            Ok(Some(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                8,
                10,
                Rgb([255, 255, 255]),
            ))))
        }
    }

    fn pdf() -> Bytes {
        Bytes::from_static(b"%PDF-1.7\n%fake")
    }

    #[tokio::test]
    async fn missing_document_never_reaches_rasterizer() {
        let raster = FakePages::new(1);
        let err = extract_first_page(None, raster.clone(), 75).await.unwrap_err();
        assert_eq!(err, ExtractError::MissingInput);
        assert_eq!(raster.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_pages_is_empty_document() {
        let err = extract_first_page(Some(&pdf()), FakePages::new(0), 75)
            .await
            .unwrap_err();
        assert_eq!(err, ExtractError::EmptyDocument);
    }

    #[tokio::test]
    async fn any_page_count_yields_exactly_one_part() {
        for pages in [1, 2, 17] {
            let bundle = extract_first_page(Some(&pdf()), FakePages::new(pages), 75)
                .await
                .unwrap();
            assert_eq!(bundle.parts().len(), 1, "pages={pages}");
            assert_eq!(bundle.first().mime_type, "image/jpeg");
            assert!(!bundle.first().data.is_empty());
        }
    }

    #[tokio::test]
    async fn not_a_pdf_is_rejected_before_render() {
        let raster = FakePages::new(1);
        let doc = Bytes::from_static(b"hello world");
        let err = extract_first_page(Some(&doc), raster.clone(), 75).await.unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
        assert_eq!(raster.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn render_errors_propagate() {
        struct Broken;
        impl PageRasterizer for Broken {
            fn render_first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractError> {
                Err(ExtractError::CorruptPdf {
                    detail: "bad xref".into(),
                })
            }
        }
        let err = extract_first_page(Some(&pdf()), Arc::new(Broken), 75)
            .await
            .unwrap_err();
        assert!(err.banner().starts_with("Error processing PDF: PDF is corrupt"));
    }
}
