//! Image encoding: `DynamicImage` → base64 JPEG wrapped in an [`ImagePart`].
//!
//! Vision APIs take images inline as base64 plus a MIME type. JPEG keeps a
//! full résumé page well under request size limits; quality 75 keeps body
//! text legible for the model.

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// MIME type of every page image this crate produces.
pub const JPEG_MIME: &str = "image/jpeg";

/// One inline image, ready for a multimodal request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePart {
    pub mime_type: String,
    /// Standard-alphabet, padded base64.
    pub data: String,
}

/// Encode a rendered page as base64 JPEG.
///
/// JPEG has no alpha channel, so the bitmap is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<ImagePart, ExtractError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ExtractError::EncodeFailed {
            detail: e.to_string(),
        })?;

    let data = STANDARD.encode(&buf);
    debug!("Encoded page → {} bytes JPEG, {} bytes base64", buf.len(), data.len());

    Ok(ImagePart {
        mime_type: JPEG_MIME.to_string(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encodes_rgba_as_jpeg() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 128])));
        let part = encode_jpeg(&img, 75).expect("encode should succeed");
        assert_eq!(part.mime_type, "image/jpeg");

        let decoded = STANDARD.decode(&part.data).expect("valid base64");
        // SOI marker
        assert_eq!(&decoded[..2], &[0xFF, 0xD8]);
        let back = image::load_from_memory(&decoded).expect("decodable JPEG");
        assert_eq!((back.width(), back.height()), (16, 16));
    }

    #[test]
    fn higher_quality_is_not_smaller() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        }));
        let low = encode_jpeg(&img, 10).unwrap();
        let high = encode_jpeg(&img, 95).unwrap();
        assert!(high.data.len() >= low.data.len());
    }
}
