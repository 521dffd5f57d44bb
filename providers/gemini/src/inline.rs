use std::io::Cursor;

use base64::Engine as _;
use image::{ImageFormat, ImageReader};
use paleo_transcriber::TranscribeError;

/// Formats the API accepts inline; anything else is re-encoded as PNG
const ACCEPTED: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Image ready to embed in a request
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: &'static str,
    /// Base64 payload
    pub data: String,
    pub width: u32,
    pub height: u32,
}

pub fn inline_image(reference: &str, bytes: &[u8]) -> Result<InlineImage, TranscribeError> {
    let invalid = |reason: String| TranscribeError::InvalidImage {
        image: reference.to_string(),
        reason,
    };

    let format = image::guess_format(bytes).map_err(|e| invalid(e.to_string()))?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| invalid(e.to_string()))?;

    let (format, payload) = if ACCEPTED.contains(&format) {
        (format, bytes.to_vec())
    } else {
        tracing::debug!("Re-encoding {format:?} image {reference} as PNG");
        let decoded =
            image::load_from_memory_with_format(bytes, format).map_err(|e| invalid(e.to_string()))?;
        let mut png = Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| invalid(e.to_string()))?;
        (ImageFormat::Png, png.into_inner())
    };

    Ok(InlineImage {
        mime_type: format.to_mime_type(),
        data: base64::engine::general_purpose::STANDARD.encode(payload),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbImage};

    use super::*;

    fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_png_is_sent_as_is() {
        let bytes = encoded(ImageFormat::Png, 4, 3);
        let inline = inline_image("page.png", &bytes).unwrap();

        assert_eq!(inline.mime_type, "image/png");
        assert_eq!((inline.width, inline.height), (4, 3));
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_tiff_is_reencoded_as_png() {
        let bytes = encoded(ImageFormat::Tiff, 5, 7);
        let inline = inline_image("page.tif", &bytes).unwrap();

        assert_eq!(inline.mime_type, "image/png");
        assert_eq!((inline.width, inline.height), (5, 7));
    }

    #[test]
    fn test_garbage_is_invalid_image() {
        let err = inline_image("page.jpg", b"<html>not found</html>").unwrap_err();
        assert!(matches!(err, TranscribeError::InvalidImage { image, .. } if image == "page.jpg"));
    }
}
