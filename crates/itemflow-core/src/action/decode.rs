//! Image decoding with content-based format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::ActionError;
use crate::item::{Item, Kind, Payload};

use super::Process;

/// Classifier of a decoded image.
pub const DECODED_IMAGE_CLASSIFIER: &str = "object/image";

/// Decodes encoded image bytes into a bitmap.
pub struct DecodeImageAction {
    limits: LimitsConfig,
}

impl DecodeImageAction {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), ActionError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ActionError::ImageDecode(format!("Cannot detect image format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| ActionError::ImageDecode("Unrecognized image format".to_string()))?;
        let image = reader
            .decode()
            .map_err(|e| ActionError::ImageDecode(e.to_string()))?;

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(ActionError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }
        Ok((image, format))
    }
}

impl Default for DecodeImageAction {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

impl Process for DecodeImageAction {
    fn name(&self) -> &str {
        "decode-image"
    }

    fn can_process(&self, item: &Item) -> bool {
        item.kind() == Kind::Image && matches!(item.payload(), Payload::Bytes(_))
    }

    fn process(&self, item: &Item) -> Result<Item, ActionError> {
        if item.kind() != Kind::Image {
            return Err(ActionError::Unsupported { kind: item.kind() });
        }
        let bytes = item
            .payload()
            .as_bytes()
            .ok_or(ActionError::UnexpectedPayload {
                expected: "bytes",
                found: item.payload().variant_name(),
            })?;

        let (image, format) = self.decode_bytes(bytes)?;
        tracing::trace!(
            "Decoded {} as {} ({}x{})",
            item.classifier(),
            format_to_string(format),
            image.width(),
            image.height()
        );
        Ok(Item::new(Payload::Image(image), DECODED_IMAGE_CLASSIFIER))
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
