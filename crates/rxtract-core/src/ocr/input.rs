//! User-supplied image blobs.

use image::DynamicImage;
use tracing::debug;

use crate::error::{InputValidationError, RecognitionError};

/// An image blob with its declared MIME type.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Declared MIME type, e.g. "image/png".
    pub mime_type: String,
    /// Original file name, if known.
    pub name: Option<String>,
}

impl ImageInput {
    /// Accept a blob whose declared MIME type is an image type.
    ///
    /// Only the declaration is checked here; undecodable bytes surface later
    /// as a recognition error.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, InputValidationError> {
        let mime_type = mime_type.into();
        Self::validate(&mime_type)?;
        Ok(Self {
            bytes,
            mime_type,
            name: None,
        })
    }

    /// Attach the original file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check that a MIME type describes an image.
    pub fn validate(mime_type: &str) -> Result<(), InputValidationError> {
        if mime_type.trim().to_ascii_lowercase().starts_with("image/") {
            Ok(())
        } else {
            debug!("Rejected input with MIME type {:?}", mime_type);
            Err(InputValidationError {
                mime_type: mime_type.to_string(),
            })
        }
    }

    /// Decode the bytes.
    pub fn decode(&self) -> Result<DynamicImage, RecognitionError> {
        decode_image(&self.bytes)
    }
}

/// Decode encoded image bytes, mapping failures to a recognition error.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, RecognitionError> {
    if bytes.is_empty() {
        return Err(RecognitionError::new("image is empty"));
    }
    image::load_from_memory(bytes).map_err(|e| RecognitionError::new(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(4, 4);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_accepts_image_types() {
        assert!(ImageInput::new(vec![1], "image/png").is_ok());
        assert!(ImageInput::new(vec![1], "IMAGE/JPEG").is_ok());
    }

    #[test]
    fn test_rejects_non_images() {
        let err = ImageInput::new(vec![1], "application/pdf").unwrap_err();
        assert_eq!(err.mime_type, "application/pdf");
        assert!(ImageInput::new(vec![1], "text/plain").is_err());
        assert!(ImageInput::new(vec![1], "").is_err());
    }

    #[test]
    fn test_decode() {
        let input = ImageInput::new(png_bytes(), "image/png").unwrap().with_name("r.png");
        let image = input.decode().unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(input.name.as_deref(), Some("r.png"));
    }

    #[test]
    fn test_decode_garbage_is_recognition_error() {
        let input = ImageInput::new(b"not an image".to_vec(), "image/png").unwrap();
        let err = input.decode().unwrap_err();
        assert!(err.to_string().starts_with("Error processing image: "));

        let err = decode_image(&[]).unwrap_err();
        assert_eq!(err.detail, "image is empty");
    }
}
