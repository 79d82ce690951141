//! Recognition adapter: image bytes in, plain text out.
//!
//! The OCR engine is a black box behind [`TextRecognizer`]. The shipped
//! backend is [`PureOcrEngine`] (PaddleOCR ONNX models run by `pure-onnx-ocr`).

mod input;
mod layout;
#[cfg(feature = "native")]
mod pure_engine;

pub use input::ImageInput;
pub use layout::{layout_text, Region, ROW_HEIGHT};
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use crate::error::RecognitionError;

/// The only language code the recognizer accepts.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Advisory progress notification from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionProgress {
    /// Opaque status message, e.g. "recognizing text".
    pub status: String,
    /// Completion in `0.0..=1.0`.
    pub progress: f32,
}

impl RecognitionProgress {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress: progress.clamp(0.0, 1.0),
        }
    }
}

/// An OCR engine.
pub trait TextRecognizer {
    /// Recognize the text in an encoded image.
    ///
    /// Progress callbacks are best effort and never change the result.
    /// Fails if the bytes are not a decodable image, the language is not
    /// supported, or the engine produces no output.
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &mut dyn FnMut(RecognitionProgress),
    ) -> Result<String, RecognitionError>;
}

/// Reject any language other than [`DEFAULT_LANGUAGE`].
pub fn check_language(language: &str) -> Result<(), RecognitionError> {
    if language == DEFAULT_LANGUAGE {
        Ok(())
    } else {
        Err(RecognitionError::new(format!(
            "unsupported language '{}', only '{}' is available",
            language, DEFAULT_LANGUAGE
        )))
    }
}
