//! Recognizer backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::RecognitionError;
use crate::models::config::OcrConfig;

use super::input::decode_image;
use super::{check_language, layout_text, RecognitionProgress, Region, TextRecognizer};

/// PaddleOCR detection + recognition models run through `pure-onnx-ocr`.
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl PureOcrEngine {
    /// Load the models named in `config` from `model_dir`.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, RecognitionError> {
        let [det, rec, dict] = config.model_files();
        let det_path = config.model_path(model_dir, det);
        let rec_path = config.model_path(model_dir, rec);
        let dict_path = config.model_path(model_dir, dict);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(RecognitionError::new(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognitionError::new(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &mut dyn FnMut(RecognitionProgress),
    ) -> Result<String, RecognitionError> {
        check_language(language)?;
        let start = Instant::now();

        progress(RecognitionProgress::new("loading image", 0.1));
        let image = decode_image(image)?;
        let (width, height) = image.dimensions();
        info!("Recognizing text in {}x{} image", width, height);

        progress(RecognitionProgress::new("recognizing text", 0.4));
        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| RecognitionError::new(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let regions: Vec<Region> = results
            .iter()
            .map(|r| {
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                (top_left(&r.bounding_box), text)
            })
            .collect();

        let text = layout_text(regions);

        progress(RecognitionProgress::new("done", 1.0));
        info!(
            "Recognition complete: {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Smallest x and y over the region's exterior ring.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .fold((f64::MAX, f64::MAX), |(x, y), c| (x.min(c.x), y.min(c.y)))
}
