//! Configuration structures for the recognition and extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, RxtractError};
use crate::export::ExportFormat;
use crate::extract::VendorHeuristic;
use crate::ocr::DEFAULT_LANGUAGE;

/// Main configuration for rxtract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RxtractConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language code passed to the engine. Only "eng" is supported.
    pub language: String,

    /// Directory containing the ONNX models.
    pub model_dir: Option<PathBuf>,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with a space.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            model_dir: None,
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How the vendor name is guessed.
    pub vendor_heuristic: VendorHeuristic,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    pub default_format: ExportFormat,

    /// File name stem for exported files.
    pub file_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Json,
            file_stem: "extracted_data".to_string(),
        }
    }
}

impl RxtractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RxtractError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RxtractError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl OcrConfig {
    /// Full path to a model file inside `dir`.
    pub fn model_path(&self, dir: &std::path::Path, model_name: &str) -> PathBuf {
        dir.join(model_name)
    }

    /// Model files the engine needs, in load order.
    pub fn model_files(&self) -> [&str; 3] {
        [
            self.detection_model.as_str(),
            self.recognition_model.as_str(),
            self.dictionary.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"vendor_heuristic": "words_before_digit"}}"#)
            .unwrap();

        let config = RxtractConfig::from_file(&path).unwrap();
        assert_eq!(
            config.extraction.vendor_heuristic,
            VendorHeuristic::WordsBeforeDigit
        );
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.export.file_stem, "extracted_data");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RxtractConfig::default();
        config.export.default_format = ExportFormat::Csv;
        config.ocr.model_dir = Some(PathBuf::from("/opt/models"));
        config.save(&path).unwrap();

        let loaded = RxtractConfig::from_file(&path).unwrap();
        assert_eq!(loaded.export.default_format, ExportFormat::Csv);
        assert_eq!(loaded.ocr.model_dir, Some(PathBuf::from("/opt/models")));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = RxtractConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, RxtractError::Config(_)));
        assert!(err.to_string().starts_with("configuration error: "));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RxtractConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RxtractError::Io(_)));
    }
}
