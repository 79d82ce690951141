//! Core library for receipt OCR processing.
//!
//! This crate provides:
//! - A recognition adapter over an OCR engine (PaddleOCR models via `pure-onnx-ocr`)
//! - Receipt field extraction (vendor, address, amounts, date, payment, line items)
//! - A single-session state machine around recognition and extraction
//! - JSON/CSV export and share/clipboard delivery of the extracted record

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod session;
pub mod share;

pub use error::{RxtractError, Result};
pub use export::{export, ExportArtifact, ExportFormat};
pub use extract::{extract, ExtractionResult, ReceiptParser, RecordExtractor, VendorHeuristic};
pub use models::config::RxtractConfig;
pub use models::record::{ExtractedRecord, OrderItem, PaymentMethod, RecordField};
pub use ocr::{ImageInput, RecognitionProgress, TextRecognizer, DEFAULT_LANGUAGE};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use session::{Session, SessionState};
pub use share::{share, Clipboard, ShareOutcome, ShareTarget};
