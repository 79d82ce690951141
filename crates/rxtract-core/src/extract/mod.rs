//! Receipt field extraction.
//!
//! Extraction is a pure, total function of the recognized text: no I/O, no
//! shared state, and every field degrades to its default instead of failing.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, ReceiptParser};
pub use rules::VendorHeuristic;

use crate::models::record::ExtractedRecord;

/// Trait for text-to-record extractors.
pub trait RecordExtractor {
    /// Extract a record from recognized text.
    fn extract(&self, text: &str) -> ExtractedRecord;
}

/// Extract a record with the default parser.
pub fn extract(text: &str) -> ExtractedRecord {
    ReceiptParser::new().extract(text)
}
