//! Date extraction.
//!
//! Dates are reported exactly as printed. No calendar check happens here;
//! `ExtractedRecord::validate` reports impossible dates afterwards.

use super::patterns::DATE_MDY;
use super::FieldExtractor;

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        extract_date(text)
    }

    fn extract_all(&self, text: &str) -> Vec<String> {
        DATE_MDY
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// First `M/D/YYYY`-shaped date.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_MDY.find(text).map(|m| m.as_str().to_string())
}
